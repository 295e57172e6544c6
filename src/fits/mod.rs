//! # FITS Extension Reader
//!
//! Access to the FITS files produced by the JWST calibration pipeline, built on
//! the [`fitsio`] crate. Only what the spectrum extraction needs is exposed:
//!
//! - An index of every HDU with its `EXTNAME`, row count and table columns
//! - Reading one numeric table column as `f64`
//! - Writing small `BINTABLE` files for demos and tests
//!
//! The extraction pipeline does not depend on [`FitsFile`] directly. It consumes
//! the [`ExtensionSource`] capability: "an ordered list of table extensions with
//! named columns". [`MemorySource`] provides the same capability for data that
//! is already in memory.
//!
//! ## Example
//!
//! ```rust,no_run
//! use jwstfits::fits::{ExtensionSource, FitsFile};
//!
//! let mut file = FitsFile::open("jw01366004001_04101_00001-seg001_nrs1_x1dints.fits")?;
//! for ext in file.extensions() {
//!     println!("[{}] {} ({} rows)", ext.index, ext.name, ext.rows());
//! }
//! let wavelength = file.read_column(2, "WAVELENGTH")?;
//! file.close();
//! # Ok::<(), jwstfits::fits::FitsError>(())
//! ```

mod error;
mod file;
mod memory;
mod writer;


pub use error::FitsError;
pub use file::FitsFile;
pub use memory::MemorySource;
pub use writer::{BinTableWriter, HeaderValue, TableColumn};

/// Kind of a header-data unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HduKind {
    /// Primary HDU (index 0)
    Primary,
    /// ASCII or binary table extension
    Table,
    /// Image extension, or any HDU without a table
    Image,
}

/// One declared table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// `TTYPEn`
    pub name: String,
    /// `TUNITn`, if declared
    pub unit: Option<String>,
}

/// Description of one HDU
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionInfo {
    /// Position of the HDU in the file (primary is 0)
    pub index: usize,
    /// `EXTNAME`, or `PRIMARY` for the primary HDU
    pub name: String,
    /// HDU kind
    pub kind: HduKind,
    /// Number of table rows (0 for non-table HDUs)
    pub num_rows: usize,
    /// Declared columns, in table order (empty for non-table HDUs)
    pub columns: Vec<ColumnInfo>,
}

impl ExtensionInfo {
    /// True if this HDU is a table
    pub fn is_table(&self) -> bool {
        self.kind == HduKind::Table
    }

    /// Number of table rows (0 for non-table HDUs)
    pub fn rows(&self) -> usize {
        self.num_rows
    }

    /// Look up a column by name, ignoring ASCII case
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// True if this HDU is a table declaring every named column
    pub fn has_columns(&self, names: &[&str]) -> bool {
        self.is_table() && names.iter().all(|n| self.column(n).is_some())
    }

    /// True if `EXTNAME` matches, ignoring ASCII case
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Capability consumed by the spectrum assembler: ordered table extensions
/// with named numeric columns.
pub trait ExtensionSource {
    /// All HDUs in file order
    fn extensions(&self) -> &[ExtensionInfo];

    /// Read one numeric column of a table extension as `f64`
    fn read_column(&mut self, index: usize, column: &str) -> Result<Vec<f64>, FitsError>;

    /// Human-readable origin, used in diagnostics
    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// Resolve `column` in HDU `index` to its declared spelling.
///
/// Shared by the sources so every implementation reports lookup failures the
/// same way.
fn resolve_column<'a>(
    extensions: &'a [ExtensionInfo],
    index: usize,
    column: &str,
) -> Result<&'a ColumnInfo, FitsError> {
    let info = extensions
        .get(index)
        .ok_or(FitsError::ExtensionOutOfRange {
            index,
            count: extensions.len(),
        })?;
    if !info.is_table() {
        return Err(FitsError::NotATable(index));
    }
    info.column(column).ok_or_else(|| FitsError::ColumnNotFound {
        column: column.to_string(),
        extension: index,
    })
}
