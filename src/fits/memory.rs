use super::{resolve_column, ColumnInfo, ExtensionInfo, ExtensionSource, FitsError, HduKind};

/// In-memory [`ExtensionSource`]
///
/// Holds a primary HDU followed by binary tables of `f64` columns, so the
/// extraction pipeline can run on data that did not come from disk.
///
/// ```rust
/// use jwstfits::fits::{ExtensionSource, MemorySource};
///
/// let source = MemorySource::new().with_table(
///     "EXTRACT1D",
///     vec![("WAVELENGTH", vec![1.0, 1.1]), ("FLUX", vec![5.0, 6.0])],
/// );
/// assert_eq!(source.extensions().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    extensions: Vec<ExtensionInfo>,
    columns: Vec<Vec<Vec<f64>>>,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource {
    /// Create a source holding only an empty primary HDU
    pub fn new() -> Self {
        Self {
            extensions: vec![ExtensionInfo {
                index: 0,
                name: "PRIMARY".to_string(),
                kind: HduKind::Primary,
                num_rows: 0,
                columns: Vec::new(),
            }],
            columns: vec![Vec::new()],
        }
    }

    /// Append a binary table extension.
    ///
    /// The row count is taken from the first column.
    pub fn with_table<S: Into<String>>(self, name: &str, columns: Vec<(S, Vec<f64>)>) -> Self {
        let columns = columns.into_iter().map(|(n, v)| (n.into(), None, v)).collect();
        self.with_described_table(name, columns)
    }

    /// Append a binary table extension whose columns may declare a unit
    pub fn with_described_table(
        mut self,
        name: &str,
        columns: Vec<(String, Option<String>, Vec<f64>)>,
    ) -> Self {
        let index = self.extensions.len();
        let num_rows = columns.first().map_or(0, |(_, _, v)| v.len());
        let (described, data): (Vec<ColumnInfo>, Vec<Vec<f64>>) = columns
            .into_iter()
            .map(|(name, unit, values)| (ColumnInfo { name, unit }, values))
            .unzip();

        self.extensions.push(ExtensionInfo {
            index,
            name: name.to_string(),
            kind: HduKind::Table,
            num_rows,
            columns: described,
        });
        self.columns.push(data);
        self
    }
}

impl ExtensionSource for MemorySource {
    fn extensions(&self) -> &[ExtensionInfo] {
        &self.extensions
    }

    fn read_column(&mut self, index: usize, column: &str) -> Result<Vec<f64>, FitsError> {
        let name = &resolve_column(&self.extensions, index, column)?.name;
        let position = self.extensions[index]
            .columns
            .iter()
            .position(|c| &c.name == name)
            .ok_or_else(|| FitsError::ColumnNotFound {
                column: column.to_string(),
                extension: index,
            })?;
        Ok(self.columns[index][position].clone())
    }
}
