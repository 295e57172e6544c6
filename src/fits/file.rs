use std::path::{Path, PathBuf};

use fitsio::hdu::HduInfo;
use log::debug;

use super::{resolve_column, ColumnInfo, ExtensionInfo, ExtensionSource, FitsError, HduKind};

/// Open FITS file with an index of its HDUs.
///
/// HDU descriptions are collected once on [`FitsFile::open`]; column data is
/// read on demand through the held cfitsio handle. The handle is released when
/// the value is dropped or passed to [`FitsFile::close`].
pub struct FitsFile {
    path: PathBuf,
    fits: fitsio::FitsFile,
    extensions: Vec<ExtensionInfo>,
}

impl FitsFile {
    /// Open a FITS file and index all HDUs
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FitsError> {
        let path = path.as_ref().to_path_buf();
        let mut fits = fitsio::FitsFile::open(&path)?;

        let hdu_count = fits.iter().count();
        let mut extensions = Vec::with_capacity(hdu_count);
        for index in 0..hdu_count {
            let info = describe_hdu(&mut fits, index)?;
            debug!(
                "HDU {}: {} ({:?}), {} rows, {} columns",
                index,
                info.name,
                info.kind,
                info.num_rows,
                info.columns.len()
            );
            extensions.push(info);
        }

        Ok(Self {
            path,
            fits,
            extensions,
        })
    }

    /// Path the file was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of HDUs, including the primary
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// True if the file has no HDUs (never true for an opened file)
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Get one HDU description by index
    pub fn extension(&self, index: usize) -> Result<&ExtensionInfo, FitsError> {
        self.extensions
            .get(index)
            .ok_or(FitsError::ExtensionOutOfRange {
                index,
                count: self.extensions.len(),
            })
    }

    /// Release the file handle
    pub fn close(self) {
        debug!("Closing {}", self.path.display());
    }
}

impl ExtensionSource for FitsFile {
    fn extensions(&self) -> &[ExtensionInfo] {
        &self.extensions
    }

    fn read_column(&mut self, index: usize, column: &str) -> Result<Vec<f64>, FitsError> {
        let name = resolve_column(&self.extensions, index, column)?.name.clone();
        let hdu = self.fits.hdu(index)?;
        Ok(hdu.read_col::<f64>(&mut self.fits, &name)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn describe_hdu(fits: &mut fitsio::FitsFile, index: usize) -> Result<ExtensionInfo, FitsError> {
    let hdu = fits.hdu(index)?;

    let name = match hdu.read_key::<String>(fits, "EXTNAME") {
        Ok(name) => name.trim().to_string(),
        Err(_) if index == 0 => "PRIMARY".to_string(),
        Err(_) => String::new(),
    };

    let (kind, num_rows, columns) = match &hdu.info {
        HduInfo::TableInfo {
            column_descriptions,
            num_rows,
        } => {
            let columns = column_descriptions
                .iter()
                .enumerate()
                .map(|(i, description)| ColumnInfo {
                    name: description.name.clone(),
                    unit: hdu
                        .read_key::<String>(fits, &format!("TUNIT{}", i + 1))
                        .ok()
                        .map(|u| u.trim().to_string())
                        .filter(|u| !u.is_empty()),
                })
                .collect();
            (HduKind::Table, *num_rows, columns)
        }
        _ if index == 0 => (HduKind::Primary, 0, Vec::new()),
        _ => (HduKind::Image, 0, Vec::new()),
    };

    Ok(ExtensionInfo {
        index,
        name,
        kind,
        num_rows,
        columns,
    })
}
