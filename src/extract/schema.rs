use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::fits::ExtensionInfo;

/// Names of the extensions and columns that make up an x1d / x1dints file.
///
/// Extensions are located by name rather than by position, so files whose
/// extension order differs from the calibration pipeline's still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionSchema {
    /// `EXTNAME` of the per-integration spectrum tables
    pub spectrum_extension: String,
    /// `EXTNAME` of the integration time table
    pub time_extension: String,
    /// Wavelength column (microns)
    pub wavelength_column: String,
    /// Flux column
    pub flux_column: String,
    /// Flux error column
    pub flux_error_column: String,
    /// Mid-integration time column (BJD_TDB, days)
    pub time_column: String,
}

impl Default for ExtensionSchema {
    fn default() -> Self {
        Self {
            spectrum_extension: "EXTRACT1D".to_string(),
            time_extension: "INT_TIMES".to_string(),
            wavelength_column: "WAVELENGTH".to_string(),
            flux_column: "FLUX".to_string(),
            flux_error_column: "FLUX_ERROR".to_string(),
            time_column: "int_mid_BJD_TDB".to_string(),
        }
    }
}

impl ExtensionSchema {
    fn spectral_columns(&self) -> [&str; 3] {
        [
            self.wavelength_column.as_str(),
            self.flux_column.as_str(),
            self.flux_error_column.as_str(),
        ]
    }

    /// Indices of the spectrum tables, in file order.
    ///
    /// Tables named [`ExtensionSchema::spectrum_extension`] are preferred; when
    /// none exist, every table declaring the three spectral columns is used.
    pub fn spectral_extensions(&self, extensions: &[ExtensionInfo]) -> Vec<usize> {
        let columns = self.spectral_columns();
        let named: Vec<usize> = extensions
            .iter()
            .filter(|e| e.is_named(&self.spectrum_extension) && e.has_columns(&columns))
            .map(|e| e.index)
            .collect();
        if !named.is_empty() {
            return named;
        }
        extensions
            .iter()
            .filter(|e| e.has_columns(&columns))
            .map(|e| e.index)
            .collect()
    }

    /// Index of the table holding integration times, if any
    pub fn time_extension(&self, extensions: &[ExtensionInfo]) -> Option<usize> {
        let columns = [self.time_column.as_str()];
        extensions
            .iter()
            .find(|e| e.is_named(&self.time_extension) && e.has_columns(&columns))
            .or_else(|| extensions.iter().find(|e| e.has_columns(&columns)))
            .map(|e| e.index)
    }
}

/// Which product a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    /// One extracted spectrum (`x1d`)
    #[serde(rename = "x1d")]
    SingleExposure,
    /// One extracted spectrum per integration (`x1dints`)
    #[serde(rename = "x1dints")]
    TimeSeries,
}

impl FileKind {
    /// Classify a file from its declared structure.
    ///
    /// A file with an integration time table is a time series; any other file
    /// with at least one spectrum table is a single exposure.
    pub fn detect(extensions: &[ExtensionInfo], schema: &ExtensionSchema) -> Result<Self> {
        if schema.spectral_extensions(extensions).is_empty() {
            return Err(ExtractError::InputError(format!(
                "no table extension provides {}, {} and {}",
                schema.wavelength_column, schema.flux_column, schema.flux_error_column
            )));
        }
        Ok(if schema.time_extension(extensions).is_some() {
            FileKind::TimeSeries
        } else {
            FileKind::SingleExposure
        })
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::SingleExposure => f.write_str("x1d"),
            FileKind::TimeSeries => f.write_str("x1dints"),
        }
    }
}
