//! # Output Representations
//!
//! A cleaned [`Spectrum`] is handed back in one of three shapes:
//!
//! | [`OutputFormat`] | Value | Notes |
//! |------------------|-------|-------|
//! | `arrays` | [`SpectrumArrays`] | raw arrays, shapes untouched |
//! | `dataframe` | Arrow [`RecordBatch`] | flat table, one Float64 column per quantity |
//! | `datacube` | [`Datacube`] | labeled mapping, shapes preserved, serializable |
//!
//! ## Dataframe layout
//!
//! Columns are `wavelength`, `flux`, `flux_error` and, for time series, `time`.
//! Two-dimensional arrays are flattened integration by integration, so the
//! time column is each integration's time repeated once per wavelength sample
//! and wavelength varies fastest.
//!
//! Dataframes can be written to Parquet ([`write_parquet`]) or CSV
//! ([`write_csv`]); datacubes to JSON ([`write_json`]).

mod dataframe;


use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use arrow::record_batch::RecordBatch;
use ndarray::{Array1, ArrayD};
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::spectrum::{FluxUnit, Spectrum};

pub use dataframe::{
    columns, to_record_batch, write_csv, write_parquet, DataFrameWriterConfig, FLUX_UNIT_KEY,
};

/// Requested output representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    /// Raw arrays
    #[default]
    Arrays,
    /// Flat table
    DataFrame,
    /// Labeled mapping preserving shapes
    Datacube,
}

impl OutputFormat {
    /// Configuration name of this format
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Arrays => "arrays",
            OutputFormat::DataFrame => "dataframe",
            OutputFormat::Datacube => "datacube",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrays" => Ok(OutputFormat::Arrays),
            "dataframe" => Ok(OutputFormat::DataFrame),
            "datacube" => Ok(OutputFormat::Datacube),
            _ => Err(ExtractError::UnknownFormatError(s.to_string())),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = ExtractError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<OutputFormat> for String {
    fn from(format: OutputFormat) -> Self {
        format.name().to_string()
    }
}

/// Raw `(wavelength, flux, error[, time])` arrays
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumArrays {
    /// Wavelength in microns
    pub wavelength: ArrayD<f64>,
    /// Flux
    pub flux: ArrayD<f64>,
    /// Flux error
    pub error: ArrayD<f64>,
    /// Relative hours, time series only
    pub time: Option<Array1<f64>>,
    /// Unit of flux and error
    pub flux_unit: FluxUnit,
}

impl From<Spectrum> for SpectrumArrays {
    fn from(spectrum: Spectrum) -> Self {
        let flux_unit = spectrum.flux_unit();
        let (wavelength, flux, error, time) = spectrum.into_parts();
        Self {
            wavelength,
            flux,
            error,
            time,
            flux_unit,
        }
    }
}

/// Labeled mapping `{wavelength, flux, error[, time]}` with shapes preserved.
///
/// Serialization is one-way: JSON has no NaN, so `serde_json` writes NaN
/// samples as `null`. Enable NaN removal before rendering a datacube that
/// must be read back as numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datacube {
    /// Wavelength in microns
    pub wavelength: ArrayD<f64>,
    /// Flux
    pub flux: ArrayD<f64>,
    /// Flux error
    pub error: ArrayD<f64>,
    /// Relative hours, time series only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Array1<f64>>,
    /// Unit of flux and error
    pub flux_unit: FluxUnit,
}

impl From<SpectrumArrays> for Datacube {
    fn from(arrays: SpectrumArrays) -> Self {
        Self {
            wavelength: arrays.wavelength,
            flux: arrays.flux,
            error: arrays.error,
            time: arrays.time,
            flux_unit: arrays.flux_unit,
        }
    }
}

/// A spectrum rendered in the requested [`OutputFormat`]
#[derive(Debug, Clone)]
pub enum SpectrumOutput {
    /// See [`OutputFormat::Arrays`]
    Arrays(SpectrumArrays),
    /// See [`OutputFormat::DataFrame`]
    DataFrame(RecordBatch),
    /// See [`OutputFormat::Datacube`]
    Datacube(Datacube),
}

impl SpectrumOutput {
    /// Render `spectrum` as `format`
    pub fn render(spectrum: Spectrum, format: OutputFormat) -> Result<Self> {
        Ok(match format {
            OutputFormat::Arrays => SpectrumOutput::Arrays(spectrum.into()),
            OutputFormat::DataFrame => SpectrumOutput::DataFrame(to_record_batch(&spectrum)?),
            OutputFormat::Datacube => {
                SpectrumOutput::Datacube(SpectrumArrays::from(spectrum).into())
            }
        })
    }

    /// Format this value was rendered as
    pub fn format(&self) -> OutputFormat {
        match self {
            SpectrumOutput::Arrays(_) => OutputFormat::Arrays,
            SpectrumOutput::DataFrame(_) => OutputFormat::DataFrame,
            SpectrumOutput::Datacube(_) => OutputFormat::Datacube,
        }
    }

    /// Raw arrays, if rendered as `arrays`
    pub fn as_arrays(&self) -> Option<&SpectrumArrays> {
        match self {
            SpectrumOutput::Arrays(arrays) => Some(arrays),
            _ => None,
        }
    }

    /// Record batch, if rendered as `dataframe`
    pub fn as_record_batch(&self) -> Option<&RecordBatch> {
        match self {
            SpectrumOutput::DataFrame(batch) => Some(batch),
            _ => None,
        }
    }

    /// Datacube, if rendered as `datacube`
    pub fn as_datacube(&self) -> Option<&Datacube> {
        match self {
            SpectrumOutput::Datacube(cube) => Some(cube),
            _ => None,
        }
    }
}

/// Write a datacube as pretty-printed JSON
pub fn write_json<W: Write>(cube: &Datacube, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, cube)?;
    Ok(())
}

/// Write a datacube as JSON to a file path
pub fn write_json_file<P: AsRef<Path>>(cube: &Datacube, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(cube, &mut writer)?;
    writer.flush()?;
    Ok(())
}
