//! TOML configuration file support.
//!
//! Instead of passing many CLI flags, users can specify settings in a config file:
//!
//! ```toml
//! # jwstfits.toml
//! [extraction]
//! wavelength_range = [2.87, 5.1]
//! kick_nan = true
//! flux_unit = "W/m2/um"
//! output = "dataframe"
//! outlier = [3.10, 3.15]
//! buffer = 3
//!
//! [schema]
//! time_column = "int_mid_MJD_UTC"
//! ```
//!
//! Flags given on the command line take precedence over file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use jwstfits::extract::ExtensionSchema;
use jwstfits::output::OutputFormat;
use jwstfits::pipeline::{ExtractionConfig, WavelengthRange};
use jwstfits::processing::NanAxis;
use jwstfits::spectrum::FluxUnit;

/// Root configuration structure for jwstfits.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Extraction stage settings.
    #[serde(default)]
    pub extraction: ExtractionSettings,

    /// Extension and column names.
    #[serde(default)]
    pub schema: ExtensionSchema,
}

/// Configuration for the extract command.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractionSettings {
    /// Wavelength clip range in microns.
    pub wavelength_range: Option<(f64, f64)>,

    /// Remove NaN flux.
    pub kick_nan: Option<bool>,

    /// NaN scrub axis override ("time" or "wavelength").
    pub nan_axis: Option<NanAxis>,

    /// Target flux unit.
    pub flux_unit: Option<String>,

    /// Output representation.
    pub output: Option<String>,

    /// Suspect artifact range in microns.
    pub outlier: Option<(f64, f64)>,

    /// Samples removed either side of the artifact peak.
    pub buffer: Option<usize>,

    /// Reserved outlier threshold.
    pub iqr_threshold: Option<f64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

impl ExtractionSettings {
    /// Overlay the values present in this file onto `base`.
    pub fn apply(&self, mut base: ExtractionConfig) -> Result<ExtractionConfig> {
        if let Some(range) = self.wavelength_range {
            base.wavelength_range = Some(WavelengthRange::from(range));
        }
        if let Some(kick_nan) = self.kick_nan {
            base.kick_nan = kick_nan;
        }
        if self.nan_axis.is_some() {
            base.nan_axis = self.nan_axis;
        }
        if let Some(unit) = &self.flux_unit {
            base.flux_unit = unit.parse::<FluxUnit>()?;
        }
        if let Some(output) = &self.output {
            base.output = output.parse::<OutputFormat>()?;
        }
        if let Some(range) = self.outlier {
            base.outlier = Some(WavelengthRange::from(range));
        }
        if let Some(buffer) = self.buffer {
            base.buffer = buffer;
        }
        if let Some(threshold) = self.iqr_threshold {
            base.iqr_threshold = threshold;
        }
        Ok(base)
    }
}
