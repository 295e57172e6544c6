use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;
use crate::processing::{NanAxis, OutlierWindow, WavelengthRange};
use crate::spectrum::FluxUnit;

/// Caller options for one extraction.
///
/// Every stage is off by default: no clipping, no NaN removal, flux left in
/// Jy, no outlier excision, raw arrays returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Keep only samples in this range (microns)
    pub wavelength_range: Option<WavelengthRange>,
    /// Remove samples / integrations with NaN flux
    pub kick_nan: bool,
    /// Override the NaN scrub axis; defaults per file kind
    pub nan_axis: Option<NanAxis>,
    /// Target flux unit
    pub flux_unit: FluxUnit,
    /// Output representation
    pub output: OutputFormat,
    /// Suspect range searched for an artifact peak (microns)
    pub outlier: Option<WavelengthRange>,
    /// Samples removed either side of the artifact peak
    pub buffer: usize,
    /// Accepted for forward compatibility, not used by excision
    pub iqr_threshold: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            wavelength_range: None,
            kick_nan: false,
            nan_axis: None,
            flux_unit: FluxUnit::Jansky,
            output: OutputFormat::Arrays,
            outlier: None,
            buffer: 2,
            iqr_threshold: 1.5,
        }
    }
}

impl ExtractionConfig {
    /// Set the wavelength clip range
    pub fn with_wavelength_range(mut self, min: f64, max: f64) -> Self {
        self.wavelength_range = Some(WavelengthRange::new(min, max));
        self
    }

    /// Enable or disable NaN removal
    pub fn with_kick_nan(mut self, kick_nan: bool) -> Self {
        self.kick_nan = kick_nan;
        self
    }

    /// Set the target flux unit
    pub fn with_flux_unit(mut self, unit: FluxUnit) -> Self {
        self.flux_unit = unit;
        self
    }

    /// Set the output representation
    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Set the outlier range and buffer
    pub fn with_outlier(mut self, min: f64, max: f64, buffer: usize) -> Self {
        self.outlier = Some(WavelengthRange::new(min, max));
        self.buffer = buffer;
        self
    }

    /// Excision window built from `outlier`, `buffer` and `iqr_threshold`
    pub fn outlier_window(&self) -> Option<OutlierWindow> {
        self.outlier.map(|range| OutlierWindow {
            range,
            buffer: self.buffer,
            iqr_threshold: self.iqr_threshold,
        })
    }
}
