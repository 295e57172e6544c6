use ndarray::Axis;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::extract::FileKind;
use crate::spectrum::Spectrum;

/// Axis along which NaNs are searched in 2-D (time-series) flux.
///
/// Naming follows the axis the NaN test runs across: `Time` inspects each
/// wavelength row across all integrations and drops the row; `Wavelength`
/// inspects each integration across all wavelengths and drops the integration
/// together with its time stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NanAxis {
    /// Drop wavelength rows with a NaN at any time
    Time,
    /// Drop integrations with a NaN at any wavelength
    Wavelength,
}

impl NanAxis {
    /// Default policy: x1d cleaning removes spectral channels, x1dints cleaning
    /// removes bad integrations.
    pub fn default_for(kind: FileKind) -> Self {
        match kind {
            FileKind::SingleExposure => NanAxis::Time,
            FileKind::TimeSeries => NanAxis::Wavelength,
        }
    }
}

/// Remove samples with NaN flux.
///
/// 1-D spectra drop each NaN sample (the axis is ignored). 2-D spectra drop
/// rows or integrations according to `axis`. Any other rank is a
/// [`ExtractError::ShapeError`].
pub fn scrub_nan(spectrum: &Spectrum, axis: NanAxis) -> Result<Spectrum> {
    let flux = spectrum.flux();
    match (flux.ndim(), axis) {
        (1, _) => {
            let keep: Vec<usize> = flux
                .iter()
                .enumerate()
                .filter(|(_, f)| !f.is_nan())
                .map(|(i, _)| i)
                .collect();
            Ok(spectrum.select_samples(&keep))
        }
        (2, NanAxis::Time) => {
            let keep: Vec<usize> = flux
                .axis_iter(Axis(0))
                .enumerate()
                .filter(|(_, row)| !row.iter().any(|f| f.is_nan()))
                .map(|(i, _)| i)
                .collect();
            Ok(spectrum.select_samples(&keep))
        }
        (2, NanAxis::Wavelength) => {
            let keep: Vec<usize> = flux
                .axis_iter(Axis(1))
                .enumerate()
                .filter(|(_, column)| !column.iter().any(|f| f.is_nan()))
                .map(|(j, _)| j)
                .collect();
            Ok(spectrum.select_integrations(&keep))
        }
        (n, _) => Err(ExtractError::ShapeError(format!(
            "flux array has unsupported number of dimensions: {n}"
        ))),
    }
}
