use ndarray::{Axis, Ix1, Ix2};
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::spectrum::Spectrum;

use super::WavelengthRange;

fn default_buffer() -> usize {
    2
}

fn default_iqr_threshold() -> f64 {
    1.5
}

/// Suspect wavelength range and excision width for a known artifact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierWindow {
    /// Range searched for the artifact peak
    pub range: WavelengthRange,
    /// Samples removed on each side of the peak
    #[serde(default = "default_buffer")]
    pub buffer: usize,
    /// Reserved for a robust-statistics detection mode; currently not used
    #[serde(default = "default_iqr_threshold")]
    pub iqr_threshold: f64,
}

impl OutlierWindow {
    /// Window with the default buffer of 2 samples
    pub fn new(range: WavelengthRange) -> Self {
        Self {
            range,
            buffer: default_buffer(),
            iqr_threshold: default_iqr_threshold(),
        }
    }

    /// Set the number of samples removed on each side of the peak
    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer;
        self
    }
}

/// What [`excise_outlier`] did
#[derive(Debug, Clone, PartialEq)]
pub enum OutlierOutcome {
    /// No sample lies in the suspect range; the spectrum is unchanged
    NotFound,
    /// A contiguous window of samples was removed
    Excised {
        /// Sample index of the peak before removal
        peak: usize,
        /// Removed sample indices, ascending
        indices: Vec<usize>,
        /// Reference wavelengths of the removed samples
        wavelengths: Vec<f64>,
    },
}

/// Peak brightness of each sample: the flux itself for 1-D spectra, the
/// maximum over all integrations for 2-D spectra. NaNs never win.
fn peak_scores(spectrum: &Spectrum) -> Result<Vec<f64>> {
    let flux = spectrum.flux();
    match flux.ndim() {
        1 => Ok(flux
            .into_dimensionality::<Ix1>()
            .map_err(|e| ExtractError::ShapeError(e.to_string()))?
            .to_vec()),
        2 => Ok(flux
            .into_dimensionality::<Ix2>()
            .map_err(|e| ExtractError::ShapeError(e.to_string()))?
            .axis_iter(Axis(0))
            .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .collect()),
        n => Err(ExtractError::ShapeError(format!(
            "flux array has unsupported number of dimensions: {n}"
        ))),
    }
}

/// Remove `buffer` samples either side of the brightest sample in the window's
/// wavelength range.
///
/// The peak is searched only among samples whose reference wavelength lies in
/// the range; for time series a row qualifies by its maximum over time. The
/// removal window is clipped to the array bounds and applied to wavelength,
/// flux and error along axis 0. When nothing lies in the range the spectrum is
/// returned unchanged with [`OutlierOutcome::NotFound`].
pub fn excise_outlier(
    spectrum: &Spectrum,
    window: &OutlierWindow,
) -> Result<(Spectrum, OutlierOutcome)> {
    let reference = spectrum.reference_wavelength()?;
    let candidates: Vec<usize> = reference
        .iter()
        .enumerate()
        .filter(|&(_, &w)| window.range.contains(w))
        .map(|(i, _)| i)
        .collect();

    if candidates.is_empty() {
        return Ok((spectrum.clone(), OutlierOutcome::NotFound));
    }

    let scores = peak_scores(spectrum)?;
    let mut peak = candidates[0];
    for &i in &candidates[1..] {
        if scores[i] > scores[peak] {
            peak = i;
        }
    }

    let first = peak.saturating_sub(window.buffer);
    let last = peak.saturating_add(window.buffer).min(reference.len() - 1);
    let indices: Vec<usize> = (first..=last).collect();
    let wavelengths = indices.iter().map(|&i| reference[i]).collect();

    let keep: Vec<usize> = (0..reference.len())
        .filter(|i| !(first..=last).contains(i))
        .collect();

    Ok((
        spectrum.select_samples(&keep),
        OutlierOutcome::Excised {
            peak,
            indices,
            wavelengths,
        },
    ))
}
