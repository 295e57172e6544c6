//! # Spectrum Cleaning Stages
//!
//! Pure functions over a [`Spectrum`](crate::spectrum::Spectrum). Each stage
//! borrows its input and returns a new spectrum; wavelength, flux and error are
//! always resized together.
//!
//! | Stage | Function | Removes |
//! |-------|----------|---------|
//! | Range clip | [`clip_wavelength`] | samples outside `[min, max]` |
//! | NaN scrub | [`scrub_nan`] | samples (x1d) or rows / integrations (x1dints) with NaN flux |
//! | Unit conversion | [`convert_flux`] | nothing, rescales flux and error |
//! | Outlier excision | [`excise_outlier`] | a window of samples around the brightest point in a range |

mod clip;
mod nan;
mod outlier;
mod units;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use clip::clip_wavelength;
pub use nan::{scrub_nan, NanAxis};
pub use outlier::{excise_outlier, OutlierOutcome, OutlierWindow};
pub use units::{convert_flux, jansky_to_w_m2_um, SPEED_OF_LIGHT_UM_PER_S};

/// Inclusive wavelength interval in microns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct WavelengthRange {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl WavelengthRange {
    /// Create a range from its bounds
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True if `min <= wavelength <= max`
    pub fn contains(&self, wavelength: f64) -> bool {
        self.min <= wavelength && wavelength <= self.max
    }
}

impl From<(f64, f64)> for WavelengthRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self { min, max }
    }
}

impl From<WavelengthRange> for (f64, f64) {
    fn from(range: WavelengthRange) -> Self {
        (range.min, range.max)
    }
}
