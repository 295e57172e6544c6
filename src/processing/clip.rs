use crate::error::Result;
use crate::spectrum::Spectrum;

use super::WavelengthRange;

/// Keep the samples whose wavelength lies in `range`.
///
/// For time series the mask comes from the first integration and selects whole
/// rows. An empty result is not an error.
pub fn clip_wavelength(spectrum: &Spectrum, range: WavelengthRange) -> Result<Spectrum> {
    let reference = spectrum.reference_wavelength()?;
    let keep: Vec<usize> = reference
        .iter()
        .enumerate()
        .filter(|&(_, &w)| range.contains(w))
        .map(|(i, _)| i)
        .collect();
    Ok(spectrum.select_samples(&keep))
}
