use ndarray::Zip;

use crate::error::{ExtractError, Result};
use crate::spectrum::{FluxUnit, Spectrum};

/// Speed of light in microns per second
pub const SPEED_OF_LIGHT_UM_PER_S: f64 = 2.9979e14;

/// Convert a flux density in Jy at `wavelength_um` to W m⁻² µm⁻¹
pub fn jansky_to_w_m2_um(flux_jy: f64, wavelength_um: f64) -> f64 {
    (SPEED_OF_LIGHT_UM_PER_S * flux_jy) / (wavelength_um * wavelength_um) * 1e-26
}

/// Rescale flux and flux error to `target`.
///
/// Only Jy → W/m2/um is implemented. The error is scaled with the same factor
/// as the flux. Requesting the current unit returns an unchanged copy; any
/// other pair fails with [`ExtractError::UnsupportedUnitError`].
pub fn convert_flux(spectrum: &Spectrum, target: FluxUnit) -> Result<Spectrum> {
    let current = spectrum.flux_unit();
    match (current, target) {
        (a, b) if a == b => Ok(spectrum.clone()),
        (FluxUnit::Jansky, FluxUnit::WattsPerSquareMetrePerMicron) => {
            let wavelength = spectrum.wavelength();
            let flux = Zip::from(&spectrum.flux())
                .and(&wavelength)
                .map_collect(|&f, &w| jansky_to_w_m2_um(f, w));
            let flux_error = Zip::from(&spectrum.flux_error())
                .and(&wavelength)
                .map_collect(|&e, &w| jansky_to_w_m2_um(e, w));
            spectrum.with_flux(flux, flux_error, target)
        }
        _ => Err(ExtractError::UnsupportedUnitError(format!(
            "{target} (no conversion from {current})"
        ))),
    }
}
