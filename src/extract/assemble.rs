use log::debug;
use ndarray::{Array1, Array2, ArrayView1};

use super::schema::ExtensionSchema;
use crate::error::{ExtractError, Result};
use crate::fits::ExtensionSource;
use crate::spectrum::{FluxUnit, Spectrum};

/// Hours elapsed since the first entry of a BJD (days) time column
pub fn relative_hours(bjd: &[f64]) -> Array1<f64> {
    match bjd.first() {
        Some(&t0) => bjd.iter().map(|t| (t - t0) * 24.0).collect(),
        None => Array1::zeros(0),
    }
}

/// Check that the flux column of extension `index` holds Jy.
///
/// A column without `TUNITn` is taken to be in Jy. Any other declared unit is
/// rejected rather than relabelled, since every later stage assumes Jy input.
fn require_native_unit<S: ExtensionSource + ?Sized>(
    source: &S,
    index: usize,
    schema: &ExtensionSchema,
) -> Result<()> {
    let declared = source.extensions()[index]
        .column(&schema.flux_column)
        .and_then(|c| c.unit.as_deref());
    match declared {
        None => Ok(()),
        Some(unit) if unit.parse::<FluxUnit>().ok() == Some(FluxUnit::NATIVE) => Ok(()),
        Some(unit) => Err(ExtractError::DataError(format!(
            "{}: extension {} declares {} in '{}', expected {}",
            source.describe(),
            index,
            schema.flux_column,
            unit,
            FluxUnit::NATIVE
        ))),
    }
}

fn first_spectral<S: ExtensionSource + ?Sized>(
    source: &S,
    schema: &ExtensionSchema,
) -> Result<Vec<usize>> {
    let spectral = schema.spectral_extensions(source.extensions());
    if spectral.is_empty() {
        return Err(ExtractError::InputError(format!(
            "{}: no {} extension with {}, {} and {} columns",
            source.describe(),
            schema.spectrum_extension,
            schema.wavelength_column,
            schema.flux_column,
            schema.flux_error_column
        )));
    }
    Ok(spectral)
}

/// Read a single-exposure (x1d) spectrum from the first spectrum table.
///
/// Fails with [`ExtractError::DataError`] if the flux column holds no finite
/// value at all.
pub fn assemble_single<S: ExtensionSource + ?Sized>(
    source: &mut S,
    schema: &ExtensionSchema,
) -> Result<Spectrum> {
    let index = first_spectral(source, schema)?[0];
    require_native_unit(source, index, schema)?;

    let wavelength = source.read_column(index, &schema.wavelength_column)?;
    let flux = source.read_column(index, &schema.flux_column)?;
    let flux_error = source.read_column(index, &schema.flux_error_column)?;

    if !flux.iter().any(|f| f.is_finite()) {
        return Err(ExtractError::DataError(format!(
            "{}: flux array contains no finite values; check the input file or extraction pipeline",
            source.describe()
        )));
    }

    debug!(
        "Read {} samples from extension {} of {}",
        flux.len(),
        index,
        source.describe()
    );

    Spectrum::from_parts(
        Array1::from(wavelength).into_dyn(),
        Array1::from(flux).into_dyn(),
        Array1::from(flux_error).into_dyn(),
        None,
        FluxUnit::NATIVE,
    )
}

/// Read a time-series (x1dints) spectrum.
///
/// The integration times come from the time table and are converted to hours
/// relative to the first integration. One spectrum table is read per
/// integration and stacked as column `j` of `(n, t)` arrays.
pub fn assemble_series<S: ExtensionSource + ?Sized>(
    source: &mut S,
    schema: &ExtensionSchema,
) -> Result<Spectrum> {
    let time_index = schema.time_extension(source.extensions()).ok_or_else(|| {
        ExtractError::InputError(format!(
            "{}: no {} extension with a {} column; not a time-series (x1dints) file",
            source.describe(),
            schema.time_extension,
            schema.time_column
        ))
    })?;
    let spectral = first_spectral(source, schema)?;

    let bjd = source.read_column(time_index, &schema.time_column)?;
    let time = relative_hours(&bjd);
    let n_times = time.len();

    if spectral.len() < n_times {
        return Err(ExtractError::DataError(format!(
            "{}: {} integrations listed but only {} {} extensions present",
            source.describe(),
            n_times,
            spectral.len(),
            schema.spectrum_extension
        )));
    }

    let n_samples = source.extensions()[spectral[0]].rows();
    let mut wavelength = Array2::<f64>::zeros((n_samples, n_times));
    let mut flux = Array2::<f64>::zeros((n_samples, n_times));
    let mut flux_error = Array2::<f64>::zeros((n_samples, n_times));

    for (j, &index) in spectral.iter().take(n_times).enumerate() {
        require_native_unit(source, index, schema)?;
        for (target, column) in [
            (&mut wavelength, &schema.wavelength_column),
            (&mut flux, &schema.flux_column),
            (&mut flux_error, &schema.flux_error_column),
        ] {
            let values = source.read_column(index, column)?;
            if values.len() != n_samples {
                return Err(ExtractError::ShapeError(format!(
                    "integration {} has {} {} samples, expected {}",
                    j,
                    values.len(),
                    column,
                    n_samples
                )));
            }
            target.column_mut(j).assign(&ArrayView1::from(&values));
        }
    }

    debug!(
        "Stacked {} integrations of {} samples from {}",
        n_times,
        n_samples,
        source.describe()
    );

    Spectrum::from_parts(
        wavelength.into_dyn(),
        flux.into_dyn(),
        flux_error.into_dyn(),
        Some(time),
        FluxUnit::NATIVE,
    )
}
