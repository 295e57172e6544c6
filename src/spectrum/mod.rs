//! # Spectrum Data Model
//!
//! A [`Spectrum`] holds wavelength, flux and flux error arrays of identical
//! shape, plus an optional relative time axis:
//!
//! | Kind | `wavelength` / `flux` / `flux_error` | `time` |
//! |------|--------------------------------------|--------|
//! | x1d (single exposure) | 1-D, `(n,)` | `None` |
//! | x1dints (time series) | 2-D, `(n, t)` | `Some`, length `t` |
//!
//! For time series, axis 0 indexes wavelength samples and axis 1 indexes
//! integrations. The wavelength grid is assumed identical across integrations,
//! so column 0 is the reference for every wavelength-based decision.
//!
//! Construction validates that the three arrays share one shape and that the
//! time axis matches the second dimension. Processing stages never mutate a
//! spectrum in place; they build a new one.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, ArrayD, ArrayViewD, Axis, Ix1};
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// Physical unit of the flux and flux error arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FluxUnit {
    /// Jansky, spectral flux density (native unit of x1d products)
    #[default]
    Jansky,
    /// W m⁻² µm⁻¹, energy flux per unit wavelength
    WattsPerSquareMetrePerMicron,
}

impl FluxUnit {
    /// Unit of the flux columns in x1d / x1dints products
    pub const NATIVE: FluxUnit = FluxUnit::Jansky;

    /// Canonical label, as written in output metadata
    pub fn label(&self) -> &'static str {
        match self {
            FluxUnit::Jansky => "Jy",
            FluxUnit::WattsPerSquareMetrePerMicron => "W/m2/um",
        }
    }
}

impl fmt::Display for FluxUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FluxUnit {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Jy" | "jy" | "JY" => Ok(FluxUnit::Jansky),
            "W/m2/um" | "W/m²/μm" | "W/m²/µm" | "W m-2 um-1" => {
                Ok(FluxUnit::WattsPerSquareMetrePerMicron)
            }
            other => Err(ExtractError::UnsupportedUnitError(other.to_string())),
        }
    }
}

impl TryFrom<String> for FluxUnit {
    type Error = ExtractError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FluxUnit> for String {
    fn from(unit: FluxUnit) -> Self {
        unit.label().to_string()
    }
}

/// Calibrated 1-D spectrum, or a stack of them over time
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    wavelength: ArrayD<f64>,
    flux: ArrayD<f64>,
    flux_error: ArrayD<f64>,
    time: Option<Array1<f64>>,
    flux_unit: FluxUnit,
}

impl Spectrum {
    /// Build a single-exposure spectrum from 1-D arrays
    pub fn single(
        wavelength: Array1<f64>,
        flux: Array1<f64>,
        flux_error: Array1<f64>,
    ) -> Result<Self> {
        Self::from_parts(
            wavelength.into_dyn(),
            flux.into_dyn(),
            flux_error.into_dyn(),
            None,
            FluxUnit::Jansky,
        )
    }

    /// Build a time-series spectrum from `(n, t)` arrays and a length-`t` time axis
    pub fn series(
        wavelength: Array2<f64>,
        flux: Array2<f64>,
        flux_error: Array2<f64>,
        time: Array1<f64>,
    ) -> Result<Self> {
        Self::from_parts(
            wavelength.into_dyn(),
            flux.into_dyn(),
            flux_error.into_dyn(),
            Some(time),
            FluxUnit::Jansky,
        )
    }

    /// Build a spectrum from arrays of any rank, checking shape agreement
    pub fn from_parts(
        wavelength: ArrayD<f64>,
        flux: ArrayD<f64>,
        flux_error: ArrayD<f64>,
        time: Option<Array1<f64>>,
        flux_unit: FluxUnit,
    ) -> Result<Self> {
        let spectrum = Self {
            wavelength,
            flux,
            flux_error,
            time,
            flux_unit,
        };
        spectrum.validate()?;
        Ok(spectrum)
    }

    /// Check that the three arrays share one shape and that the time axis, if
    /// any, matches the second dimension.
    pub fn validate(&self) -> Result<()> {
        let shape = self.flux.shape();
        if self.wavelength.shape() != shape || self.flux_error.shape() != shape {
            return Err(ExtractError::ShapeError(format!(
                "wavelength {:?}, flux {:?} and flux_error {:?} must share one shape",
                self.wavelength.shape(),
                shape,
                self.flux_error.shape()
            )));
        }
        if let Some(time) = &self.time {
            if shape.len() != 2 || shape[1] != time.len() {
                return Err(ExtractError::ShapeError(format!(
                    "time axis of length {} does not match flux shape {:?}",
                    time.len(),
                    shape
                )));
            }
        }
        Ok(())
    }

    /// Wavelength in microns
    pub fn wavelength(&self) -> ArrayViewD<'_, f64> {
        self.wavelength.view()
    }

    /// Flux in [`Spectrum::flux_unit`]
    pub fn flux(&self) -> ArrayViewD<'_, f64> {
        self.flux.view()
    }

    /// Flux error in [`Spectrum::flux_unit`]
    pub fn flux_error(&self) -> ArrayViewD<'_, f64> {
        self.flux_error.view()
    }

    /// Hours since the first integration's mid-time (time series only)
    pub fn time(&self) -> Option<&Array1<f64>> {
        self.time.as_ref()
    }

    /// Unit shared by flux and flux error
    pub fn flux_unit(&self) -> FluxUnit {
        self.flux_unit
    }

    /// Array shape shared by wavelength, flux and flux error
    pub fn shape(&self) -> &[usize] {
        self.flux.shape()
    }

    /// Array rank (1 for x1d, 2 for x1dints)
    pub fn ndim(&self) -> usize {
        self.flux.ndim()
    }

    /// Number of wavelength samples (length of axis 0)
    pub fn len(&self) -> usize {
        self.flux.shape().first().copied().unwrap_or(0)
    }

    /// True if no samples remain
    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }

    /// True if this spectrum carries a time axis
    pub fn is_time_series(&self) -> bool {
        self.time.is_some()
    }

    /// Number of integrations, for time series
    pub fn integrations(&self) -> Option<usize> {
        self.time.as_ref().map(Array1::len)
    }

    /// Split into `(wavelength, flux, flux_error, time)`
    pub fn into_parts(
        self,
    ) -> (
        ArrayD<f64>,
        ArrayD<f64>,
        ArrayD<f64>,
        Option<Array1<f64>>,
    ) {
        (self.wavelength, self.flux, self.flux_error, self.time)
    }

    /// Wavelength vector used for range decisions: the array itself when 1-D,
    /// otherwise its first time column. A 2-D spectrum with no integrations
    /// yields NaN for every row so that no range ever matches.
    pub fn reference_wavelength(&self) -> Result<Array1<f64>> {
        match self.wavelength.ndim() {
            1 => Ok(self
                .wavelength
                .view()
                .into_dimensionality::<Ix1>()
                .map_err(|e| ExtractError::ShapeError(e.to_string()))?
                .to_owned()),
            2 if self.wavelength.shape()[1] == 0 => {
                Ok(Array1::from_elem(self.wavelength.shape()[0], f64::NAN))
            }
            2 => self
                .wavelength
                .index_axis(Axis(1), 0)
                .to_owned()
                .into_dimensionality::<Ix1>()
                .map_err(|e| ExtractError::ShapeError(e.to_string())),
            n => Err(ExtractError::ShapeError(format!(
                "wavelength array has unsupported rank {n}"
            ))),
        }
    }

    /// Keep the given wavelength samples (rows), in order, across all arrays
    pub(crate) fn select_samples(&self, indices: &[usize]) -> Self {
        Self {
            wavelength: self.wavelength.select(Axis(0), indices),
            flux: self.flux.select(Axis(0), indices),
            flux_error: self.flux_error.select(Axis(0), indices),
            time: self.time.clone(),
            flux_unit: self.flux_unit,
        }
    }

    /// Keep the given integrations (columns) and their time stamps
    pub(crate) fn select_integrations(&self, indices: &[usize]) -> Self {
        Self {
            wavelength: self.wavelength.select(Axis(1), indices),
            flux: self.flux.select(Axis(1), indices),
            flux_error: self.flux_error.select(Axis(1), indices),
            time: self.time.as_ref().map(|t| t.select(Axis(0), indices)),
            flux_unit: self.flux_unit,
        }
    }

    /// Replace flux and error, keeping wavelength and time
    pub(crate) fn with_flux(
        &self,
        flux: ArrayD<f64>,
        flux_error: ArrayD<f64>,
        flux_unit: FluxUnit,
    ) -> Result<Self> {
        Self::from_parts(
            self.wavelength.clone(),
            flux,
            flux_error,
            self.time.clone(),
            flux_unit,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, IxDyn};

    #[test]
    fn test_single_accessors() {
        let s = Spectrum::single(array![1.0, 2.0], array![3.0, 4.0], array![0.1, 0.2]).unwrap();
        assert_eq!(s.ndim(), 1);
        assert_eq!(s.len(), 2);
        assert!(!s.is_time_series());
        assert_eq!(s.integrations(), None);
        assert_eq!(s.flux_unit(), FluxUnit::Jansky);
        assert_eq!(s.reference_wavelength().unwrap(), array![1.0, 2.0]);
    }

    #[test]
    fn test_series_reference_is_first_column() {
        let w = array![[1.0, 1.01], [2.0, 2.01], [3.0, 3.01]];
        let s = Spectrum::series(w.clone(), w.clone(), w, array![0.0, 0.5]).unwrap();
        assert_eq!(s.shape(), &[3, 2]);
        assert_eq!(s.integrations(), Some(2));
        assert_eq!(s.reference_wavelength().unwrap(), array![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let result = Spectrum::single(array![1.0, 2.0], array![3.0], array![0.1, 0.2]);
        assert!(matches!(result, Err(ExtractError::ShapeError(_))));

        let w = Array2::<f64>::zeros((3, 2));
        let result = Spectrum::series(w.clone(), w.clone(), w, array![0.0, 1.0, 2.0]);
        assert!(matches!(result, Err(ExtractError::ShapeError(_))));
    }

    #[test]
    fn test_rank_three_reference_fails() {
        let cube = ArrayD::<f64>::zeros(IxDyn(&[2, 2, 2]));
        let s = Spectrum::from_parts(cube.clone(), cube.clone(), cube, None, FluxUnit::Jansky)
            .unwrap();
        assert!(matches!(
            s.reference_wavelength(),
            Err(ExtractError::ShapeError(_))
        ));
    }

    #[test]
    fn test_empty_series_reference() {
        let w = Array2::<f64>::zeros((4, 0));
        let s = Spectrum::series(w.clone(), w.clone(), w, Array1::zeros(0)).unwrap();
        let reference = s.reference_wavelength().unwrap();
        assert_eq!(reference.len(), 4);
        assert!(reference.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_flux_unit_parsing() {
        assert_eq!("Jy".parse::<FluxUnit>().unwrap(), FluxUnit::Jansky);
        assert_eq!(
            "W/m²/μm".parse::<FluxUnit>().unwrap(),
            FluxUnit::WattsPerSquareMetrePerMicron
        );
        match "erg/s/cm2/A".parse::<FluxUnit>() {
            Err(ExtractError::UnsupportedUnitError(unit)) => assert_eq!(unit, "erg/s/cm2/A"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(FluxUnit::WattsPerSquareMetrePerMicron.to_string(), "W/m2/um");
    }
}
