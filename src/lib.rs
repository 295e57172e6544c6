//! # jwstfits - JWST NIRSpec Spectrum Extraction
//!
//! `jwstfits` reads extracted 1-D spectra from JWST NIRSpec calibration
//! products, cleans them and hands them back as arrays, an Arrow table or a
//! labeled datacube.
//!
//! ## Key Features
//!
//! - **Two product kinds**: single-exposure `x1d` files (one spectrum) and
//!   time-series `x1dints` files (one spectrum per integration, stacked into
//!   `(n, t)` arrays with a relative time axis in hours).
//!
//! - **Structural detection**: extensions are found by `EXTNAME` and declared
//!   columns, never by position or by file name.
//!
//! - **Cleaning stages**: wavelength clipping, axis-aware NaN removal, Jy to
//!   W/m2/um conversion and excision of a known artifact around its peak.
//!
//! - **Structured diagnostics**: stage outcomes are events sent to a
//!   [`pipeline::DiagnosticSink`], forwarded to `log` by default.
//!
//! - **FITS through cfitsio**: tables are read and written with the `fitsio`
//!   crate behind a small [`fits::ExtensionSource`] trait.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jwstfits::prelude::*;
//!
//! let config = ExtractionConfig::default()
//!     .with_wavelength_range(2.87, 5.1)
//!     .with_kick_nan(true)
//!     .with_flux_unit(FluxUnit::WattsPerSquareMetrePerMicron)
//!     .with_outlier(3.10, 3.15, 2);
//!
//! let output = extract_x1dints("jw01366004001_04101_00001-seg001_nrs1_x1dints.fits", &config)?;
//! if let Some(arrays) = output.as_arrays() {
//!     println!("flux shape: {:?}", arrays.flux.shape());
//! }
//! # Ok::<(), jwstfits::error::ExtractError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`fits`]: FITS header and binary table access ([`fits::FitsFile`])
//! - [`spectrum`]: the [`spectrum::Spectrum`] data model and flux units
//! - [`extract`]: locating extensions and assembling arrays
//! - [`processing`]: clip, NaN scrub, unit conversion, outlier excision
//! - [`output`]: arrays, Arrow dataframe and datacube representations
//! - [`pipeline`]: configuration, orchestration and diagnostics
//!
//! ## Array Layout
//!
//! | Kind | wavelength / flux / flux_error | time |
//! |------|--------------------------------|------|
//! | x1d | `(n,)` | none |
//! | x1dints | `(n, t)`, axis 1 is integration | `(t,)` hours since first integration |

#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod extract;
pub mod fits;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod spectrum;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::error::{ExtractError, Result};
    pub use crate::extract::{ExtensionSchema, FileKind};
    pub use crate::fits::{ExtensionSource, FitsFile};
    pub use crate::output::{Datacube, OutputFormat, SpectrumArrays, SpectrumOutput};
    pub use crate::pipeline::{
        extract_x1d, extract_x1dints, Diagnostic, DiagnosticSink, ExtractionConfig, Extractor,
        LogSink, NullSink,
    };
    pub use crate::processing::{NanAxis, WavelengthRange};
    pub use crate::spectrum::{FluxUnit, Spectrum};
}
