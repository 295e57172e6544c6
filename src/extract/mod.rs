//! # Spectrum Assembler
//!
//! Builds a [`Spectrum`](crate::spectrum::Spectrum) from the table extensions
//! exposed by an [`ExtensionSource`](crate::fits::ExtensionSource).
//!
//! - **x1d**: the first spectrum table yields 1-D wavelength, flux and error.
//! - **x1dints**: the integration time table yields a relative time axis in
//!   hours; one spectrum table per integration is stacked into `(n, t)` arrays.
//!
//! Extensions are resolved through [`ExtensionSchema`] by name, and
//! [`FileKind::detect`] tells the two products apart from the file's own
//! structure.

mod assemble;
mod schema;


pub use assemble::{assemble_series, assemble_single, relative_hours};
pub use schema::{ExtensionSchema, FileKind};
