//! # Extraction Pipeline
//!
//! Wires the stages together:
//!
//! ```text
//! assemble -> clip -> scrub NaN -> convert units -> excise outlier -> render
//! ```
//!
//! Each stage after assembly is optional and driven by [`ExtractionConfig`].
//! The FITS handle is held only while columns are read and is closed before
//! cleaning starts, on success and on error alike. Stage outcomes are
//! reported to a [`DiagnosticSink`] rather than printed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use jwstfits::pipeline::{ExtractionConfig, Extractor, LogSink};
//! use jwstfits::output::OutputFormat;
//!
//! let config = ExtractionConfig::default()
//!     .with_wavelength_range(2.8, 5.1)
//!     .with_kick_nan(true)
//!     .with_output(OutputFormat::Datacube);
//!
//! let output = Extractor::new(config)
//!     .extract("jw01366_nrs1_x1dints.fits", None, &mut LogSink)?;
//! # Ok::<(), jwstfits::error::ExtractError>(())
//! ```

mod config;
mod diagnostics;


use std::path::Path;

use crate::error::Result;
use crate::extract::{assemble_series, assemble_single, ExtensionSchema, FileKind};
use crate::fits::{ExtensionSource, FitsFile};
use crate::output::SpectrumOutput;
use crate::processing::{
    clip_wavelength, convert_flux, excise_outlier, scrub_nan, NanAxis, OutlierOutcome,
};
use crate::spectrum::{FluxUnit, Spectrum};

pub use crate::processing::WavelengthRange;
pub use config::ExtractionConfig;
pub use diagnostics::{Diagnostic, DiagnosticSink, LogSink, NullSink};

/// Runs the extraction pipeline with a fixed schema and configuration
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    schema: ExtensionSchema,
    config: ExtractionConfig,
}

impl Extractor {
    /// Extractor using the standard x1d / x1dints schema
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            schema: ExtensionSchema::default(),
            config,
        }
    }

    /// Use different extension and column names
    pub fn with_schema(mut self, schema: ExtensionSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Active schema
    pub fn schema(&self) -> &ExtensionSchema {
        &self.schema
    }

    /// Extract from a FITS file on disk.
    ///
    /// `kind` forces single-exposure or time-series reading; `None` detects it
    /// from the file's extensions.
    pub fn extract<P: AsRef<Path>>(
        &self,
        path: P,
        kind: Option<FileKind>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<SpectrumOutput> {
        let mut file = FitsFile::open(path)?;
        let assembled = self.assemble(&mut file, kind, sink);
        file.close();

        let (kind, spectrum) = assembled?;
        let spectrum = self.clean(spectrum, kind, sink)?;
        SpectrumOutput::render(spectrum, self.config.output)
    }

    /// Extract from any extension source
    pub fn extract_source<S: ExtensionSource + ?Sized>(
        &self,
        source: &mut S,
        kind: Option<FileKind>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<SpectrumOutput> {
        let (kind, spectrum) = self.assemble(source, kind, sink)?;
        let spectrum = self.clean(spectrum, kind, sink)?;
        SpectrumOutput::render(spectrum, self.config.output)
    }

    /// Read the arrays for `kind` (or the detected kind) from `source`
    pub fn assemble<S: ExtensionSource + ?Sized>(
        &self,
        source: &mut S,
        kind: Option<FileKind>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(FileKind, Spectrum)> {
        let kind = match kind {
            Some(kind) => kind,
            None => FileKind::detect(source.extensions(), &self.schema)?,
        };
        let spectrum = match kind {
            FileKind::SingleExposure => assemble_single(source, &self.schema)?,
            FileKind::TimeSeries => assemble_series(source, &self.schema)?,
        };

        sink.emit(Diagnostic::Assembled {
            kind,
            samples: spectrum.len(),
            integrations: spectrum.integrations(),
        });
        Ok((kind, spectrum))
    }

    /// Apply the configured cleaning stages to an assembled spectrum.
    ///
    /// Flux is expected in [`FluxUnit::NATIVE`]; conversion runs only when the
    /// configuration asks for another unit.
    pub fn clean(
        &self,
        spectrum: Spectrum,
        kind: FileKind,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Spectrum> {
        let config = &self.config;
        let mut spectrum = spectrum;

        if let Some(range) = config.wavelength_range {
            let before = spectrum.len();
            spectrum = clip_wavelength(&spectrum, range)?;
            sink.emit(Diagnostic::Clipped {
                range,
                kept: spectrum.len(),
                removed: before - spectrum.len(),
            });
        }

        if config.kick_nan {
            let axis = config.nan_axis.unwrap_or_else(|| NanAxis::default_for(kind));
            let counted = |s: &Spectrum| match (axis, s.integrations()) {
                (NanAxis::Wavelength, Some(t)) => t,
                _ => s.len(),
            };
            let before = counted(&spectrum);
            spectrum = scrub_nan(&spectrum, axis)?;
            sink.emit(Diagnostic::NanScrubbed {
                axis,
                removed: before - counted(&spectrum),
            });
        }

        if config.flux_unit != FluxUnit::NATIVE {
            let from = spectrum.flux_unit();
            spectrum = convert_flux(&spectrum, config.flux_unit)?;
            sink.emit(Diagnostic::FluxConverted {
                from,
                to: config.flux_unit,
            });
        }

        if let Some(window) = config.outlier_window() {
            let (cleaned, outcome) = excise_outlier(&spectrum, &window)?;
            spectrum = cleaned;
            sink.emit(match outcome {
                OutlierOutcome::NotFound => Diagnostic::OutlierNotFound {
                    range: window.range,
                },
                OutlierOutcome::Excised {
                    peak, wavelengths, ..
                } => Diagnostic::OutlierExcised { peak, wavelengths },
            });
        }

        Ok(spectrum)
    }
}

/// Extract a single-exposure (x1d) spectrum, logging diagnostics
pub fn extract_x1d<P: AsRef<Path>>(path: P, config: &ExtractionConfig) -> Result<SpectrumOutput> {
    Extractor::new(config.clone()).extract(path, Some(FileKind::SingleExposure), &mut LogSink)
}

/// Extract a time-series (x1dints) spectrum, logging diagnostics
pub fn extract_x1dints<P: AsRef<Path>>(
    path: P,
    config: &ExtractionConfig,
) -> Result<SpectrumOutput> {
    Extractor::new(config.clone()).extract(path, Some(FileKind::TimeSeries), &mut LogSink)
}
