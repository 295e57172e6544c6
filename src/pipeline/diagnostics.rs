use log::{debug, info, warn};

use crate::extract::FileKind;
use crate::processing::{NanAxis, WavelengthRange};
use crate::spectrum::FluxUnit;

/// Something a pipeline stage did, reported instead of printed
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Arrays were read from the file
    Assembled {
        /// Kind the file was read as
        kind: FileKind,
        /// Wavelength samples per integration
        samples: usize,
        /// Integrations stacked, time series only
        integrations: Option<usize>,
    },
    /// Samples outside a wavelength range were dropped
    Clipped {
        /// Range kept
        range: WavelengthRange,
        /// Samples kept
        kept: usize,
        /// Samples dropped
        removed: usize,
    },
    /// Rows or integrations containing NaN flux were dropped
    NanScrubbed {
        /// Axis the NaN test ran across
        axis: NanAxis,
        /// Samples (1-D, or rows for `Time`) or integrations (`Wavelength`) dropped
        removed: usize,
    },
    /// Flux and error were rescaled
    FluxConverted {
        /// Unit before conversion
        from: FluxUnit,
        /// Unit after conversion
        to: FluxUnit,
    },
    /// No sample lay in the suspect outlier range
    OutlierNotFound {
        /// Range searched
        range: WavelengthRange,
    },
    /// A window around the outlier peak was removed
    OutlierExcised {
        /// Peak sample index before removal
        peak: usize,
        /// Wavelengths of the removed samples
        wavelengths: Vec<f64>,
    },
}

/// Receiver for pipeline [`Diagnostic`]s
pub trait DiagnosticSink {
    /// Accept one event
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::Assembled {
                kind,
                samples,
                integrations: Some(t),
            } => info!("Assembled {} spectrum: {} samples x {} integrations", kind, samples, t),
            Diagnostic::Assembled { kind, samples, .. } => {
                info!("Assembled {} spectrum: {} samples", kind, samples)
            }
            Diagnostic::Clipped {
                range,
                kept,
                removed,
            } => debug!(
                "Clipped to [{}, {}] um: kept {}, removed {}",
                range.min, range.max, kept, removed
            ),
            Diagnostic::NanScrubbed { axis, removed } => {
                debug!("NaN scrub along {:?} axis removed {}", axis, removed)
            }
            Diagnostic::FluxConverted { from, to } => debug!("Converted flux {} -> {}", from, to),
            Diagnostic::OutlierNotFound { range } => warn!(
                "No samples found in outlier range [{}, {}] um",
                range.min, range.max
            ),
            Diagnostic::OutlierExcised { peak, wavelengths } => info!(
                "Outlier clip around index {}: removing wavelengths {:?}",
                peak, wavelengths
            ),
        }
    }
}

/// Discards every diagnostic
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
