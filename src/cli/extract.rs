use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use jwstfits::output::{
    write_csv, write_json, write_json_file, write_parquet, DataFrameWriterConfig, SpectrumArrays,
    SpectrumOutput,
};
use jwstfits::pipeline::{ExtractionConfig, Extractor, LogSink, WavelengthRange};
use jwstfits::spectrum::FluxUnit;

use super::config::Config;
use super::ExtractArgs;

fn range_arg(values: &[f64], flag: &str) -> Result<WavelengthRange> {
    match values {
        [lo, hi] => Ok(WavelengthRange::new(*lo, *hi)),
        _ => bail!("--{} expects exactly two values", flag),
    }
}

/// Extract and clean a spectrum
pub fn run(args: ExtractArgs) -> Result<()> {
    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let file_config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let mut config = file_config
        .extraction
        .apply(ExtractionConfig::default())
        .context("Invalid [extraction] settings")?;
    if let Some(values) = &args.wlrange {
        config.wavelength_range = Some(range_arg(values, "wlrange")?);
    }
    if args.kick_nan {
        config.kick_nan = true;
    }
    if let Some(unit) = &args.flux_unit {
        config.flux_unit = unit.parse::<FluxUnit>()?;
    }
    if let Some(output) = &args.output {
        config.output = output.parse()?;
    }
    if let Some(values) = &args.outlier {
        config.outlier = Some(range_arg(values, "outlier")?);
    }
    if let Some(buffer) = args.buffer {
        config.buffer = buffer;
    }

    info!("jwstfits - spectrum extraction");
    info!("==============================");
    info!("Input:  {}", args.input.display());
    info!("Output: {}", config.output);
    info!("Flux unit: {}", config.flux_unit);

    let extractor = Extractor::new(config).with_schema(file_config.schema);
    let output = extractor
        .extract(&args.input, args.kind.file_kind(), &mut LogSink)
        .with_context(|| format!("Extraction failed for {}", args.input.display()))?;

    match output {
        SpectrumOutput::Arrays(arrays) => {
            if let Some(out) = &args.out {
                warn!(
                    "--out {} ignored for arrays output; use dataframe or datacube",
                    out.display()
                );
            }
            print_summary(&arrays);
        }
        SpectrumOutput::DataFrame(batch) => match &args.out {
            Some(out) => match extension(out).as_deref() {
                Some("parquet") => {
                    let file = File::create(out)
                        .with_context(|| format!("Failed to create {}", out.display()))?;
                    write_parquet(&batch, file, &DataFrameWriterConfig::default())
                        .context("Failed to write Parquet output")?;
                    info!("Wrote {} rows to {}", batch.num_rows(), out.display());
                }
                Some("csv") => {
                    let file = File::create(out)
                        .with_context(|| format!("Failed to create {}", out.display()))?;
                    write_csv(&batch, BufWriter::new(file)).context("Failed to write CSV output")?;
                    info!("Wrote {} rows to {}", batch.num_rows(), out.display());
                }
                _ => bail!(
                    "Cannot infer dataframe format from {}; use .parquet or .csv",
                    out.display()
                ),
            },
            None => write_csv(&batch, io::stdout().lock()).context("Failed to write CSV output")?,
        },
        SpectrumOutput::Datacube(cube) => match &args.out {
            Some(out) => {
                write_json_file(&cube, out).context("Failed to write JSON output")?;
                info!("Wrote datacube to {}", out.display());
            }
            None => write_json(&cube, io::stdout().lock()).context("Failed to write JSON output")?,
        },
    }

    Ok(())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

fn finite_range<'a>(values: impl Iterator<Item = &'a f64>) -> Option<(f64, f64)> {
    values
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn print_summary(arrays: &SpectrumArrays) {
    println!("Spectrum Summary");
    println!("================");
    println!("Shape: {:?}", arrays.flux.shape());
    match finite_range(arrays.wavelength.iter()) {
        Some((lo, hi)) => println!("Wavelength: {:.4} - {:.4} um", lo, hi),
        None => println!("Wavelength: <empty>"),
    }
    match finite_range(arrays.flux.iter()) {
        Some((lo, hi)) => println!("Flux: {:.4e} - {:.4e} {}", lo, hi, arrays.flux_unit),
        None => println!("Flux: <no finite values>"),
    }
    let nan_count = arrays.flux.iter().filter(|f| f.is_nan()).count();
    println!("NaN flux samples: {}", nan_count);
    if let Some(time) = &arrays.time {
        match finite_range(time.iter()) {
            Some((lo, hi)) => println!(
                "Integrations: {} ({:.3} - {:.3} h)",
                time.len(),
                lo,
                hi
            ),
            None => println!("Integrations: 0"),
        }
    }
}
