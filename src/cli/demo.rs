use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use jwstfits::fits::{BinTableWriter, HeaderValue, TableColumn};

/// First mid-integration time of the synthetic series (BJD_TDB)
const START_BJD: f64 = 2_460_000.25;
/// Integration cadence in days (63 s)
const CADENCE_DAYS: f64 = 63.0 / 86_400.0;
/// Wavelength of the synthetic detector artifact (microns)
const ARTIFACT_UM: f64 = 3.125;

/// Write a synthetic x1d (`integrations == 0`) or x1dints file
pub fn run(output: PathBuf, integrations: usize, samples: usize) -> Result<()> {
    info!("jwstfits - synthetic NIRSpec product");
    info!("=====================================");

    let exposure = if integrations == 0 { "x1d" } else { "x1dints" };
    info!("Creating {} file: {}", exposure, output.display());

    let mut writer = BinTableWriter::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let primary_keys = [
        ("TELESCOP", HeaderValue::String("JWST".to_string())),
        ("INSTRUME", HeaderValue::String("NIRSPEC".to_string())),
        ("EXP_TYPE", HeaderValue::String("NRS_BRIGHTOBJ".to_string())),
        ("NINTS", HeaderValue::Integer(integrations as i64)),
    ];
    for (keyword, value) in primary_keys {
        writer
            .write_primary_key(keyword, value)
            .with_context(|| format!("Failed to write primary keyword {}", keyword))?;
    }

    let wavelength = wavelength_grid(samples);

    if integrations > 0 {
        let times: Vec<f64> = (0..integrations)
            .map(|j| START_BJD + j as f64 * CADENCE_DAYS)
            .collect();
        writer
            .write_table(
                "INT_TIMES",
                &[TableColumn::new("int_mid_BJD_TDB", &times).with_unit("d")],
            )
            .context("Failed to write INT_TIMES table")?;
    }

    for j in 0..integrations.max(1) {
        let depth = transit_depth(j, integrations);
        let (flux, error) = synthetic_flux(&wavelength, depth);
        writer
            .write_table(
                "EXTRACT1D",
                &[
                    TableColumn::new("WAVELENGTH", &wavelength).with_unit("um"),
                    TableColumn::new("FLUX", &flux).with_unit("Jy"),
                    TableColumn::new("FLUX_ERROR", &error).with_unit("Jy"),
                ],
            )
            .with_context(|| format!("Failed to write EXTRACT1D table {}", j + 1))?;
    }

    let tables = writer.tables_written();
    writer.finish().context("Failed to finalize FITS file")?;

    let file_size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    info!("Demo file complete!");
    info!("  Output file: {}", output.display());
    info!("  Table extensions: {}", tables);
    info!("  Samples per spectrum: {}", samples);
    info!("  File size: {} bytes", file_size);

    Ok(())
}

/// Linear grid over the G395H band, 2.87 - 5.27 um
fn wavelength_grid(samples: usize) -> Vec<f64> {
    let (lo, hi) = (2.87, 5.27);
    let step = if samples > 1 {
        (hi - lo) / (samples - 1) as f64
    } else {
        0.0
    };
    (0..samples).map(|i| lo + i as f64 * step).collect()
}

/// Fractional flux deficit of a box-shaped transit over the middle third
fn transit_depth(integration: usize, integrations: usize) -> f64 {
    if integrations < 3 {
        return 0.0;
    }
    let third = integrations / 3;
    if (third..integrations - third).contains(&integration) {
        0.01
    } else {
        0.0
    }
}

/// Smooth stellar continuum in Jy with NaN edge samples and one bright artifact
fn synthetic_flux(wavelength: &[f64], depth: f64) -> (Vec<f64>, Vec<f64>) {
    let n = wavelength.len();
    let artifact = wavelength
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (*a - ARTIFACT_UM)
                .abs()
                .total_cmp(&(*b - ARTIFACT_UM).abs())
        })
        .map(|(i, _)| i);

    let mut flux = Vec::with_capacity(n);
    let mut error = Vec::with_capacity(n);
    for (i, &w) in wavelength.iter().enumerate() {
        let continuum = 0.25 * (2.87 / w).powi(2) * (1.0 + 0.02 * (w * 7.0).sin());
        let value = if i < 2 || i + 2 >= n {
            f64::NAN
        } else if Some(i) == artifact {
            continuum * 40.0
        } else {
            continuum * (1.0 - depth)
        };
        flux.push(value);
        error.push(continuum * 0.002);
    }
    (flux, error)
}
