//! End-to-end extraction tests against FITS files written to disk

use std::fs::File;
use std::path::Path;

use arrow::array::Float64Array;
use jwstfits::fits::{BinTableWriter, FitsFile, HeaderValue, TableColumn};
use jwstfits::output::{columns, write_parquet, DataFrameWriterConfig, OutputFormat};
use jwstfits::prelude::*;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tempfile::tempdir;

const SAMPLES: usize = 30;

fn wavelength() -> Vec<f64> {
    (0..SAMPLES).map(|i| 3.0 + i as f64 * 0.01).collect()
}

/// Flux for integration `j`: flat 2 Jy, a spike of 90 Jy at sample 12, and a
/// NaN at sample 0 for integration 2 only.
fn flux(j: usize) -> Vec<f64> {
    (0..SAMPLES)
        .map(|i| match (i, j) {
            (0, 2) => f64::NAN,
            (12, _) => 90.0,
            _ => 2.0 + j as f64 * 0.001,
        })
        .collect()
}

/// Writes an x1dints-shaped file. With `time_last` the time table is written
/// after the spectra, so positional lookup would read the wrong extension.
fn write_series(path: &Path, integrations: usize, time_last: bool) {
    let w = wavelength();
    let errors = vec![0.05; SAMPLES];
    let times: Vec<f64> = (0..integrations)
        .map(|j| 2_459_800.0 + j as f64 / 96.0)
        .collect();

    let mut writer = BinTableWriter::create(path).unwrap();
    writer
        .write_primary_key("INSTRUME", HeaderValue::String("NIRSPEC".to_string()))
        .unwrap();
    let write_times = |writer: &mut BinTableWriter| {
        writer
            .write_table("INT_TIMES", &[TableColumn::new("int_mid_BJD_TDB", &times)])
            .unwrap();
    };
    if !time_last {
        write_times(&mut writer);
    }
    for j in 0..integrations {
        let f = flux(j);
        writer
            .write_table(
                "EXTRACT1D",
                &[
                    TableColumn::new("WAVELENGTH", &w).with_unit("um"),
                    TableColumn::new("FLUX", &f).with_unit("Jy"),
                    TableColumn::new("FLUX_ERROR", &errors).with_unit("Jy"),
                ],
            )
            .unwrap();
    }
    if time_last {
        write_times(&mut writer);
    }
    writer.finish().unwrap();
}

fn write_single(path: &Path, flux: &[f64]) {
    let w = wavelength();
    let errors = vec![0.05; flux.len()];
    let mut writer = BinTableWriter::create(path).unwrap();
    writer
        .write_table(
            "EXTRACT1D",
            &[
                TableColumn::new("WAVELENGTH", &w[..flux.len()]),
                TableColumn::new("FLUX", flux),
                TableColumn::new("FLUX_ERROR", &errors),
            ],
        )
        .unwrap();
    writer.finish().unwrap();
}

#[test]
fn test_series_detected_without_filename_hint() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("observation.fits");
    write_series(&path, 4, false);

    let mut events: Vec<Diagnostic> = Vec::new();
    let output = Extractor::default().extract(&path, None, &mut events).unwrap();
    let arrays = output.as_arrays().unwrap();

    assert_eq!(arrays.flux.shape(), &[SAMPLES, 4]);
    let time = arrays.time.as_ref().unwrap();
    assert_eq!(time.len(), 4);
    assert_eq!(time[0], 0.0);
    assert!((time[3] - 0.75).abs() < 1e-6);
    assert!(matches!(
        events[0],
        Diagnostic::Assembled {
            kind: FileKind::TimeSeries,
            integrations: Some(4),
            ..
        }
    ));
}

#[test]
fn test_named_lookup_ignores_extension_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("reordered_x1dints.fits");
    write_series(&path, 3, true);

    let output = extract_x1dints(&path, &ExtractionConfig::default()).unwrap();
    let arrays = output.as_arrays().unwrap();
    assert_eq!(arrays.wavelength.shape(), &[SAMPLES, 3]);
    assert_eq!(arrays.wavelength[[5, 2]], wavelength()[5]);
}

#[test]
fn test_series_full_cleaning() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("jw_test_x1dints.fits");
    write_series(&path, 5, false);

    let config = ExtractionConfig::default()
        .with_wavelength_range(3.0, 3.205)
        .with_kick_nan(true)
        .with_flux_unit(FluxUnit::WattsPerSquareMetrePerMicron)
        .with_outlier(3.115, 3.125, 1);

    let mut events: Vec<Diagnostic> = Vec::new();
    let output = Extractor::new(config)
        .extract(&path, None, &mut events)
        .unwrap();
    let arrays = output.as_arrays().unwrap();

    // 21 samples in range, integration 2 dropped, samples 11..=13 excised
    assert_eq!(arrays.flux.shape(), &[18, 4]);
    assert_eq!(arrays.time.as_ref().map(|t| t.len()), Some(4));
    assert_eq!(arrays.flux_unit, FluxUnit::WattsPerSquareMetrePerMicron);
    assert!(arrays.flux.iter().all(|f| f.is_finite()));
    assert!(events
        .iter()
        .any(|e| matches!(e, Diagnostic::OutlierExcised { peak: 12, .. })));
}

#[test]
fn test_dataframe_to_parquet() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("series.fits");
    let output_path = dir.path().join("series.parquet");
    write_series(&input, 3, false);

    let config = ExtractionConfig::default().with_output(OutputFormat::DataFrame);
    let output = Extractor::new(config)
        .extract(&input, None, &mut NullSink)
        .unwrap();
    let batch = output.as_record_batch().unwrap();
    write_parquet(
        batch,
        File::create(&output_path).unwrap(),
        &DataFrameWriterConfig::default(),
    )
    .unwrap();

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&output_path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
    assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), SAMPLES * 3);

    let time = batches[0]
        .column_by_name(columns::TIME)
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert_eq!(time.value(0), 0.0);
    assert_eq!(time.value(SAMPLES - 1), 0.0);
    assert!(time.value(SAMPLES) > 0.0);
}

#[test]
fn test_single_exposure_datacube() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("source_x1d.fits");
    write_single(&path, &[f64::NAN, 1.0, 2.0, f64::NAN, 3.0]);

    let config = ExtractionConfig::default()
        .with_kick_nan(true)
        .with_output(OutputFormat::Datacube);
    let output = extract_x1d(&path, &config).unwrap();
    let cube = output.as_datacube().unwrap();

    assert_eq!(cube.flux.as_slice().unwrap(), &[1.0, 2.0, 3.0]);
    assert_eq!(cube.wavelength.len(), 3);
    assert!(cube.time.is_none());
}

#[test]
fn test_error_paths() {
    let dir = tempdir().unwrap();

    let nan_path = dir.path().join("nan_x1d.fits");
    write_single(&nan_path, &[f64::NAN, f64::NAN]);
    assert!(matches!(
        extract_x1d(&nan_path, &ExtractionConfig::default()),
        Err(ExtractError::DataError(_))
    ));

    let single_path = dir.path().join("single_x1d.fits");
    write_single(&single_path, &[1.0, 2.0]);
    assert!(matches!(
        extract_x1dints(&single_path, &ExtractionConfig::default()),
        Err(ExtractError::InputError(_))
    ));

    let to_watts = ExtractionConfig::default().with_flux_unit(FluxUnit::WattsPerSquareMetrePerMicron);
    let converted = extract_x1d(&single_path, &to_watts).unwrap();
    assert_eq!(
        converted.as_arrays().unwrap().flux_unit,
        FluxUnit::WattsPerSquareMetrePerMicron
    );

    let text_path = dir.path().join("notes.fits");
    std::fs::write(&text_path, "not a fits file").unwrap();
    assert!(matches!(
        extract_x1d(&text_path, &ExtractionConfig::default()),
        Err(ExtractError::FitsError(_))
    ));
}

#[test]
fn test_handle_released_after_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("retry_x1d.fits");
    write_single(&path, &[f64::NAN]);

    assert!(extract_x1d(&path, &ExtractionConfig::default()).is_err());

    // the failed extraction holds no handle, so the same path can be rewritten
    // and opened again
    write_single(&path, &[4.0]);
    let output = extract_x1d(&path, &ExtractionConfig::default()).unwrap();
    assert_eq!(output.as_arrays().unwrap().flux.len(), 1);

    let file = FitsFile::open(&path).unwrap();
    assert_eq!(file.len(), 2);
    file.close();
}

fn write_single_with_unit(path: &Path, unit: &str) {
    let mut writer = BinTableWriter::create(path).unwrap();
    writer
        .write_table(
            "EXTRACT1D",
            &[
                TableColumn::new("WAVELENGTH", &[2.0, 3.0]).with_unit("um"),
                TableColumn::new("FLUX", &[10.0, 20.0]).with_unit(unit),
                TableColumn::new("FLUX_ERROR", &[1.0, 1.0]).with_unit(unit),
            ],
        )
        .unwrap();
    writer.finish().unwrap();
}

#[test]
fn test_default_config_keeps_native_flux() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("jy_x1d.fits");
    write_single_with_unit(&path, "Jy");

    let mut events: Vec<Diagnostic> = Vec::new();
    let output = Extractor::default()
        .extract(&path, Some(FileKind::SingleExposure), &mut events)
        .unwrap();
    let arrays = output.as_arrays().unwrap();

    assert_eq!(arrays.flux.as_slice().unwrap(), &[10.0, 20.0]);
    assert_eq!(arrays.flux_unit, FluxUnit::Jansky);
    assert!(!events
        .iter()
        .any(|e| matches!(e, Diagnostic::FluxConverted { .. })));
}

#[test]
fn test_foreign_flux_unit_rejected() {
    let dir = tempdir().unwrap();
    for (name, unit) in [("watts_x1d.fits", "W/m2/um"), ("mjy_x1d.fits", "MJy")] {
        let path = dir.path().join(name);
        write_single_with_unit(&path, unit);

        let result = extract_x1d(&path, &ExtractionConfig::default());
        assert!(
            matches!(result, Err(ExtractError::DataError(_))),
            "{} should be rejected",
            unit
        );
    }
}
