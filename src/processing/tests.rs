use super::*;
use crate::error::ExtractError;
use crate::spectrum::{FluxUnit, Spectrum};
use ndarray::{array, Array1, Array2, ArrayD, IxDyn};
use proptest::prelude::*;

fn single(wavelength: Vec<f64>, flux: Vec<f64>) -> Spectrum {
    let error = flux.iter().map(|f| f * 0.1).collect::<Array1<f64>>();
    Spectrum::single(Array1::from(wavelength), Array1::from(flux), error).unwrap()
}

/// 4 wavelengths x 3 integrations; flux[i, j] = 10 * i + j
fn series() -> Spectrum {
    let wavelength = Array2::from_shape_fn((4, 3), |(i, _)| 1.0 + i as f64 * 0.5);
    let flux = Array2::from_shape_fn((4, 3), |(i, j)| 10.0 * i as f64 + j as f64);
    let error = flux.mapv(|f| f * 0.01);
    Spectrum::series(wavelength, flux, error, array![0.0, 0.1, 0.2]).unwrap()
}

#[test]
fn test_clip_single() {
    let s = single(vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]);
    let clipped = clip_wavelength(&s, WavelengthRange::new(2.0, 3.0)).unwrap();
    assert_eq!(clipped.wavelength().to_owned(), array![2.0, 3.0].into_dyn());
    assert_eq!(clipped.flux().to_owned(), array![6.0, 7.0].into_dyn());
    assert_eq!(clipped.flux_error().len(), 2);
}

#[test]
fn test_clip_series_selects_rows() {
    let clipped = clip_wavelength(&series(), WavelengthRange::new(1.4, 2.1)).unwrap();
    assert_eq!(clipped.shape(), &[2, 3]);
    assert_eq!(clipped.flux()[[0, 0]], 10.0);
    assert_eq!(clipped.time().map(|t| t.len()), Some(3));
}

#[test]
fn test_clip_below_domain_is_empty_not_error() {
    let s = single(vec![1.0, 2.0], vec![1.0, 2.0]);
    let clipped = clip_wavelength(&s, WavelengthRange::new(0.5, 0.5)).unwrap();
    assert!(clipped.is_empty());
    assert_eq!(clipped.wavelength().len(), 0);
    assert_eq!(clipped.flux_error().len(), 0);
}

#[test]
fn test_scrub_single() {
    let s = single(vec![10.0, 20.0, 30.0], vec![1.0, f64::NAN, 3.0]);
    let scrubbed = scrub_nan(&s, NanAxis::Time).unwrap();
    assert_eq!(scrubbed.wavelength().to_owned(), array![10.0, 30.0].into_dyn());
    assert_eq!(scrubbed.flux().to_owned(), array![1.0, 3.0].into_dyn());
}

#[test]
fn test_scrub_series_time_axis_drops_rows() {
    let wavelength = Array2::from_shape_fn((3, 2), |(i, _)| i as f64);
    let mut flux = Array2::<f64>::ones((3, 2));
    flux[[1, 1]] = f64::NAN;
    let s = Spectrum::series(wavelength, flux.clone(), flux, array![0.0, 1.0]).unwrap();

    let scrubbed = scrub_nan(&s, NanAxis::Time).unwrap();
    assert_eq!(scrubbed.shape(), &[2, 2]);
    assert_eq!(scrubbed.wavelength()[[1, 0]], 2.0);
    assert_eq!(scrubbed.time().unwrap(), &array![0.0, 1.0]);
}

#[test]
fn test_scrub_series_wavelength_axis_drops_integrations() {
    let wavelength = Array2::from_shape_fn((3, 3), |(i, _)| i as f64);
    let mut flux = Array2::<f64>::ones((3, 3));
    flux[[2, 1]] = f64::NAN;
    let s = Spectrum::series(wavelength, flux.clone(), flux, array![0.0, 0.5, 1.0]).unwrap();

    let scrubbed = scrub_nan(&s, NanAxis::Wavelength).unwrap();
    assert_eq!(scrubbed.shape(), &[3, 2]);
    assert_eq!(scrubbed.time().unwrap(), &array![0.0, 1.0]);
}

#[test]
fn test_scrub_rank_three_is_shape_error() {
    let cube = ArrayD::<f64>::zeros(IxDyn(&[2, 2, 2]));
    let s = Spectrum::from_parts(cube.clone(), cube.clone(), cube, None, FluxUnit::Jansky)
        .unwrap();
    assert!(matches!(
        scrub_nan(&s, NanAxis::Time),
        Err(ExtractError::ShapeError(_))
    ));
}

#[test]
fn test_nan_axis_defaults() {
    use crate::extract::FileKind;
    assert_eq!(NanAxis::default_for(FileKind::SingleExposure), NanAxis::Time);
    assert_eq!(NanAxis::default_for(FileKind::TimeSeries), NanAxis::Wavelength);
}

#[test]
fn test_excise_outlier_example() {
    let s = single(vec![1.0, 1.1, 1.2, 1.3, 1.4], vec![1.0, 1.0, 100.0, 1.0, 1.0]);
    let window = OutlierWindow::new(WavelengthRange::new(1.15, 1.25)).with_buffer(1);
    let (cleaned, outcome) = excise_outlier(&s, &window).unwrap();

    assert_eq!(cleaned.wavelength().to_owned(), array![1.0, 1.4].into_dyn());
    assert_eq!(cleaned.flux().to_owned(), array![1.0, 1.0].into_dyn());
    match outcome {
        OutlierOutcome::Excised { peak, indices, .. } => {
            assert_eq!(peak, 2);
            assert_eq!(indices, vec![1, 2, 3]);
        }
        OutlierOutcome::NotFound => panic!("expected an excision"),
    }
}

#[test]
fn test_excise_picks_brightest_candidate() {
    let s = single(
        vec![1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6],
        vec![1.0, 50.0, 2.0, 90.0, 3.0, 1.0, 1.0],
    );
    let window = OutlierWindow::new(WavelengthRange::new(1.05, 1.45)).with_buffer(0);
    let (cleaned, outcome) = excise_outlier(&s, &window).unwrap();
    assert_eq!(cleaned.len(), 6);
    assert!(matches!(outcome, OutlierOutcome::Excised { peak: 3, .. }));
}

#[test]
fn test_excise_window_clipped_at_edges() {
    let s = single(vec![1.0, 1.1, 1.2, 1.3], vec![100.0, 1.0, 1.0, 1.0]);
    let window = OutlierWindow::new(WavelengthRange::new(0.9, 1.05));
    let (cleaned, outcome) = excise_outlier(&s, &window).unwrap();
    assert_eq!(cleaned.wavelength().to_owned(), array![1.3].into_dyn());
    assert!(matches!(
        outcome,
        OutlierOutcome::Excised { ref indices, .. } if indices == &vec![0, 1, 2]
    ));
}

#[test]
fn test_excise_outside_domain_is_unchanged() {
    let s = single(vec![1.0, 1.1, 1.2], vec![1.0, 2.0, 3.0]);
    let window = OutlierWindow::new(WavelengthRange::new(5.0, 6.0));
    let (cleaned, outcome) = excise_outlier(&s, &window).unwrap();
    assert_eq!(outcome, OutlierOutcome::NotFound);
    assert_eq!(cleaned, s);
}

#[test]
fn test_excise_series_uses_row_maximum() {
    // row 1 peaks in integration 2 only
    let wavelength = Array2::from_shape_fn((4, 3), |(i, _)| 1.0 + i as f64 * 0.1);
    let mut flux = Array2::<f64>::ones((4, 3));
    flux[[1, 2]] = 500.0;
    flux[[2, 0]] = 100.0;
    let s = Spectrum::series(wavelength, flux.clone(), flux, array![0.0, 1.0, 2.0]).unwrap();

    let window = OutlierWindow::new(WavelengthRange::new(1.05, 1.25)).with_buffer(0);
    let (cleaned, outcome) = excise_outlier(&s, &window).unwrap();
    assert!(matches!(outcome, OutlierOutcome::Excised { peak: 1, .. }));
    assert_eq!(cleaned.shape(), &[3, 3]);
    assert_eq!(cleaned.time().map(|t| t.len()), Some(3));
}

#[test]
fn test_convert_flux_example() {
    let s = single(vec![2.0], vec![10.0]);
    let converted = convert_flux(&s, FluxUnit::WattsPerSquareMetrePerMicron).unwrap();
    let value = converted.flux()[[0]];
    assert!((value - 7.49475e-12).abs() < 1e-20);
    // error uses the same linear factor: 1.0 Jy -> 7.49475e-13
    assert!((converted.flux_error()[[0]] - 7.49475e-13).abs() < 1e-21);
    assert_eq!(converted.flux_unit(), FluxUnit::WattsPerSquareMetrePerMicron);
    assert_eq!(converted.wavelength(), s.wavelength());
}

#[test]
fn test_convert_flux_is_one_directional() {
    let s = single(vec![2.0, 3.0], vec![10.0, 20.0]);
    let converted = convert_flux(&s, FluxUnit::WattsPerSquareMetrePerMicron).unwrap();
    match convert_flux(&converted, FluxUnit::Jansky) {
        Err(ExtractError::UnsupportedUnitError(msg)) => assert!(msg.starts_with("Jy")),
        other => panic!("expected UnsupportedUnitError, got {other:?}"),
    }
    assert_ne!(converted.flux(), s.flux());
}

#[test]
fn test_convert_to_same_unit_is_identity() {
    let s = single(vec![2.0], vec![10.0]);
    assert_eq!(convert_flux(&s, FluxUnit::Jansky).unwrap(), s);
}

#[test]
fn test_convert_series_pointwise() {
    let s = series();
    let converted = convert_flux(&s, FluxUnit::WattsPerSquareMetrePerMicron).unwrap();
    assert_eq!(converted.shape(), s.shape());
    let expected = jansky_to_w_m2_um(s.flux()[[3, 2]], s.wavelength()[[3, 2]]);
    assert_eq!(converted.flux()[[3, 2]], expected);
}

#[test]
fn test_wavelength_range_serde() {
    let range: WavelengthRange = serde_json::from_str("[2.8, 5.1]").unwrap();
    assert_eq!(range, WavelengthRange::new(2.8, 5.1));
    assert!(range.contains(2.8) && range.contains(5.1) && !range.contains(5.2));
}

fn arb_flux(len: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(
        prop_oneof![4 => -1e3..1e3f64, 1 => Just(f64::NAN)],
        len,
    )
}

proptest! {
    #[test]
    fn prop_scrub_is_idempotent(flux in (1usize..40).prop_flat_map(arb_flux)) {
        let wavelength = (0..flux.len()).map(|i| 1.0 + i as f64 * 0.01).collect();
        let s = single(wavelength, flux);
        let once = scrub_nan(&s, NanAxis::Time).unwrap();
        let twice = scrub_nan(&once, NanAxis::Time).unwrap();
        prop_assert_eq!(once.shape(), twice.shape());
        prop_assert_eq!(once.wavelength(), twice.wavelength());
        prop_assert!(once.flux().iter().all(|f| !f.is_nan()));
    }

    #[test]
    fn prop_series_time_tracks_columns(
        rows in 1usize..8,
        flux in (1usize..6).prop_flat_map(|t| proptest::collection::vec(arb_flux(t), 8)),
        lo in 0.0..2.0f64,
        width in 0.0..2.0f64,
    ) {
        let t = flux[0].len();
        let data = Array2::from_shape_fn((rows, t), |(i, j)| flux[i][j]);
        let wavelength = Array2::from_shape_fn((rows, t), |(i, _)| i as f64 * 0.25);
        let time = Array1::from_shape_fn(t, |j| j as f64);
        let s = Spectrum::series(wavelength, data.clone(), data, time).unwrap();

        let clipped = clip_wavelength(&s, WavelengthRange::new(lo, lo + width)).unwrap();
        let scrubbed = scrub_nan(&clipped, NanAxis::Wavelength).unwrap();
        for stage in [&clipped, &scrubbed] {
            prop_assert_eq!(stage.time().map(|t| t.len()), Some(stage.shape()[1]));
            let (wavelength, flux, flux_error) =
                (stage.wavelength(), stage.flux(), stage.flux_error());
            prop_assert_eq!(wavelength.shape(), flux.shape());
            prop_assert_eq!(flux_error.shape(), flux.shape());
        }
    }

    #[test]
    fn prop_single_lengths_agree(
        flux in (1usize..30).prop_flat_map(arb_flux),
        lo in 0.9..1.2f64,
        buffer in 0usize..4,
    ) {
        let wavelength = (0..flux.len()).map(|i| 1.0 + i as f64 * 0.01).collect();
        let s = single(wavelength, flux);
        let clipped = clip_wavelength(&s, WavelengthRange::new(lo, 1.5)).unwrap();
        let scrubbed = scrub_nan(&clipped, NanAxis::Time).unwrap();
        let window = OutlierWindow::new(WavelengthRange::new(1.05, 1.1)).with_buffer(buffer);
        let (cleaned, _) = excise_outlier(&scrubbed, &window).unwrap();
        prop_assert_eq!(cleaned.wavelength().len(), cleaned.flux().len());
        prop_assert_eq!(cleaned.flux_error().len(), cleaned.flux().len());
    }
}
