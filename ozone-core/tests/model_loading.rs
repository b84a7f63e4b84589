//! Integration tests for loader → producer using the frozen model fixture.

use chrono::{Duration, NaiveDate};
use ozone_core::{
    load_model, produce_forecast, ForecastRequest, ForecastSource, ProducerOptions, Session,
    UNAVAILABLE_WARNING,
};
use std::path::PathBuf;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

#[test]
fn missing_model_falls_back_to_simulated() {
    let dir = tempfile::tempdir().unwrap();
    let load = load_model(&dir.path().join("modelo_03_prophet.json"));
    assert!(!load.available());
    assert_eq!(load.warning(), Some(UNAVAILABLE_WARNING));

    let request = ForecastRequest::new(3).unwrap();
    let result = produce_forecast(request, &load, today(), &ProducerOptions::default()).unwrap();
    assert_eq!(result.source, ForecastSource::Simulated);
    assert_eq!(result.rows[2].point_estimate, 54.0);
}

#[test]
fn corrupt_model_falls_back_to_simulated() {
    let load = load_model(&fixture_dir().join("corrupt_model.json"));
    assert!(!load.available());
    assert_eq!(load.warning(), Some(UNAVAILABLE_WARNING));

    let request = ForecastRequest::new(1).unwrap();
    let result = produce_forecast(request, &load, today(), &ProducerOptions::default()).unwrap();
    assert!(result.is_simulated());
    assert_eq!(result.rows[0].date, today());
}

#[test]
fn valid_model_is_used_instead_of_fallback() {
    let load = load_model(&fixture_dir().join("ozone_model.json"));
    assert!(load.available());
    assert!(load.warning().is_none());

    let request = ForecastRequest::new(7).unwrap();
    let result = produce_forecast(request, &load, today(), &ProducerOptions::default()).unwrap();
    assert!(!result.is_simulated());
    assert_eq!(result.len(), 7);

    match &result.source {
        ForecastSource::Model {
            fingerprint,
            observations,
        } => {
            assert_eq!(fingerprint, &load.model().unwrap().fingerprint);
            assert_eq!(observations.len(), 30);
        }
        ForecastSource::Simulated => panic!("model forecast tagged as simulated"),
    }

    // Model dates continue after training, not from today.
    let first = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
    for (i, row) in result.rows.iter().enumerate() {
        assert_eq!(row.date, first + Duration::days(i as i64));
        assert!(row.lower_bound <= row.upper_bound, "{row:?}");
    }
    // Placeholder values never appear on the model path.
    assert_ne!(result.rows[0].point_estimate, 50.0);
}

#[test]
fn model_forecast_is_idempotent() {
    let load = load_model(&fixture_dir().join("ozone_model.json"));
    let request = ForecastRequest::new(5).unwrap();
    let opts = ProducerOptions::default();
    let a = produce_forecast(request, &load, today(), &opts).unwrap();
    let b = produce_forecast(request, &load, today(), &opts).unwrap();
    assert_eq!(a, b);
}

#[test]
fn include_history_prepends_training_dates() {
    let load = load_model(&fixture_dir().join("ozone_model.json"));
    let request = ForecastRequest::new(3).unwrap();
    let opts = ProducerOptions {
        include_history: true,
        samples: Some(0),
        ..ProducerOptions::default()
    };
    let result = produce_forecast(request, &load, today(), &opts).unwrap();
    assert_eq!(result.len(), 33);
    assert_eq!(result.rows[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert!(result.rows.iter().all(|r| r.lower_bound == r.point_estimate));
}

#[test]
fn session_overwrites_with_each_request() {
    let load = load_model(&fixture_dir().join("ozone_model.json"));
    let mut session = Session::new();
    let opts = ProducerOptions::default();

    session.submit(2, &load, today(), &opts).unwrap();
    assert_eq!(session.result().unwrap().len(), 2);
    session.submit(4, &load, today(), &opts).unwrap();
    assert_eq!(session.result().unwrap().len(), 4);
}
