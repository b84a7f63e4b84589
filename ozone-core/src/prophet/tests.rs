use chrono::NaiveDate;
use serde_json::{json, Value};

use super::*;

const FIXTURE: &str = include_str!("../../tests/fixtures/ozone_model.json");

fn fixture_value() -> Value {
    serde_json::from_str(FIXTURE).unwrap()
}

fn model_from(value: &Value) -> Result<ProphetModel, ModelError> {
    ProphetModel::from_json(&value.to_string())
}

fn point_only(horizon_days: u32) -> PredictOptions {
    PredictOptions {
        horizon_days,
        include_history: false,
        samples: Some(0),
        seed: 42,
    }
}

fn with_samples(horizon_days: u32, seed: u64) -> PredictOptions {
    PredictOptions {
        horizon_days,
        include_history: false,
        samples: None,
        seed,
    }
}

#[test]
fn fixture_summary() {
    let model = ProphetModel::from_json(FIXTURE).unwrap();
    let summary = model.summary();
    assert_eq!(summary.growth, Growth::Linear);
    assert_eq!(summary.observations, 30);
    assert_eq!(summary.changepoints, 3);
    assert_eq!(summary.seasonalities.len(), 1);
    assert_eq!(summary.seasonalities[0].name, "weekly");
    assert_eq!(summary.posterior_draws, 1);
    assert_eq!(summary.uncertainty_samples, 200);
    assert_eq!(summary.version.as_deref(), Some("1.1.5"));
    assert_eq!(
        summary.last_date.date(),
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    );
}

#[test]
fn future_dates_continue_after_training() {
    let model = ProphetModel::from_json(FIXTURE).unwrap();
    let dates = model.future_dates(3, false).unwrap();
    let expected: Vec<NaiveDate> = (1..=3)
        .map(|d| NaiveDate::from_ymd_opt(2024, 7, d).unwrap())
        .collect();
    let got: Vec<NaiveDate> = dates.iter().map(|d| d.date()).collect();
    assert_eq!(got, expected);

    assert_eq!(model.future_dates(3, true).unwrap().len(), 33);
}

#[test]
fn point_forecast_matches_trend_plus_weekly_terms() {
    let model = ProphetModel::from_json(FIXTURE).unwrap();
    let rows = model.predict(&point_only(1)).unwrap();
    assert_eq!(rows.len(), 1);

    // All three changepoints are behind t = 30/29.
    let t = 30.0 / 29.0;
    let k = 0.3 + 0.01 - 0.02 + 0.015;
    let m = 0.6 - (0.2 * 0.01 + 0.45 * -0.02 + 0.7 * 0.015);
    let expected_trend = (k * t + m) * model.y_scale;
    assert!((rows[0].trend - expected_trend).abs() < 1e-9);

    let beta = [0.04, 0.01, -0.01, 0.005, 0.0, 0.002];
    let days = seasonality::epoch_days(&rows[0].ds);
    let weekly: f64 = seasonality::fourier_terms(days, 7.0, 3)
        .iter()
        .zip(beta)
        .map(|(x, b)| x * b)
        .sum();
    let expected = expected_trend + weekly * model.y_scale;
    assert!((rows[0].yhat - expected).abs() < 1e-9);
    assert_eq!(rows[0].yhat_lower, rows[0].yhat);
    assert_eq!(rows[0].yhat_upper, rows[0].yhat);
}

#[test]
fn fitted_history_tracks_observations() {
    let model = ProphetModel::from_json(FIXTURE).unwrap();
    let opts = PredictOptions {
        include_history: true,
        ..point_only(2)
    };
    let rows = model.predict(&opts).unwrap();
    assert_eq!(rows.len(), 32);
    for (fitted, observed) in rows.iter().zip(model.history()) {
        assert_eq!(fitted.ds, observed.ds);
        assert!(
            (fitted.yhat - observed.y).abs() < 5.0,
            "{}: fitted {} vs observed {}",
            fitted.ds,
            fitted.yhat,
            observed.y
        );
    }
}

#[test]
fn sampled_intervals_bracket_the_point_estimate() {
    let model = ProphetModel::from_json(FIXTURE).unwrap();
    let rows = model.predict(&with_samples(7, 42)).unwrap();
    assert_eq!(rows.len(), 7);
    for row in &rows {
        assert!(row.yhat_lower < row.yhat_upper, "{row:?}");
        assert!(row.yhat_lower <= row.yhat && row.yhat <= row.yhat_upper, "{row:?}");
    }
}

#[test]
fn sampling_is_deterministic_per_seed() {
    let model = ProphetModel::from_json(FIXTURE).unwrap();
    let a = model.predict(&with_samples(5, 42)).unwrap();
    let b = model.predict(&with_samples(5, 42)).unwrap();
    assert_eq!(a, b);

    let c = model.predict(&with_samples(5, 43)).unwrap();
    assert_ne!(a, c);
    // Seeds only move the bounds.
    assert_eq!(a[0].yhat, c[0].yhat);
}

#[test]
fn sampled_bounds_ignore_thread_count() {
    let model = ProphetModel::from_json(FIXTURE).unwrap();
    let single = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    let wide = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
    let a = single.install(|| model.predict(&with_samples(10, 42)).unwrap());
    let b = wide.install(|| model.predict(&with_samples(10, 42)).unwrap());
    assert_eq!(a, b);
}

#[test]
fn interval_width_zero_samples_flag() {
    let mut value = fixture_value();
    value["uncertainty_samples"] = json!(false);
    let model = model_from(&value).unwrap();
    let rows = model.predict(&with_samples(2, 1)).unwrap();
    assert!(rows.iter().all(|r| r.yhat_lower == r.yhat && r.yhat_upper == r.yhat));
}

#[test]
fn flat_growth_holds_offset() {
    let mut value = fixture_value();
    value["growth"] = json!("flat");
    value["seasonalities"] = json!([[], {}]);
    value["params"]["beta"] = json!([[0.0]]);
    let model = model_from(&value).unwrap();
    let rows = model.predict(&point_only(4)).unwrap();
    for row in rows {
        assert!((row.yhat - 0.6 * 80.0).abs() < 1e-9);
    }
}

#[test]
fn multiplicative_seasonality_scales_trend() {
    let mut value = fixture_value();
    value["seasonalities"][1]["weekly"]["mode"] = json!("multiplicative");
    let model = model_from(&value).unwrap();
    let row = &model.predict(&point_only(1)).unwrap()[0];

    let beta = [0.04, 0.01, -0.01, 0.005, 0.0, 0.002];
    let days = seasonality::epoch_days(&row.ds);
    let weekly: f64 = seasonality::fourier_terms(days, 7.0, 3)
        .iter()
        .zip(beta)
        .map(|(x, b)| x * b)
        .sum();
    assert!((row.yhat - row.trend * (1.0 + weekly)).abs() < 1e-9);
}

#[test]
fn logistic_growth_uses_training_capacity() {
    let mut value = fixture_value();
    value["growth"] = json!("logistic");
    let err = model_from(&value).unwrap_err();
    assert!(matches!(err, ModelError::Unsupported(_)), "{err}");

    let mut history: Value = serde_json::from_str(value["history"].as_str().unwrap()).unwrap();
    for row in history["data"].as_array_mut().unwrap() {
        row["cap"] = json!(120.0);
    }
    value["history"] = json!(history.to_string());
    let model = model_from(&value).unwrap();
    let rows = model.predict(&point_only(30)).unwrap();
    assert!(rows.iter().all(|r| r.trend > 0.0 && r.trend < 120.0));
}

#[test]
fn rejects_holidays() {
    let mut value = fixture_value();
    value["train_holiday_names"] = json!("{\"name\":\"holiday\",\"index\":[0],\"data\":[\"ozone_alert\"]}");
    assert!(matches!(
        model_from(&value).unwrap_err(),
        ModelError::Unsupported(_)
    ));
}

#[test]
fn rejects_extra_regressors() {
    let mut value = fixture_value();
    value["extra_regressors"] = json!([["temperature"], {"temperature": {"mode": "additive"}}]);
    let err = model_from(&value).unwrap_err();
    assert!(err.to_string().contains("temperature"));
}

#[test]
fn rejects_conditional_seasonality() {
    let mut value = fixture_value();
    value["seasonalities"][1]["weekly"]["condition_name"] = json!("is_summer");
    assert!(matches!(
        model_from(&value).unwrap_err(),
        ModelError::Unsupported(_)
    ));
}

#[test]
fn rejects_mismatched_coefficients() {
    let mut value = fixture_value();
    value["params"]["beta"] = json!([[0.1, 0.2]]);
    let err = model_from(&value).unwrap_err();
    assert!(matches!(err, ModelError::Field { field: "params.beta", .. }), "{err}");

    let mut value = fixture_value();
    value["params"]["delta"] = json!([[0.1]]);
    let err = model_from(&value).unwrap_err();
    assert!(matches!(err, ModelError::Field { field: "params.delta", .. }), "{err}");
}

#[test]
fn rejects_truncated_json() {
    let err = ProphetModel::from_json(&FIXTURE[..FIXTURE.len() / 2]).unwrap_err();
    assert!(matches!(err, ModelError::Json(_)));
}
