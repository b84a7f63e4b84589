//! Forecast producer.
//!
//! Two sources, chosen by model availability:
//! 1. Model available → delegate future dates and prediction to the model
//! 2. Model unavailable → deterministic linear placeholder starting today
//!
//! The placeholder exists only to keep the display path exercised. It is not
//! a statistical model, and results produced by it are tagged as simulated.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loader::{LoadedModel, ModelLoad};
use crate::prophet::{ModelError, PredictOptions};

/// Placeholder point estimate on day 0.
pub const SIMULATED_POINT_BASE: f64 = 50.0;
/// Placeholder lower bound on day 0.
pub const SIMULATED_LOWER_BASE: f64 = 45.0;
/// Placeholder upper bound on day 0.
pub const SIMULATED_UPPER_BASE: f64 = 55.0;
/// Daily increase shared by all three placeholder series.
pub const SIMULATED_DAILY_STEP: f64 = 2.0;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("horizon must be at least 1 day, got {0}")]
    InvalidHorizon(u32),

    #[error("a {0}-day horizon runs past the supported calendar")]
    HorizonOverflow(u32),

    #[error("model prediction failed: {0}")]
    Model(#[from] ModelError),
}

/// Number of future days to forecast; always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    horizon_days: u32,
}

impl ForecastRequest {
    pub fn new(horizon_days: u32) -> Result<Self, ForecastError> {
        if horizon_days == 0 {
            return Err(ForecastError::InvalidHorizon(horizon_days));
        }
        Ok(Self { horizon_days })
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }
}

/// One forecast record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl ForecastRow {
    /// `lower ≤ point ≤ upper`.
    pub fn is_ordered(&self) -> bool {
        self.lower_bound <= self.point_estimate && self.point_estimate <= self.upper_bound
    }
}

/// A training observation, drawn beside model forecasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Where a forecast came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastSource {
    Model {
        fingerprint: String,
        observations: Vec<Observation>,
    },
    Simulated,
}

impl ForecastSource {
    pub fn label(&self) -> &'static str {
        match self {
            ForecastSource::Model { .. } => "model",
            ForecastSource::Simulated => "simulated",
        }
    }
}

/// An ordered forecast table plus its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub source: ForecastSource,
    pub rows: Vec<ForecastRow>,
}

impl ForecastResult {
    pub fn is_simulated(&self) -> bool {
        matches!(self.source, ForecastSource::Simulated)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Training observations, empty for simulated forecasts.
    pub fn observations(&self) -> &[Observation] {
        match &self.source {
            ForecastSource::Model { observations, .. } => observations,
            ForecastSource::Simulated => &[],
        }
    }
}

/// Knobs for the model path; the simulated path ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerOptions {
    pub include_history: bool,
    pub seed: u64,
    pub samples: Option<usize>,
}

impl Default for ProducerOptions {
    fn default() -> Self {
        Self {
            include_history: false,
            seed: crate::rng::DEFAULT_SEED,
            samples: None,
        }
    }
}

/// Produce a forecast from the model if one loaded, otherwise the placeholder.
pub fn produce_forecast(
    request: ForecastRequest,
    model: &ModelLoad,
    today: NaiveDate,
    opts: &ProducerOptions,
) -> Result<ForecastResult, ForecastError> {
    let result = match model.model() {
        Some(loaded) => model_forecast(request, loaded, opts)?,
        None => simulated_forecast(request, today)?,
    };
    tracing::debug!(
        source = result.source.label(),
        horizon_days = request.horizon_days(),
        rows = result.len(),
        "forecast produced"
    );
    Ok(result)
}

/// Deterministic stand-in: day `i` is `(50 + 2i, 45 + 2i, 55 + 2i)`, dated `today + i`.
pub fn simulated_forecast(
    request: ForecastRequest,
    today: NaiveDate,
) -> Result<ForecastResult, ForecastError> {
    let horizon = request.horizon_days();
    let mut rows = Vec::with_capacity(horizon as usize);
    for i in 0..horizon {
        let date = today
            .checked_add_days(Days::new(u64::from(i)))
            .ok_or(ForecastError::HorizonOverflow(horizon))?;
        let step = SIMULATED_DAILY_STEP * f64::from(i);
        let row = ForecastRow {
            date,
            point_estimate: SIMULATED_POINT_BASE + step,
            lower_bound: SIMULATED_LOWER_BASE + step,
            upper_bound: SIMULATED_UPPER_BASE + step,
        };
        // All three series share one step, so the day-0 ordering holds for every day.
        debug_assert!(row.is_ordered());
        rows.push(row);
    }
    Ok(ForecastResult {
        source: ForecastSource::Simulated,
        rows,
    })
}

fn model_forecast(
    request: ForecastRequest,
    loaded: &LoadedModel,
    opts: &ProducerOptions,
) -> Result<ForecastResult, ForecastError> {
    let predictions = loaded.model.predict(&PredictOptions {
        horizon_days: request.horizon_days(),
        include_history: opts.include_history,
        samples: opts.samples,
        seed: opts.seed,
    })?;
    let rows = predictions
        .into_iter()
        .map(|p| ForecastRow {
            date: p.ds.date(),
            point_estimate: p.yhat,
            lower_bound: p.yhat_lower,
            upper_bound: p.yhat_upper,
        })
        .collect();
    let observations = loaded
        .model
        .history()
        .iter()
        .map(|r| Observation {
            date: r.ds.date(),
            value: r.y,
        })
        .collect();
    Ok(ForecastResult {
        source: ForecastSource::Model {
            fingerprint: loaded.fingerprint.clone(),
            observations,
        },
        rows,
    })
}
