//! Read-only evaluator for serialized Prophet models.
//!
//! Loads the JSON written by Prophet's `model_to_json` and reproduces its
//! `make_future_dataframe` + `predict` for the subset of models the dashboard
//! needs: linear / logistic / flat trend with Fourier seasonalities. Models
//! using holidays, extra regressors or conditional seasonalities are rejected
//! at load time with [`ModelError::Unsupported`].
//!
//! Nothing here fits or trains a model.

mod seasonality;
mod serialized;
mod trend;
mod uncertainty;

use chrono::{Duration, NaiveDateTime};
use thiserror::Error;

use crate::rng::RngHierarchy;

pub use seasonality::Seasonality;
pub use serialized::{Growth, Scaling, SeasonalityMode, TrainingRow};

use seasonality::{feature_matrix, FeatureMatrix};
use serialized::{decode_history, decode_history_dates, SerializedModel};
use uncertainty::{simulate_bounds, SampleFrame};

/// Errors from decoding or evaluating a serialized model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed model field '{field}': {reason}")]
    Field { field: &'static str, reason: String },

    #[error("unsupported model feature: {0}")]
    Unsupported(String),

    #[error("a {0}-day horizon runs past the supported calendar")]
    HorizonOverflow(u32),
}

/// Fitted parameters, one entry per posterior draw (a single draw for MAP fits).
#[derive(Debug, Clone)]
pub(crate) struct Params {
    k: Vec<f64>,
    m: Vec<f64>,
    delta: Vec<Vec<f64>>,
    sigma_obs: Vec<f64>,
    beta: Vec<Vec<f64>>,
}

impl Params {
    pub fn iterations(&self) -> usize {
        self.k.len()
    }

    pub fn k(&self, i: usize) -> f64 {
        self.k[i % self.k.len()]
    }

    pub fn m(&self, i: usize) -> f64 {
        self.m[i % self.m.len()]
    }

    pub fn sigma_obs(&self, i: usize) -> f64 {
        self.sigma_obs[i % self.sigma_obs.len()]
    }

    pub fn delta(&self, i: usize) -> &[f64] {
        &self.delta[i % self.delta.len()]
    }

    pub fn beta(&self, i: usize) -> &[f64] {
        &self.beta[i % self.beta.len()]
    }

    fn mean_scalar(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    fn mean_vector(rows: &[Vec<f64>]) -> Vec<f64> {
        let width = rows.first().map_or(0, Vec::len);
        (0..width)
            .map(|c| rows.iter().map(|r| r.get(c).copied().unwrap_or(0.0)).sum::<f64>() / rows.len() as f64)
            .collect()
    }
}

/// Options for one prediction.
#[derive(Debug, Clone, Copy)]
pub struct PredictOptions {
    pub horizon_days: u32,
    /// Prepend fitted values for every training date.
    pub include_history: bool,
    /// Overrides the model's own `uncertainty_samples` when set.
    pub samples: Option<usize>,
    pub seed: u64,
}

/// One predicted row.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub ds: NaiveDateTime,
    pub trend: f64,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

/// Descriptive metadata for `inspect` and logging.
#[derive(Debug, Clone)]
pub struct ModelSummary {
    pub growth: Growth,
    pub first_date: NaiveDateTime,
    pub last_date: NaiveDateTime,
    pub observations: usize,
    pub changepoints: usize,
    pub seasonalities: Vec<Seasonality>,
    pub posterior_draws: usize,
    pub interval_width: f64,
    pub uncertainty_samples: usize,
    pub version: Option<String>,
}

/// A decoded, validated Prophet model.
#[derive(Debug, Clone)]
pub struct ProphetModel {
    growth: Growth,
    changepoints_t: Vec<f64>,
    start_secs: f64,
    t_scale_secs: f64,
    y_scale: f64,
    floor: f64,
    cap: Option<f64>,
    seasonalities: Vec<Seasonality>,
    history: Vec<TrainingRow>,
    history_dates: Vec<NaiveDateTime>,
    interval_width: f64,
    uncertainty_samples: usize,
    params: Params,
    version: Option<String>,
}

impl ProphetModel {
    /// Decode and validate a model from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let raw: SerializedModel = serde_json::from_str(text)?;
        Self::from_serialized(raw)
    }

    fn from_serialized(raw: SerializedModel) -> Result<Self, ModelError> {
        if raw.train_holiday_names.is_some() {
            return Err(ModelError::Unsupported("holidays".into()));
        }
        if let Some((names, _)) = &raw.extra_regressors {
            if !names.is_empty() {
                return Err(ModelError::Unsupported(format!(
                    "extra regressors ({})",
                    names.join(", ")
                )));
            }
        }
        if raw.t_scale <= 0.0 || !raw.t_scale.is_finite() {
            return Err(field_error("t_scale", "must be a positive number of seconds"));
        }
        if raw.y_scale == 0.0 || !raw.y_scale.is_finite() {
            return Err(field_error("y_scale", "must be a non-zero number"));
        }
        if !(0.0..1.0).contains(&raw.interval_width) {
            return Err(field_error("interval_width", "must be in [0, 1)"));
        }

        let (order, specs) = raw.seasonalities;
        let mut seasonalities = Vec::with_capacity(order.len());
        for name in order {
            let spec = specs
                .get(&name)
                .ok_or_else(|| field_error("seasonalities", format!("no properties for '{name}'")))?;
            if let Some(condition) = &spec.condition_name {
                return Err(ModelError::Unsupported(format!(
                    "conditional seasonality '{name}' (condition '{condition}')"
                )));
            }
            if spec.period <= 0.0 {
                return Err(field_error("seasonalities", format!("'{name}' has non-positive period")));
            }
            seasonalities.push(Seasonality {
                name,
                period_days: spec.period,
                fourier_order: spec.fourier_order,
                mode: spec.mode,
            });
        }

        let history = decode_history(&raw.history)?;
        let mut history_dates = decode_history_dates(&raw.history_dates)?;
        if history_dates.is_empty() {
            history_dates = history.iter().map(|r| r.ds).collect();
        }
        if history_dates.is_empty() {
            return Err(field_error("history_dates", "model has no training dates"));
        }
        history_dates.sort();

        let floor = if raw.logistic_floor {
            history
                .last()
                .and_then(|r| r.floor)
                .ok_or_else(|| field_error("history", "logistic floor set but no floor column"))?
        } else {
            match raw.scaling.unwrap_or(Scaling::Absmax) {
                Scaling::Absmax => 0.0,
                Scaling::Minmax => raw.y_min.unwrap_or(0.0),
            }
        };
        let cap = match raw.growth {
            Growth::Logistic => Some(history.last().and_then(|r| r.cap).ok_or_else(|| {
                ModelError::Unsupported("logistic growth without a training capacity".into())
            })?),
            _ => None,
        };

        let changepoints_t = raw.changepoints_t.unwrap_or_default();
        let params = Params {
            k: raw.params.k.scalar_draws("params.k")?,
            m: raw.params.m.scalar_draws("params.m")?,
            delta: raw
                .params
                .delta
                .map(|d| d.vector_draws())
                .unwrap_or_else(|| vec![Vec::new()]),
            sigma_obs: raw.params.sigma_obs.scalar_draws("params.sigma_obs")?,
            beta: raw.params.beta.vector_draws(),
        };
        if params.delta.is_empty() || params.beta.is_empty() {
            return Err(field_error("params", "no posterior draws"));
        }
        if params
            .delta
            .iter()
            .any(|row| row.len() != changepoints_t.len())
        {
            return Err(field_error(
                "params.delta",
                format!("expected {} changepoint deltas", changepoints_t.len()),
            ));
        }
        let width: usize = seasonalities.iter().map(Seasonality::width).sum();
        // Models without seasonal features carry a single placeholder coefficient.
        let beta_ok = params
            .beta
            .iter()
            .all(|row| row.len() == width || (width == 0 && row.len() <= 1));
        if !beta_ok {
            return Err(field_error(
                "params.beta",
                format!("expected {width} seasonal coefficients"),
            ));
        }

        Ok(Self {
            growth: raw.growth,
            changepoints_t,
            start_secs: raw.start,
            t_scale_secs: raw.t_scale,
            y_scale: raw.y_scale,
            floor,
            cap,
            seasonalities,
            history,
            history_dates,
            interval_width: raw.interval_width,
            uncertainty_samples: raw.uncertainty_samples.count(),
            params,
            version: raw.version,
        })
    }

    pub fn growth(&self) -> Growth {
        self.growth
    }

    /// Training observations, in stored order.
    pub fn history(&self) -> &[TrainingRow] {
        &self.history
    }

    /// Last date the model was trained on.
    pub fn last_date(&self) -> NaiveDateTime {
        // history_dates is sorted and non-empty by construction
        self.history_dates[self.history_dates.len() - 1]
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            growth: self.growth,
            first_date: self.history_dates[0],
            last_date: self.last_date(),
            observations: self.history.len(),
            changepoints: self.changepoints_t.len(),
            seasonalities: self.seasonalities.clone(),
            posterior_draws: self.params.iterations(),
            interval_width: self.interval_width,
            uncertainty_samples: self.uncertainty_samples,
            version: self.version.clone(),
        }
    }

    /// Daily dates after the last training date, optionally preceded by the training dates.
    pub fn future_dates(
        &self,
        horizon_days: u32,
        include_history: bool,
    ) -> Result<Vec<NaiveDateTime>, ModelError> {
        let last = self.last_date();
        let mut dates = if include_history {
            self.history_dates.clone()
        } else {
            Vec::with_capacity(horizon_days as usize)
        };
        for i in 1..=i64::from(horizon_days) {
            let ds = last
                .checked_add_signed(Duration::days(i))
                .ok_or(ModelError::HorizonOverflow(horizon_days))?;
            dates.push(ds);
        }
        Ok(dates)
    }

    fn scaled_time(&self, ds: &NaiveDateTime) -> f64 {
        let utc = ds.and_utc();
        let secs = utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9;
        (secs - self.start_secs) / self.t_scale_secs
    }

    fn cap_scaled(&self) -> Option<f64> {
        self.cap.map(|cap| (cap - self.floor) / self.y_scale)
    }

    /// Forecast `horizon_days` daily steps past the training data.
    pub fn predict(&self, opts: &PredictOptions) -> Result<Vec<Prediction>, ModelError> {
        let dates = self.future_dates(opts.horizon_days, opts.include_history)?;
        let t: Vec<f64> = dates.iter().map(|ds| self.scaled_time(ds)).collect();
        let features = feature_matrix(&dates, &self.seasonalities);

        let trend = self.mean_trend(&t);
        let (additive, multiplicative) = self.mean_seasonal_terms(&features);
        let yhat: Vec<f64> = trend
            .iter()
            .zip(additive.iter().zip(&multiplicative))
            .map(|(tr, (add, mult))| tr * (1.0 + mult) + add)
            .collect();

        let samples = opts.samples.unwrap_or(self.uncertainty_samples);
        let (lower, upper) = if samples > 0 {
            let frame = SampleFrame {
                t: &t,
                features: &features,
                floor: self.floor,
                cap_scaled: self.cap_scaled(),
            };
            let bounds = simulate_bounds(
                self,
                &frame,
                samples,
                RngHierarchy::new(opts.seed),
                opts.horizon_days,
            );
            (bounds.lower, bounds.upper)
        } else {
            (yhat.clone(), yhat.clone())
        };

        let rows = dates
            .into_iter()
            .zip(trend)
            .zip(yhat)
            .zip(lower.into_iter().zip(upper))
            .map(|(((ds, trend), yhat), (yhat_lower, yhat_upper))| Prediction {
                ds,
                trend,
                yhat,
                yhat_lower,
                yhat_upper,
            })
            .collect();
        Ok(rows)
    }

    /// Trend at the posterior-mean parameters, in data units.
    fn mean_trend(&self, t: &[f64]) -> Vec<f64> {
        let k = Params::mean_scalar(&self.params.k);
        let m = Params::mean_scalar(&self.params.m);
        let deltas = Params::mean_vector(&self.params.delta);
        trend::evaluate(
            self.growth,
            t,
            self.cap_scaled(),
            k,
            m,
            &deltas,
            &self.changepoints_t,
        )
        .into_iter()
        .map(|v| v * self.y_scale + self.floor)
        .collect()
    }

    /// Additive (data units) and multiplicative (relative) seasonal terms.
    fn mean_seasonal_terms(&self, features: &FeatureMatrix) -> (Vec<f64>, Vec<f64>) {
        let beta = Params::mean_vector(&self.params.beta);
        let additive = features
            .weighted(&beta, SeasonalityMode::Additive)
            .into_iter()
            .map(|v| v * self.y_scale)
            .collect();
        let multiplicative = features.weighted(&beta, SeasonalityMode::Multiplicative);
        (additive, multiplicative)
    }
}

fn field_error(field: &'static str, reason: impl Into<String>) -> ModelError {
    ModelError::Field {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests;
