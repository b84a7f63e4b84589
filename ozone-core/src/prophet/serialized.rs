//! On-disk shape of a serialized Prophet model (`model_to_json` output).
//!
//! Only the attributes the evaluator reads are declared; everything else in
//! the file (priors, fit kwargs, stan backend info) is ignored by serde.
//! Series and dataframes are stored by the writer as JSON *strings* holding
//! pandas `split` / `table` documents, so they are decoded in a second pass.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::ModelError;

#[derive(Debug, Deserialize)]
pub(crate) struct SerializedModel {
    pub growth: Growth,
    #[serde(default)]
    pub changepoints_t: Option<Vec<f64>>,
    pub history_dates: String,
    pub history: String,
    pub start: f64,
    pub t_scale: f64,
    pub y_scale: f64,
    #[serde(default)]
    pub y_min: Option<f64>,
    #[serde(default)]
    pub scaling: Option<Scaling>,
    #[serde(default)]
    pub logistic_floor: bool,
    pub seasonalities: (Vec<String>, BTreeMap<String, SeasonalitySpec>),
    #[serde(default)]
    pub extra_regressors: Option<(Vec<String>, serde_json::Value)>,
    #[serde(default)]
    pub train_holiday_names: Option<String>,
    pub interval_width: f64,
    pub uncertainty_samples: SampleCount,
    pub params: SerializedParams,
    #[serde(default, rename = "__prophet_version")]
    pub version: Option<String>,
}

/// Trend family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Growth {
    Linear,
    Logistic,
    Flat,
}

impl Growth {
    pub fn label(self) -> &'static str {
        match self {
            Growth::Linear => "linear",
            Growth::Logistic => "logistic",
            Growth::Flat => "flat",
        }
    }
}

/// How `y` was scaled before fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scaling {
    Absmax,
    Minmax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalityMode {
    Additive,
    Multiplicative,
}

impl SeasonalityMode {
    pub fn label(self) -> &'static str {
        match self {
            SeasonalityMode::Additive => "additive",
            SeasonalityMode::Multiplicative => "multiplicative",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SeasonalitySpec {
    pub period: f64,
    pub fourier_order: usize,
    pub mode: SeasonalityMode,
    #[serde(default)]
    pub condition_name: Option<String>,
}

/// `uncertainty_samples` is an integer, or `false` to disable intervals.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub(crate) enum SampleCount {
    Count(u64),
    Flag(bool),
}

impl SampleCount {
    pub fn count(self) -> usize {
        match self {
            SampleCount::Count(n) => n as usize,
            SampleCount::Flag(true) => 1000,
            SampleCount::Flag(false) => 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SerializedParams {
    pub k: ParamArray,
    pub m: ParamArray,
    #[serde(default)]
    pub delta: Option<ParamArray>,
    pub sigma_obs: ParamArray,
    pub beta: ParamArray,
}

/// A fitted parameter: MAP fits store `[[v, ...]]`, sampled fits one row per draw.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ParamArray {
    Scalar(f64),
    Vector(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

impl ParamArray {
    /// One value per posterior draw, for scalar parameters (`k`, `m`, `sigma_obs`).
    pub fn scalar_draws(&self, field: &'static str) -> Result<Vec<f64>, ModelError> {
        let draws = match self {
            ParamArray::Scalar(v) => vec![*v],
            ParamArray::Vector(v) => v.clone(),
            ParamArray::Matrix(rows) => rows
                .iter()
                .map(|row| {
                    row.first().copied().ok_or_else(|| ModelError::Field {
                        field,
                        reason: "empty parameter row".into(),
                    })
                })
                .collect::<Result<_, _>>()?,
        };
        if draws.is_empty() {
            return Err(ModelError::Field {
                field,
                reason: "no posterior draws".into(),
            });
        }
        Ok(draws)
    }

    /// One coefficient vector per posterior draw (`delta`, `beta`).
    pub fn vector_draws(&self) -> Vec<Vec<f64>> {
        match self {
            ParamArray::Scalar(v) => vec![vec![*v]],
            ParamArray::Vector(v) => vec![v.clone()],
            ParamArray::Matrix(rows) => rows.clone(),
        }
    }
}

/// pandas `to_json(orient="split")` document for a series.
#[derive(Debug, Deserialize)]
struct SplitSeries {
    data: Vec<String>,
}

/// pandas `to_json(orient="table")` document; only the rows are read.
#[derive(Debug, Deserialize)]
struct TableFrame {
    data: Vec<HistoryRecord>,
}

#[derive(Debug, Deserialize)]
struct HistoryRecord {
    ds: String,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    cap: Option<f64>,
    #[serde(default)]
    floor: Option<f64>,
}

/// A training row after decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRow {
    pub ds: NaiveDateTime,
    pub y: f64,
    pub cap: Option<f64>,
    pub floor: Option<f64>,
}

pub(crate) fn decode_history_dates(raw: &str) -> Result<Vec<NaiveDateTime>, ModelError> {
    let series: SplitSeries = serde_json::from_str(raw).map_err(|e| ModelError::Field {
        field: "history_dates",
        reason: e.to_string(),
    })?;
    series
        .data
        .iter()
        .map(|s| parse_timestamp(s, "history_dates"))
        .collect()
}

/// Decode the training frame, dropping rows whose `y` is missing.
pub(crate) fn decode_history(raw: &str) -> Result<Vec<TrainingRow>, ModelError> {
    let frame: TableFrame = serde_json::from_str(raw).map_err(|e| ModelError::Field {
        field: "history",
        reason: e.to_string(),
    })?;
    let mut rows = Vec::with_capacity(frame.data.len());
    for record in frame.data {
        let Some(y) = record.y else { continue };
        rows.push(TrainingRow {
            ds: parse_timestamp(&record.ds, "history")?,
            y,
            cap: record.cap,
            floor: record.floor,
        });
    }
    Ok(rows)
}

/// Parse the ISO timestamps pandas writes (`2024-06-01T00:00:00.000`).
pub(crate) fn parse_timestamp(raw: &str, field: &'static str) -> Result<NaiveDateTime, ModelError> {
    let trimmed = raw.trim().trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map_err(|e| ModelError::Field {
            field,
            reason: format!("bad timestamp '{raw}': {e}"),
        })
}
