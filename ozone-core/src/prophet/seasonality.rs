//! Fourier seasonality features.

use chrono::NaiveDateTime;

use super::serialized::SeasonalityMode;

/// A named seasonal component as stored in the model, in fit order.
#[derive(Debug, Clone, PartialEq)]
pub struct Seasonality {
    pub name: String,
    pub period_days: f64,
    pub fourier_order: usize,
    pub mode: SeasonalityMode,
}

impl Seasonality {
    /// Number of feature columns (one sine and one cosine per order).
    pub fn width(&self) -> usize {
        2 * self.fourier_order
    }
}

/// Row-major feature matrix plus the mode of each column.
#[derive(Debug, Clone)]
pub(crate) struct FeatureMatrix {
    pub rows: Vec<Vec<f64>>,
    pub column_modes: Vec<SeasonalityMode>,
}

impl FeatureMatrix {
    pub fn width(&self) -> usize {
        self.column_modes.len()
    }

    /// Per-row dot product with `beta`, restricted to columns of `mode`.
    pub fn weighted(&self, beta: &[f64], mode: SeasonalityMode) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(beta)
                    .zip(&self.column_modes)
                    .filter(|(_, m)| **m == mode)
                    .map(|((x, b), _)| x * b)
                    .sum()
            })
            .collect()
    }
}

/// Days since the Unix epoch, the time axis Fourier terms are computed on.
pub(crate) fn epoch_days(ds: &NaiveDateTime) -> f64 {
    let utc = ds.and_utc();
    (utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9) / 86_400.0
}

/// `[sin(2π·1·t/P), cos(2π·1·t/P), sin(2π·2·t/P), ...]` for one date.
pub(crate) fn fourier_terms(t_days: f64, period_days: f64, order: usize) -> Vec<f64> {
    let mut terms = Vec::with_capacity(2 * order);
    for i in 1..=order {
        let x = 2.0 * i as f64 * std::f64::consts::PI * t_days / period_days;
        terms.push(x.sin());
        terms.push(x.cos());
    }
    terms
}

pub(crate) fn feature_matrix(dates: &[NaiveDateTime], seasonalities: &[Seasonality]) -> FeatureMatrix {
    let column_modes = seasonalities
        .iter()
        .flat_map(|s| std::iter::repeat(s.mode).take(s.width()))
        .collect();
    let rows = dates
        .iter()
        .map(|ds| {
            let t = epoch_days(ds);
            seasonalities
                .iter()
                .flat_map(|s| fourier_terms(t, s.period_days, s.fourier_order))
                .collect()
        })
        .collect();
    FeatureMatrix { rows, column_modes }
}
