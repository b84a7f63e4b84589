//! Posterior-predictive simulation for interval bounds.
//!
//! Each draw picks a posterior row, extends the trend with randomly placed
//! future changepoints (Poisson count, Laplace magnitudes), and adds
//! Gaussian observation noise. Bounds are percentiles across draws.

use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;

use super::seasonality::FeatureMatrix;
use super::serialized::{Growth, SeasonalityMode};
use super::{trend, ProphetModel};
use crate::rng::RngHierarchy;

/// Inputs shared by every draw of one prediction.
pub(crate) struct SampleFrame<'a> {
    pub t: &'a [f64],
    pub features: &'a FeatureMatrix,
    pub floor: f64,
    pub cap_scaled: Option<f64>,
}

/// Lower and upper bound per row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Bounds {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

pub(crate) fn simulate_bounds(
    model: &ProphetModel,
    frame: &SampleFrame<'_>,
    samples: usize,
    seeds: RngHierarchy,
    horizon_days: u32,
) -> Bounds {
    let iterations = model.params.iterations();
    let per_iteration = samples.div_ceil(iterations).max(1);
    let total = iterations * per_iteration;

    let draws: Vec<Vec<f64>> = (0..total)
        .into_par_iter()
        .map(|draw| {
            let mut rng = seeds.rng_for(horizon_days, draw as u64);
            sample_yhat(model, frame, draw / per_iteration, &mut rng)
        })
        .collect();

    tracing::debug!(
        draws = draws.len(),
        iterations,
        rows = frame.t.len(),
        "simulated posterior predictive draws"
    );

    let lower_p = 100.0 * (1.0 - model.interval_width) / 2.0;
    let upper_p = 100.0 * (1.0 + model.interval_width) / 2.0;
    let mut lower = Vec::with_capacity(frame.t.len());
    let mut upper = Vec::with_capacity(frame.t.len());
    let mut column = Vec::with_capacity(draws.len());
    for row in 0..frame.t.len() {
        column.clear();
        column.extend(draws.iter().map(|d| d[row]).filter(|v| !v.is_nan()));
        column.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        lower.push(percentile_sorted(&column, lower_p));
        upper.push(percentile_sorted(&column, upper_p));
    }
    Bounds { lower, upper }
}

/// One simulated path of `yhat` for every row.
fn sample_yhat(
    model: &ProphetModel,
    frame: &SampleFrame<'_>,
    iteration: usize,
    rng: &mut StdRng,
) -> Vec<f64> {
    let trend = sample_predictive_trend(model, frame, iteration, rng);
    let beta = model.params.beta(iteration);
    let sigma = model.params.sigma_obs(iteration);
    let additive = frame.features.weighted(beta, SeasonalityMode::Additive);
    let multiplicative = frame.features.weighted(beta, SeasonalityMode::Multiplicative);

    trend
        .iter()
        .zip(additive.iter().zip(&multiplicative))
        .map(|(tr, (xb_a, xb_m))| {
            let noise = standard_normal(rng) * sigma * model.y_scale;
            tr * (1.0 + xb_m) + xb_a * model.y_scale + noise
        })
        .collect()
}

/// Trend for one draw, in data units, with simulated future changepoints.
fn sample_predictive_trend(
    model: &ProphetModel,
    frame: &SampleFrame<'_>,
    iteration: usize,
    rng: &mut StdRng,
) -> Vec<f64> {
    let k = model.params.k(iteration);
    let m = model.params.m(iteration);
    let mut deltas = model.params.delta(iteration).to_vec();
    let mut changepoints = model.changepoints_t.clone();

    let t_max = frame.t.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if model.growth != Growth::Flat && t_max > 1.0 && !changepoints.is_empty() {
        let rate = changepoints.len() as f64 * (t_max - 1.0);
        let n_changes = poisson(rng, rate);
        if n_changes > 0 {
            let scale = deltas.iter().map(|d| d.abs()).sum::<f64>() / deltas.len() as f64 + 1e-8;
            let mut new_points: Vec<f64> = (0..n_changes)
                .map(|_| 1.0 + rng.gen::<f64>() * (t_max - 1.0))
                .collect();
            new_points.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            changepoints.extend(new_points);
            deltas.extend((0..n_changes).map(|_| laplace(rng, scale)));
        }
    }

    trend::evaluate(
        model.growth,
        frame.t,
        frame.cap_scaled,
        k,
        m,
        &deltas,
        &changepoints,
    )
    .into_iter()
    .map(|v| v * model.y_scale + frame.floor)
    .collect()
}

/// Box–Muller transform.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Laplace(0, scale) by inverse CDF.
fn laplace(rng: &mut StdRng, scale: f64) -> f64 {
    let u: f64 = rng.gen::<f64>() - 0.5;
    -scale * u.signum() * (1.0 - 2.0 * u.abs()).max(f64::MIN_POSITIVE).ln()
}

/// Knuth's method for small rates, normal approximation above 30.
fn poisson(rng: &mut StdRng, rate: f64) -> usize {
    if rate <= 0.0 {
        return 0;
    }
    if rate > 30.0 {
        let x = rate + rate.sqrt() * standard_normal(rng);
        return x.round().max(0.0) as usize;
    }
    let limit = (-rate).exp();
    let mut count = 0;
    let mut product: f64 = rng.gen();
    while product > limit {
        count += 1;
        product *= rng.gen::<f64>();
    }
    count
}

/// Linear-interpolated percentile, `p` in `[0, 100]`.
pub(crate) fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}
