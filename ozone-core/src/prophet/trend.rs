//! Trend families in scaled time (`t = 0` at the first training date, `t = 1` at the last).

use super::serialized::Growth;

/// Evaluate a trend in scaled units (before `y_scale` and floor are applied).
///
/// `changepoints_t` must be sorted ascending and have the same length as `deltas`.
pub(crate) fn evaluate(
    growth: Growth,
    t: &[f64],
    cap_scaled: Option<f64>,
    k: f64,
    m: f64,
    deltas: &[f64],
    changepoints_t: &[f64],
) -> Vec<f64> {
    match growth {
        Growth::Linear => piecewise_linear(t, deltas, k, m, changepoints_t),
        Growth::Logistic => {
            piecewise_logistic(t, cap_scaled.unwrap_or(1.0), deltas, k, m, changepoints_t)
        }
        Growth::Flat => flat(t, m),
    }
}

pub(crate) fn piecewise_linear(
    t: &[f64],
    deltas: &[f64],
    k: f64,
    m: f64,
    changepoints_t: &[f64],
) -> Vec<f64> {
    t.iter()
        .map(|&ti| {
            let mut k_t = k;
            let mut m_t = m;
            for (&cp, &delta) in changepoints_t.iter().zip(deltas) {
                if cp <= ti {
                    k_t += delta;
                    m_t -= cp * delta;
                }
            }
            k_t * ti + m_t
        })
        .collect()
}

/// Offsets that keep the logistic curve continuous at each changepoint.
fn logistic_gammas(deltas: &[f64], k: f64, m: f64, changepoints_t: &[f64]) -> Vec<f64> {
    let mut gammas = Vec::with_capacity(changepoints_t.len());
    let mut k_prev = k;
    let mut gamma_sum = 0.0;
    for (&cp, &delta) in changepoints_t.iter().zip(deltas) {
        let k_next = k_prev + delta;
        let gamma = (cp - m - gamma_sum) * (1.0 - k_prev / k_next);
        gammas.push(gamma);
        gamma_sum += gamma;
        k_prev = k_next;
    }
    gammas
}

pub(crate) fn piecewise_logistic(
    t: &[f64],
    cap: f64,
    deltas: &[f64],
    k: f64,
    m: f64,
    changepoints_t: &[f64],
) -> Vec<f64> {
    let gammas = logistic_gammas(deltas, k, m, changepoints_t);
    t.iter()
        .map(|&ti| {
            let mut k_t = k;
            let mut m_t = m;
            for ((&cp, &delta), &gamma) in changepoints_t.iter().zip(deltas).zip(&gammas) {
                if ti >= cp {
                    k_t += delta;
                    m_t += gamma;
                }
            }
            cap / (1.0 + (-k_t * (ti - m_t)).exp())
        })
        .collect()
}

pub(crate) fn flat(t: &[f64], m: f64) -> Vec<f64> {
    vec![m; t.len()]
}
