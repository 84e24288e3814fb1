//! Shared numeric utilities
//!
//! Every analysis takes its mean and variance from here. `variance` is the
//! population form (divide by n); `sample_variance` divides by n − 1 and is
//! used only where a test statistic calls for it.

use likert_core::StatsError;

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::insufficient_data(1, 0));
    }
    Ok(sum(values) / values.len() as f64)
}

/// Sum of squared deviations from the mean
fn squared_deviations(values: &[f64]) -> Result<f64, StatsError> {
    let m = mean(values)?;
    Ok(values.iter().map(|x| (x - m).powi(2)).sum())
}

/// Population variance (divide by n)
pub fn variance(values: &[f64]) -> Result<f64, StatsError> {
    Ok(squared_deviations(values)? / values.len() as f64)
}

/// Sample variance (divide by n − 1)
pub fn sample_variance(values: &[f64]) -> Result<f64, StatsError> {
    if values.len() < 2 {
        return Err(StatsError::insufficient_data(2, values.len()));
    }
    Ok(squared_deviations(values)? / (values.len() - 1) as f64)
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> Result<f64, StatsError> {
    Ok(variance(values)?.sqrt())
}

/// Fail with `VALIDATION` on the first NaN or infinite entry
pub fn require_finite(values: &[f64], what: &str) -> Result<(), StatsError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(StatsError::validation(format!(
            "{} contains a non-finite value at position {}",
            what, i
        ))),
        None => Ok(()),
    }
}

/// Ascending copy
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Pearson r over aligned finite slices
///
/// NaN when either side is constant or the slices are empty.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return f64::NAN;
    }
    let mx = x[..n].iter().sum::<f64>() / n as f64;
    let my = y[..n].iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    sxy / (sxx * syy).sqrt()
}
