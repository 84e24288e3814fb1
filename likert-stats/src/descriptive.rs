//! Per-variable descriptive statistics

use likert_core::{DataTable, StatsError};
use serde::Serialize;
use crate::helpers::{mean, sorted, sum, variance};

/// Fixed critical value for the 95% interval (normal, not Student t)
pub const Z_95: f64 = 1.96;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    /// `center ± Z_95 · se`
    pub fn around(center: f64, se: f64) -> Self {
        let margin = Z_95 * se;
        Self {
            lower: center - margin,
            upper: center + margin,
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }
}

/// Nearest-rank quartiles: `sorted[floor(n · q)]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub variable: String,
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    /// Most frequent values, ascending
    pub mode: Vec<f64>,
    /// Mode values joined with ", "
    pub mode_display: String,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// Population variance
    pub variance: f64,
    pub std_dev: f64,
    /// `None` when the variance is zero
    pub skewness: Option<f64>,
    /// Excess kurtosis; `None` when the variance is zero
    pub kurtosis: Option<f64>,
    pub standard_error: f64,
    pub confidence_interval_95: Interval,
    pub quartiles: Quartiles,
    pub interquartile_range: f64,
}

/// Describe one column; `Ok(None)` when no numeric values remain
pub fn describe(table: &DataTable, variable: &str) -> Result<Option<DescriptiveStats>, StatsError> {
    table.require_columns(&[variable.to_string()])?;
    describe_values(variable, &table.numeric_column(variable))
}

/// Describe an already-extracted sample
pub fn describe_values(variable: &str, values: &[f64]) -> Result<Option<DescriptiveStats>, StatsError> {
    let n = values.len();
    if n == 0 {
        return Ok(None);
    }

    let s = sorted(values);
    let total = sum(values);
    let m = mean(values)?;
    let var = variance(values)?;
    let sd = var.sqrt();
    let se = sd / (n as f64).sqrt();

    let median = if n % 2 == 0 {
        (s[n / 2 - 1] + s[n / 2]) / 2.0
    } else {
        s[n / 2]
    };

    let (skewness, kurtosis) = if var > 0.0 {
        let m3 = values.iter().map(|x| (x - m).powi(3)).sum::<f64>() / n as f64;
        let m4 = values.iter().map(|x| (x - m).powi(4)).sum::<f64>() / n as f64;
        (Some(m3 / var.powf(1.5)), Some(m4 / (var * var) - 3.0))
    } else {
        (None, None)
    };

    let quartiles = quartiles(&s);
    let mode = modes(&s);
    let mode_display = mode.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
    let (min, max) = (s[0], s[n - 1]);

    Ok(Some(DescriptiveStats {
        variable: variable.to_string(),
        n,
        mean: m,
        median,
        mode,
        mode_display,
        sum: total,
        min,
        max,
        range: max - min,
        variance: var,
        std_dev: sd,
        skewness,
        kurtosis,
        standard_error: se,
        confidence_interval_95: Interval::around(m, se),
        interquartile_range: quartiles.q3 - quartiles.q1,
        quartiles,
    }))
}

fn quartiles(sorted: &[f64]) -> Quartiles {
    let n = sorted.len();
    let at = |q: f64| sorted[((n as f64 * q).floor() as usize).min(n - 1)];
    Quartiles {
        q1: at(0.25),
        q2: at(0.5),
        q3: at(0.75),
    }
}

/// All values sharing the highest frequency (input must be sorted)
fn modes(sorted: &[f64]) -> Vec<f64> {
    let mut runs: Vec<(f64, usize)> = Vec::new();
    for &v in sorted {
        match runs.last_mut() {
            Some((value, count)) if *value == v => *count += 1,
            _ => runs.push((v, 1)),
        }
    }
    let best = runs.iter().map(|&(_, c)| c).max().unwrap_or(0);
    runs.into_iter().filter(|&(_, c)| c == best).map(|(v, _)| v).collect()
}
