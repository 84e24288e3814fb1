//! Simple linear regression (ordinary least squares)

use likert_core::StatsError;
use serde::Serialize;
use crate::bivariate::ZERO_VARIANCE_EPSILON;
use crate::descriptive::Interval;
use crate::distributions::FTail;
use crate::helpers::{mean, require_finite};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoefficientIntervals {
    pub slope: Interval,
    pub intercept: Interval,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionResult {
    pub n: usize,
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
    pub r_squared: f64,
    /// Residual standard error, √(SSres / (n − 2))
    pub standard_error: f64,
    pub slope_standard_error: f64,
    pub intercept_standard_error: f64,
    /// Infinite for a perfect fit
    pub f_statistic: f64,
    pub p_value: f64,
    pub f_tail: FTail,
    /// Coefficient ± 1.96 · SE
    pub confidence_intervals: CoefficientIntervals,
    pub predictions: Vec<f64>,
    pub residuals: Vec<f64>,
}

/// Regress `y` on `x` with the default F tail
pub fn regression(x: &[f64], y: &[f64]) -> Result<RegressionResult, StatsError> {
    regression_with(x, y, FTail::default())
}

pub fn regression_with(x: &[f64], y: &[f64], tail: FTail) -> Result<RegressionResult, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::validation(format!(
            "regression needs paired values: x has {}, y has {}",
            x.len(),
            y.len()
        )));
    }
    require_finite(x, "x")?;
    require_finite(y, "y")?;

    let n = x.len();
    if n < 3 {
        return Err(StatsError::insufficient_data(3, n));
    }

    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let (dx, dy) = (xi - mean_x, yi - mean_y);
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    if sxx < ZERO_VARIANCE_EPSILON {
        return Err(StatsError::zero_variance("x"));
    }
    if syy < ZERO_VARIANCE_EPSILON {
        return Err(StatsError::zero_variance("y"));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    // rounding can push an exact fit past ±1
    let r_squared = ((sxy * sxy) / (sxx * syy)).clamp(0.0, 1.0);
    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);

    let predictions: Vec<f64> = x.iter().map(|xi| slope * xi + intercept).collect();
    let residuals: Vec<f64> = y.iter().zip(&predictions).map(|(yi, p)| yi - p).collect();

    let df = (n - 2) as f64;
    let residual_ss: f64 = residuals.iter().map(|e| e * e).sum();
    let standard_error = (residual_ss / df).sqrt();
    let slope_standard_error = standard_error / sxx.sqrt();
    let intercept_standard_error = standard_error * (1.0 / n as f64 + mean_x * mean_x / sxx).sqrt();

    let f_statistic = if r_squared < 1.0 {
        r_squared / ((1.0 - r_squared) / df)
    } else {
        f64::INFINITY
    };

    Ok(RegressionResult {
        n,
        slope,
        intercept,
        r,
        r_squared,
        standard_error,
        slope_standard_error,
        intercept_standard_error,
        f_statistic,
        p_value: tail.p_value(f_statistic, 1.0, df),
        f_tail: tail,
        confidence_intervals: CoefficientIntervals {
            slope: Interval::around(slope, slope_standard_error),
            intercept: Interval::around(intercept, intercept_standard_error),
        },
        predictions,
        residuals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use likert_core::codes;

    const X: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

    #[test]
    fn test_exact_line() {
        let y: Vec<f64> = X.iter().map(|x| 2.0 * x + 3.0).collect();
        let r = regression(&X, &y).unwrap();
        assert!((r.slope - 2.0).abs() < 1e-12);
        assert!((r.intercept - 3.0).abs() < 1e-12);
        assert!((r.r_squared - 1.0).abs() < 1e-12);
        assert!(r.residuals.iter().all(|e| e.abs() < 1e-12));
        assert!(r.p_value.abs() < 1e-12);
    }

    #[test]
    fn test_decimal_exact_lines_are_significant() {
        for k in 0..200 {
            let x: Vec<f64> = (0..8).map(|i| 0.1 * i as f64 + 0.01 * k as f64).collect();
            let y: Vec<f64> = x.iter().map(|v| 0.3 * v + 0.7).collect();
            for tail in [FTail::Approximate, FTail::Exact] {
                let r = regression_with(&x, &y, tail).unwrap();
                assert!(r.r_squared <= 1.0 && r.r_squared > 1.0 - 1e-9);
                assert!(r.r.abs() <= 1.0);
                assert!(r.f_statistic > 1e6);
                assert!(r.p_value.abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_noisy_line() {
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let r = regression(&X, &y).unwrap();
        assert!((r.slope - 0.6).abs() < 1e-12);
        assert!((r.intercept - 2.2).abs() < 1e-12);
        assert!((r.r_squared - 0.6).abs() < 1e-12);
        // SSres = 2.4 on 3 degrees of freedom
        assert!((r.standard_error - 0.8f64.sqrt()).abs() < 1e-12);
        assert!((r.slope_standard_error - 0.08f64.sqrt()).abs() < 1e-12);
        assert!((r.f_statistic - 4.5).abs() < 1e-9);
        assert!(r.confidence_intervals.slope.contains(0.6));
        assert_eq!(r.predictions.len(), 5);
    }

    #[test]
    fn test_negative_slope_r() {
        let y = [5.0, 4.0, 3.0, 2.0, 1.0];
        let r = regression(&X, &y).unwrap();
        assert!((r.r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_mismatch() {
        let err = regression(&X, &[1.0, 2.0]).unwrap_err();
        assert_eq!(err.code, codes::VALIDATION);
    }

    #[test]
    fn test_too_few_points() {
        let err = regression(&[1.0, 2.0], &[1.0, 3.0]).unwrap_err();
        assert_eq!(err.code, codes::INSUFFICIENT_DATA);
    }

    #[test]
    fn test_constant_predictor() {
        let err = regression(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err.code, codes::ZERO_VARIANCE);
        let err = regression(&X, &[1.0; 5]).unwrap_err();
        assert_eq!(err.code, codes::ZERO_VARIANCE);
    }
}
