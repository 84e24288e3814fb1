//! Group comparisons: two-sample t-test and one-way ANOVA

use likert_core::StatsError;
use serde::Serialize;
use crate::bivariate::ZERO_VARIANCE_EPSILON;
use crate::descriptive::Interval;
use crate::distributions::normal::two_sided_p;
use crate::distributions::FTail;
use crate::helpers::{mean, require_finite, sample_variance, sum};

// ============ t-test ============

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TTestResult {
    pub t_value: f64,
    /// Normal approximation to the t distribution
    pub p_value: f64,
    pub degrees_of_freedom: usize,
    pub n1: usize,
    pub n2: usize,
    pub mean1: f64,
    pub mean2: f64,
    /// Sample standard deviations
    pub std_dev1: f64,
    pub std_dev2: f64,
    pub mean_difference: f64,
    pub standard_error: f64,
    /// Mean difference ± 1.96 · SE
    pub confidence_interval: Interval,
}

/// Pooled-variance two-sample t-test
///
/// Each group needs at least two values. Identical constant groups have no
/// pooled variance and fail with `ZERO_VARIANCE`.
pub fn t_test(group1: &[f64], group2: &[f64]) -> Result<TTestResult, StatsError> {
    require_finite(group1, "group 1")?;
    require_finite(group2, "group 2")?;

    let (n1, n2) = (group1.len(), group2.len());
    if n1 < 2 || n2 < 2 {
        return Err(StatsError::insufficient_data(2, n1.min(n2))
            .with_note("each t-test group needs two values"));
    }

    let (mean1, mean2) = (mean(group1)?, mean(group2)?);
    let (var1, var2) = (sample_variance(group1)?, sample_variance(group2)?);

    let df = n1 + n2 - 2;
    let pooled = ((n1 - 1) as f64 * var1 + (n2 - 1) as f64 * var2) / df as f64;
    if pooled < ZERO_VARIANCE_EPSILON {
        return Err(StatsError::zero_variance("pooled groups"));
    }

    let standard_error = (pooled * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
    let mean_difference = mean1 - mean2;
    let t_value = mean_difference / standard_error;

    Ok(TTestResult {
        t_value,
        p_value: two_sided_p(t_value),
        degrees_of_freedom: df,
        n1,
        n2,
        mean1,
        mean2,
        std_dev1: var1.sqrt(),
        std_dev2: var2.sqrt(),
        mean_difference,
        standard_error,
        confidence_interval: Interval::around(mean_difference, standard_error),
    })
}

// ============ One-way ANOVA ============

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaResult {
    pub f_value: f64,
    pub p_value: f64,
    pub f_tail: FTail,
    pub df_between: usize,
    pub df_within: usize,
    pub sum_squares_between: f64,
    pub sum_squares_within: f64,
    pub mean_square_between: f64,
    pub mean_square_within: f64,
    pub eta_squared: f64,
    pub group_means: Vec<f64>,
    pub group_sizes: Vec<usize>,
}

/// One-way ANOVA with the default F tail
pub fn anova(groups: &[Vec<f64>]) -> Result<AnovaResult, StatsError> {
    anova_with(groups, FTail::default())
}

/// One-way ANOVA; empty groups are ignored
pub fn anova_with(groups: &[Vec<f64>], tail: FTail) -> Result<AnovaResult, StatsError> {
    for (i, g) in groups.iter().enumerate() {
        require_finite(g, &format!("group {}", i + 1))?;
    }
    let groups: Vec<&Vec<f64>> = groups.iter().filter(|g| !g.is_empty()).collect();

    let k = groups.len();
    if k < 2 {
        return Err(StatsError::validation(format!(
            "ANOVA requires at least 2 non-empty groups, got {}",
            k
        )));
    }

    let total_n: usize = groups.iter().map(|g| g.len()).sum();
    if total_n <= k {
        return Err(StatsError::insufficient_data(k + 1, total_n));
    }

    let group_means = groups.iter().map(|g| mean(g)).collect::<Result<Vec<_>, _>>()?;
    let grand_mean = groups.iter().map(|g| sum(g)).sum::<f64>() / total_n as f64;

    let ssb: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(g, m)| g.len() as f64 * (m - grand_mean).powi(2))
        .sum();
    let ssw: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(g, m)| g.iter().map(|x| (x - m).powi(2)).sum::<f64>())
        .sum();

    if ssw < ZERO_VARIANCE_EPSILON {
        return Err(StatsError::zero_variance("within groups"));
    }

    let df_between = k - 1;
    let df_within = total_n - k;
    let msb = ssb / df_between as f64;
    let msw = ssw / df_within as f64;
    let f_value = msb / msw;

    Ok(AnovaResult {
        f_value,
        p_value: tail.p_value(f_value, df_between as f64, df_within as f64),
        f_tail: tail,
        df_between,
        df_within,
        sum_squares_between: ssb,
        sum_squares_within: ssw,
        mean_square_between: msb,
        mean_square_within: msw,
        eta_squared: ssb / (ssb + ssw),
        group_means,
        group_sizes: groups.iter().map(|g| g.len()).collect(),
    })
}
