//! Likert Statistics
//!
//! Statistical routines over survey tables. Every function is a pure
//! transform: the caller owns the input table and receives a freshly
//! computed result.
//!
//! - Descriptive statistics per variable
//! - Pearson correlation and correlation matrices
//! - Cronbach's alpha and the full reliability bundle
//! - Two-sample t-test, one-way ANOVA, simple linear regression
//! - Principal component factor analysis with KMO, Bartlett and varimax
//!
//! Variance is the population form throughout unless a function says otherwise.

pub mod helpers;
pub mod distributions;
mod descriptive;
mod bivariate;
mod reliability;
mod hypothesis;
mod regression;
mod factor;

pub use descriptive::{describe, describe_values, DescriptiveStats, Interval, Quartiles, Z_95};
pub use bivariate::{
    correlate, correlation, correlation_matrix, CorrelationMatrix, CorrelationResult,
    MIN_CORRELATION_CASES, ZERO_VARIANCE_EPSILON,
};
pub use reliability::{
    alpha_of, cronbach_alpha, full_reliability, CaseProcessing, CronbachAlpha, ItemStatistics,
    ItemTotalStatistics, ReliabilityReport, ReliabilityStatistics, ScaleStatistics,
};
pub use hypothesis::{anova, anova_with, t_test, AnovaResult, TTestResult};
pub use regression::{regression, regression_with, CoefficientIntervals, RegressionResult};
pub use factor::{
    bartlett, factor_analysis, kmo, Bartlett, Communality, ComponentVariance, FactorAnalysis,
    FactorOptions, Kmo, VarianceShare,
};
pub use distributions::FTail;
