//! Typed analysis results

use crate::kind::AnalysisKind;
use likert_stats::{
    AnovaResult, CorrelationMatrix, CorrelationResult, CronbachAlpha, DescriptiveStats,
    FactorAnalysis, RegressionResult, ReliabilityReport, TTestResult,
};
use serde::Serialize;

/// Descriptive statistics for one variable; `None` when it has no numeric values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveSummary {
    pub variable: String,
    pub stats: Option<DescriptiveStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TTestReport {
    /// Labels of the two compared groups
    pub group1: String,
    pub group2: String,
    #[serde(flatten)]
    pub result: TTestResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaReport {
    /// One label per entry of `group_means`
    pub groups: Vec<String>,
    #[serde(flatten)]
    pub result: AnovaResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionReport {
    /// Predictor
    pub x: String,
    /// Outcome
    pub y: String,
    /// Cases dropped by listwise deletion
    pub excluded: usize,
    #[serde(flatten)]
    pub result: RegressionResult,
}

/// One strongly-typed result per analysis kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "analysis", content = "result", rename_all = "snake_case")]
pub enum AnalysisResult {
    Descriptive(Vec<DescriptiveSummary>),
    Cronbach(Option<CronbachAlpha>),
    Reliability(Option<ReliabilityReport>),
    Correlation(CorrelationResult),
    CorrelationMatrix(CorrelationMatrix),
    TTest(TTestReport),
    Anova(AnovaReport),
    Regression(RegressionReport),
    Factor(FactorAnalysis),
}

impl AnalysisResult {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisResult::Descriptive(_) => AnalysisKind::Descriptive,
            AnalysisResult::Cronbach(_) => AnalysisKind::Cronbach,
            AnalysisResult::Reliability(_) => AnalysisKind::Reliability,
            AnalysisResult::Correlation(_) => AnalysisKind::Correlation,
            AnalysisResult::CorrelationMatrix(_) => AnalysisKind::CorrelationMatrix,
            AnalysisResult::TTest(_) => AnalysisKind::TTest,
            AnalysisResult::Anova(_) => AnalysisKind::Anova,
            AnalysisResult::Regression(_) => AnalysisKind::Regression,
            AnalysisResult::Factor(_) => AnalysisKind::Factor,
        }
    }

    /// True for the explicit "no result" cases (nothing to display)
    pub fn is_empty(&self) -> bool {
        match self {
            AnalysisResult::Descriptive(items) => items.iter().all(|d| d.stats.is_none()),
            AnalysisResult::Cronbach(alpha) => alpha.is_none(),
            AnalysisResult::Reliability(report) => report.is_none(),
            _ => false,
        }
    }
}
