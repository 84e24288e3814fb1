//! Analysis dispatch and batch ("auto mode") execution

use crate::config::EngineConfig;
use crate::groups::{detect_question_groups, VariableGroup};
use crate::kind::AnalysisKind;
use crate::result::{AnalysisResult, AnovaReport, DescriptiveSummary, RegressionReport, TTestReport};
use likert_core::{DataTable, StatsError};
use likert_stats::{
    anova_with, correlate, correlation_matrix, cronbach_alpha, describe, factor_analysis,
    full_reliability, regression_with, t_test,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info_span, warn};

/// One analysis over a set of variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub kind: AnalysisKind,
    pub variables: Vec<String>,
    /// Split the single value variable into groups by this column (t-test, ANOVA)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
}

impl AnalysisRequest {
    pub fn new(kind: AnalysisKind, variables: Vec<String>) -> Self {
        Self {
            kind,
            variables,
            group_by: None,
        }
    }

    pub fn grouped_by(mut self, group_var: impl Into<String>) -> Self {
        self.group_by = Some(group_var.into());
        self
    }
}

/// Result or failure of one variable group in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupOutcome {
    pub group: String,
    pub name: String,
    pub variables: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StatsError>,
}

impl GroupOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub analysis: AnalysisKind,
    pub outcomes: Vec<GroupOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn outcome(&self, group: &str) -> Option<&GroupOutcome> {
        self.outcomes.iter().find(|o| o.group == group)
    }
}

/// Stateless analysis runner; holds only configuration
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one analysis; errors carry the analysis kind in their context
    pub fn run(&self, table: &DataTable, request: &AnalysisRequest) -> Result<AnalysisResult, StatsError> {
        let kind = request.kind;
        let span = info_span!("analysis", kind = kind.as_str(), variables = request.variables.len());
        let _enter = span.enter();

        validate(request)
            .and_then(|_| self.dispatch(table, request))
            .map_err(|e| e.in_analysis(kind.as_str()))
    }

    /// Run `kind` once per variable group, collecting failures instead of stopping
    ///
    /// `correlation` runs as `correlation_matrix` (see [`AnalysisKind::for_groups`]).
    pub fn run_groups(&self, table: &DataTable, kind: AnalysisKind, groups: &[VariableGroup]) -> BatchReport {
        let kind = kind.for_groups();
        let outcomes = groups
            .iter()
            .map(|group| {
                let variables = group.variables();
                let request = AnalysisRequest::new(kind, variables.clone());
                let (result, error) = match self.run(table, &request) {
                    Ok(result) => (Some(result), None),
                    Err(e) => {
                        let e = e.in_group(group.id.as_str());
                        warn!(group = %group.id, code = %e.code, "group analysis failed: {}", e.message);
                        (None, Some(e))
                    }
                };
                GroupOutcome {
                    group: group.id.clone(),
                    name: group.name.clone(),
                    variables,
                    result,
                    error,
                }
            })
            .collect();

        BatchReport {
            analysis: kind,
            outcomes,
        }
    }

    /// Detect question groups in `table` and run `kind` over each
    pub fn run_detected(&self, table: &DataTable, kind: AnalysisKind) -> BatchReport {
        let groups = detect_question_groups(table);
        debug!(groups = groups.len(), "detected question groups");
        self.run_groups(table, kind, &groups)
    }

    fn dispatch(&self, table: &DataTable, request: &AnalysisRequest) -> Result<AnalysisResult, StatsError> {
        let vars = &request.variables;

        match request.kind {
            AnalysisKind::Descriptive => {
                let summaries = vars
                    .iter()
                    .map(|v| {
                        Ok(DescriptiveSummary {
                            variable: v.clone(),
                            stats: describe(table, v)?,
                        })
                    })
                    .collect::<Result<Vec<_>, StatsError>>()?;
                Ok(AnalysisResult::Descriptive(summaries))
            }
            AnalysisKind::Cronbach => Ok(AnalysisResult::Cronbach(cronbach_alpha(table, vars)?)),
            AnalysisKind::Reliability => Ok(AnalysisResult::Reliability(full_reliability(table, vars)?)),
            AnalysisKind::Correlation => Ok(AnalysisResult::Correlation(correlate(table, &vars[0], &vars[1])?)),
            AnalysisKind::CorrelationMatrix => Ok(AnalysisResult::CorrelationMatrix(correlation_matrix(table, vars)?)),
            AnalysisKind::TTest => {
                let groups = sample_groups(table, request)?;
                if groups.len() != 2 {
                    return Err(StatsError::validation(format!(
                        "t-test compares exactly 2 groups, '{}' has {}",
                        request.group_by.as_deref().unwrap_or_default(),
                        groups.len()
                    ))
                    .with_suggestion("Use anova for more than two groups"));
                }
                let result = t_test(&groups[0].1, &groups[1].1)?;
                let mut labels = groups.into_iter().map(|(label, _)| label);
                Ok(AnalysisResult::TTest(TTestReport {
                    group1: labels.next().unwrap_or_default(),
                    group2: labels.next().unwrap_or_default(),
                    result,
                }))
            }
            AnalysisKind::Anova => {
                let (labels, values): (Vec<String>, Vec<Vec<f64>>) = sample_groups(table, request)?
                    .into_iter()
                    .filter(|(label, values)| {
                        if values.is_empty() {
                            debug!(group = %label, "dropping empty group");
                        }
                        !values.is_empty()
                    })
                    .unzip();
                let result = anova_with(&values, self.config.f_tail)?;
                Ok(AnalysisResult::Anova(AnovaReport { groups: labels, result }))
            }
            AnalysisKind::Regression => {
                let cases = table.cases(vars)?;
                let result = regression_with(&cases.column(0), &cases.column(1), self.config.f_tail)?;
                Ok(AnalysisResult::Regression(RegressionReport {
                    x: vars[0].clone(),
                    y: vars[1].clone(),
                    excluded: cases.excluded,
                    result,
                }))
            }
            AnalysisKind::Factor => Ok(AnalysisResult::Factor(factor_analysis(
                table,
                vars,
                &self.config.factor_options(),
            )?)),
        }
    }
}

/// Check the variable list against the analysis before touching data
fn validate(request: &AnalysisRequest) -> Result<(), StatsError> {
    let kind = request.kind;
    let count = request.variables.len();

    let mut seen = HashSet::new();
    if let Some(dup) = request.variables.iter().find(|v| !seen.insert(v.as_str())) {
        return Err(StatsError::validation(format!("variable '{}' is selected twice", dup)).for_variable(dup.as_str()));
    }

    match &request.group_by {
        Some(group_var) => {
            if !kind.accepts_group_by() {
                return Err(StatsError::validation(format!("{} does not accept group_by", kind))
                    .with_suggestion("Select the variables to analyse directly"));
            }
            if count != 1 {
                return Err(StatsError::variable_count(kind.as_str(), "exactly 1", count)
                    .with_note(format!("the value variable is split by '{}'", group_var)));
            }
        }
        None => {
            let arity = kind.arity();
            if !arity.accepts(count) {
                return Err(StatsError::variable_count(kind.as_str(), &arity.to_string(), count));
            }
        }
    }
    Ok(())
}

/// Labelled samples: one per selected column, or one per `group_by` value
fn sample_groups(table: &DataTable, request: &AnalysisRequest) -> Result<Vec<(String, Vec<f64>)>, StatsError> {
    match &request.group_by {
        Some(group_var) => Ok(table.split_by(&request.variables[0], group_var)?.into_iter().collect()),
        None => {
            table.require_columns(&request.variables)?;
            Ok(request
                .variables
                .iter()
                .map(|v| (v.clone(), table.numeric_column(v)))
                .collect())
        }
    }
}
