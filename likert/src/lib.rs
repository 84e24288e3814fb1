//! Likert - survey statistics engine
//!
//! Typed requests in, typed results out. The engine validates the variable
//! selection for each analysis, dispatches to `likert-stats` and, in auto
//! mode, runs one analysis per detected question group.

mod config;
mod kind;
mod result;
mod groups;
mod engine;

pub use config::{EngineConfig, ENV_F_TAIL, ENV_MIN_CASES_PER_VARIABLE, ENV_ROTATE};
pub use kind::{AnalysisKind, Arity};
pub use result::{AnalysisResult, AnovaReport, DescriptiveSummary, RegressionReport, TTestReport};
pub use groups::{answer_columns, detect_question_groups, Question, VariableGroup, FULLTEXT_SUFFIX};
pub use engine::{AnalysisRequest, BatchReport, Engine, GroupOutcome};

pub use likert_core::{Cell, DataTable, StatsError};
pub use likert_stats::FTail;

use serde_json::{json, Value as JsonValue};

/// Name, description and variable count of every analysis
pub fn list_analyses() -> JsonValue {
    let analyses: Vec<JsonValue> = AnalysisKind::ALL
        .iter()
        .map(|k| {
            json!({
                "name": k.as_str(),
                "description": k.description(),
                "variables": k.arity().to_string(),
                "group_by": k.accepts_group_by(),
            })
        })
        .collect();
    json!({ "analyses": analyses })
}

/// Build a variable list: `vars!["q1", "q2"]`
#[macro_export]
macro_rules! vars {
    [] => { Vec::<String>::new() };
    [ $($name:expr),+ $(,)? ] => {
        vec![$($name.to_string()),+]
    };
}
