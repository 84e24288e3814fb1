//! Structured errors for statistical analyses
//!
//! Every failure the engine can report is a `StatsError` value carrying a
//! machine-readable code, a human-readable message and optional context
//! (which variable group, analysis or variable it came from).

use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const SHAPE_ERROR: &str = "SHAPE_ERROR";
    pub const SINGULAR_MATRIX: &str = "SINGULAR_MATRIX";
    pub const INSUFFICIENT_DATA: &str = "INSUFFICIENT_DATA";
    pub const ZERO_VARIANCE: &str = "ZERO_VARIANCE";
    pub const VALIDATION: &str = "VALIDATION";
    pub const UNKNOWN_VARIABLE: &str = "UNKNOWN_VARIABLE";
    pub const UNKNOWN_ANALYSIS: &str = "UNKNOWN_ANALYSIS";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Result was produced but should be read with care
    Warning,
    /// The analysis failed for this input
    Error,
    /// Nothing can be computed (bug or corrupt request)
    Fatal,
}

/// Context about where an error occurred
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Variable group id (batch mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Analysis kind that failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,

    /// Offending variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Structured error returned by every fallible analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Where the error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    /// Severity level
    pub severity: Severity,
}

impl StatsError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            context: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set group context
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.group = Some(group.into());
        self
    }

    /// Builder: set analysis context
    pub fn in_analysis(mut self, analysis: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.analysis = Some(analysis.into());
        self
    }

    /// Builder: set variable context
    pub fn for_variable(mut self, variable: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.variable = Some(variable.into());
        self
    }

    /// Builder: add propagation note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.notes.push(note.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    // ========== Common Error Constructors ==========

    pub fn shape(details: impl Into<String>) -> Self {
        Self::new(codes::SHAPE_ERROR, format!("Shape error: {}", details.into()))
    }

    pub fn singular_matrix(details: impl Into<String>) -> Self {
        Self::new(codes::SINGULAR_MATRIX, format!("Singular matrix: {}", details.into()))
            .with_suggestion("Remove perfectly collinear or duplicated variables")
    }

    pub fn insufficient_data(required: usize, got: usize) -> Self {
        Self::new(
            codes::INSUFFICIENT_DATA,
            format!("Insufficient data: at least {} valid cases required, got {}", required, got),
        )
        .with_suggestion("Select fewer variables or provide more complete cases")
    }

    pub fn zero_variance(variable: &str) -> Self {
        Self::new(codes::ZERO_VARIANCE, format!("Zero variance: '{}' is constant", variable))
            .with_suggestion(format!("Exclude '{}' from the analysis", variable))
            .for_variable(variable)
    }

    pub fn validation(details: impl Into<String>) -> Self {
        Self::new(codes::VALIDATION, format!("Validation error: {}", details.into()))
    }

    pub fn variable_count(analysis: &str, expected: &str, got: usize) -> Self {
        Self::validation(format!("{} requires {} variables, got {}", analysis, expected, got))
            .in_analysis(analysis)
    }

    pub fn unknown_variable(name: &str) -> Self {
        Self::new(codes::UNKNOWN_VARIABLE, format!("Unknown variable: {}", name))
            .with_suggestion("Check the column names of the data table")
            .for_variable(name)
    }

    pub fn unknown_analysis(name: &str) -> Self {
        Self::new(codes::UNKNOWN_ANALYSIS, format!("Unknown analysis: {}", name))
    }

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for StatsError {}
