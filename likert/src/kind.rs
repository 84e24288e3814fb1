//! Analysis kinds and name lookup

use likert_core::StatsError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Descriptive,
    Cronbach,
    Reliability,
    Correlation,
    CorrelationMatrix,
    TTest,
    Anova,
    Regression,
    Factor,
}

/// How many variables an analysis accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    AtLeast(usize),
    Exactly(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::AtLeast(min) => count >= min,
            Arity::Exactly(n) => count == n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::AtLeast(n) => write!(f, "at least {}", n),
            Arity::Exactly(n) => write!(f, "exactly {}", n),
        }
    }
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 9] = [
        AnalysisKind::Descriptive,
        AnalysisKind::Cronbach,
        AnalysisKind::Reliability,
        AnalysisKind::Correlation,
        AnalysisKind::CorrelationMatrix,
        AnalysisKind::TTest,
        AnalysisKind::Anova,
        AnalysisKind::Regression,
        AnalysisKind::Factor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Descriptive => "descriptive",
            AnalysisKind::Cronbach => "cronbach",
            AnalysisKind::Reliability => "reliability",
            AnalysisKind::Correlation => "correlation",
            AnalysisKind::CorrelationMatrix => "correlation_matrix",
            AnalysisKind::TTest => "t_test",
            AnalysisKind::Anova => "anova",
            AnalysisKind::Regression => "regression",
            AnalysisKind::Factor => "factor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnalysisKind::Descriptive => "Count, central tendency, dispersion and shape per variable",
            AnalysisKind::Cronbach => "Cronbach's alpha with item-total correlations and alpha if item deleted",
            AnalysisKind::Reliability => "Full reliability bundle: case processing, item, inter-item and scale statistics",
            AnalysisKind::Correlation => "Pearson correlation between two variables",
            AnalysisKind::CorrelationMatrix => "Pairwise Pearson correlations over listwise-complete cases",
            AnalysisKind::TTest => "Two-sample t-test with pooled variance",
            AnalysisKind::Anova => "One-way analysis of variance",
            AnalysisKind::Regression => "Simple linear regression of the second variable on the first",
            AnalysisKind::Factor => "Principal component analysis with KMO, Bartlett and varimax rotation",
        }
    }

    /// Variable count accepted without a grouping variable
    pub fn arity(&self) -> Arity {
        match self {
            AnalysisKind::Descriptive => Arity::AtLeast(1),
            AnalysisKind::Correlation | AnalysisKind::TTest | AnalysisKind::Regression => Arity::Exactly(2),
            AnalysisKind::Cronbach
            | AnalysisKind::Reliability
            | AnalysisKind::CorrelationMatrix
            | AnalysisKind::Anova
            | AnalysisKind::Factor => Arity::AtLeast(2),
        }
    }

    /// Kind actually run per variable group in batch mode
    ///
    /// Question groups usually hold more than two items, so a pairwise
    /// correlation becomes a correlation matrix over the group.
    pub fn for_groups(&self) -> AnalysisKind {
        match self {
            AnalysisKind::Correlation => AnalysisKind::CorrelationMatrix,
            other => *other,
        }
    }

    /// Whether a grouping variable may replace explicit group columns
    pub fn accepts_group_by(&self) -> bool {
        matches!(self, AnalysisKind::TTest | AnalysisKind::Anova)
    }

    /// Known names ordered by similarity to `query`, best first
    pub fn suggestions(query: &str) -> Vec<&'static str> {
        let query = query.to_lowercase();
        let mut matches: Vec<(&'static str, usize)> = Self::ALL
            .iter()
            .map(|k| k.as_str())
            .filter_map(|name| {
                let score = similarity_score(&query, name);
                if score > 0 { Some((name, score)) } else { None }
            })
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1));
        matches.into_iter().map(|(name, _)| name).collect()
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        let alias = match normalized.as_str() {
            "alpha" | "cronbach_alpha" => Some(AnalysisKind::Cronbach),
            "ttest" => Some(AnalysisKind::TTest),
            "pca" | "factor_analysis" => Some(AnalysisKind::Factor),
            "descriptives" => Some(AnalysisKind::Descriptive),
            _ => None,
        };
        if let Some(kind) = alias {
            return Ok(kind);
        }

        if let Some(kind) = Self::ALL.iter().find(|k| k.as_str() == normalized) {
            return Ok(*kind);
        }

        let mut err = StatsError::unknown_analysis(s);
        if let Some(best) = Self::suggestions(&normalized).first() {
            err = err.with_suggestion(format!("Did you mean '{}'?", best));
        }
        Err(err)
    }
}

/// Similarity between a query and a candidate name
fn similarity_score(query: &str, candidate: &str) -> usize {
    let mut score = 0;

    if candidate.starts_with(query) {
        score += 100;
    } else if candidate.contains(query) {
        score += 50;
    } else if query.contains(candidate) {
        score += 30;
    }

    // Shared characters
    let query_chars: HashSet<char> = query.chars().collect();
    let candidate_chars: HashSet<char> = candidate.chars().collect();
    score += query_chars.intersection(&candidate_chars).count() * 2;

    let len_diff = query.len().abs_diff(candidate.len());
    if len_diff < 5 && score > 0 {
        score += 5 - len_diff;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use likert_core::codes;

    #[test]
    fn test_round_trip_names() {
        for kind in AnalysisKind::ALL {
            assert_eq!(kind.as_str().parse::<AnalysisKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("T-Test".parse::<AnalysisKind>().unwrap(), AnalysisKind::TTest);
        assert_eq!("correlation matrix".parse::<AnalysisKind>().unwrap(), AnalysisKind::CorrelationMatrix);
        assert_eq!("pca".parse::<AnalysisKind>().unwrap(), AnalysisKind::Factor);
        assert_eq!("alpha".parse::<AnalysisKind>().unwrap(), AnalysisKind::Cronbach);
    }

    #[test]
    fn test_unknown_with_suggestion() {
        let err = "regresion".parse::<AnalysisKind>().unwrap_err();
        assert_eq!(err.code, codes::UNKNOWN_ANALYSIS);
        assert_eq!(err.suggestion.as_deref(), Some("Did you mean 'regression'?"));
    }

    #[test]
    fn test_prefix_ranks_first() {
        assert_eq!(AnalysisKind::suggestions("corr")[0], "correlation");
    }

    #[test]
    fn test_arity() {
        assert!(AnalysisKind::Descriptive.arity().accepts(1));
        assert!(!AnalysisKind::Cronbach.arity().accepts(1));
        assert!(AnalysisKind::Regression.arity().accepts(2));
        assert!(!AnalysisKind::Regression.arity().accepts(3));
        assert_eq!(AnalysisKind::TTest.arity().to_string(), "exactly 2");
    }

    #[test]
    fn test_for_groups() {
        assert_eq!(AnalysisKind::Correlation.for_groups(), AnalysisKind::CorrelationMatrix);
        assert_eq!(AnalysisKind::Cronbach.for_groups(), AnalysisKind::Cronbach);
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(serde_json::to_string(&AnalysisKind::CorrelationMatrix).unwrap(), "\"correlation_matrix\"");
        let k: AnalysisKind = serde_json::from_str("\"t_test\"").unwrap();
        assert_eq!(k, AnalysisKind::TTest);
    }
}
