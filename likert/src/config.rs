//! Engine configuration

use likert_core::StatsError;
use likert_stats::{FTail, FactorOptions};
use serde::{Deserialize, Serialize};

pub const ENV_ROTATE: &str = "LIKERT_ROTATE";
pub const ENV_MIN_CASES_PER_VARIABLE: &str = "LIKERT_MIN_CASES_PER_VARIABLE";
pub const ENV_F_TAIL: &str = "LIKERT_F_TAIL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Varimax-rotate factor solutions with two or more components
    pub rotate: bool,
    /// Factor-analysis sample gate, `n >= ratio · p`; 0 disables it
    pub min_cases_per_variable: usize,
    /// F CDF used for ANOVA and regression p-values
    pub f_tail: FTail,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let factor = FactorOptions::default();
        Self {
            rotate: factor.rotate,
            min_cases_per_variable: factor.min_cases_per_variable,
            f_tail: FTail::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_rotation(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    pub fn with_min_cases_per_variable(mut self, ratio: usize) -> Self {
        self.min_cases_per_variable = ratio;
        self
    }

    pub fn with_f_tail(mut self, tail: FTail) -> Self {
        self.f_tail = tail;
        self
    }

    /// Defaults overridden by `LIKERT_*` environment variables
    pub fn from_env() -> Result<Self, StatsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `LIKERT_*` key
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StatsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ROTATE) {
            config.rotate = parse_bool(&raw).ok_or_else(|| invalid(ENV_ROTATE, &raw))?;
        }
        if let Some(raw) = lookup(ENV_MIN_CASES_PER_VARIABLE) {
            config.min_cases_per_variable = raw
                .trim()
                .parse()
                .map_err(|_| invalid(ENV_MIN_CASES_PER_VARIABLE, &raw))?;
        }
        if let Some(raw) = lookup(ENV_F_TAIL) {
            config.f_tail = raw.parse().map_err(|e: StatsError| e.with_note(format!("from {}", ENV_F_TAIL)))?;
        }

        Ok(config)
    }

    pub fn factor_options(&self) -> FactorOptions {
        FactorOptions {
            rotate: self.rotate,
            min_cases_per_variable: self.min_cases_per_variable,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(key: &str, raw: &str) -> StatsError {
    StatsError::validation(format!("{} has invalid value '{}'", key, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use likert_core::codes;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.rotate);
        assert_eq!(config.min_cases_per_variable, 5);
        assert_eq!(config.f_tail, FTail::Approximate);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            (ENV_ROTATE, "off"),
            (ENV_MIN_CASES_PER_VARIABLE, " 10 "),
            (ENV_F_TAIL, "exact"),
        ]))
        .unwrap();
        assert!(!config.rotate);
        assert_eq!(config.min_cases_per_variable, 10);
        assert_eq!(config.f_tail, FTail::Exact);
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        assert_eq!(EngineConfig::from_lookup(lookup(&[])).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_invalid_values() {
        let err = EngineConfig::from_lookup(lookup(&[(ENV_ROTATE, "maybe")])).unwrap_err();
        assert_eq!(err.code, codes::VALIDATION);
        let err = EngineConfig::from_lookup(lookup(&[(ENV_MIN_CASES_PER_VARIABLE, "-1")])).unwrap_err();
        assert_eq!(err.code, codes::VALIDATION);
        let err = EngineConfig::from_lookup(lookup(&[(ENV_F_TAIL, "fast")])).unwrap_err();
        assert_eq!(err.code, codes::VALIDATION);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: EngineConfig = serde_json::from_str(r#"{"f_tail": "exact"}"#).unwrap();
        assert_eq!(config.f_tail, FTail::Exact);
        assert!(config.rotate);
    }

    #[test]
    fn test_builders_and_factor_options() {
        let config = EngineConfig::default().with_rotation(false).with_min_cases_per_variable(0);
        let options = config.factor_options();
        assert!(!options.rotate);
        assert_eq!(options.min_cases_per_variable, 0);
    }
}
