//! Cronbach's alpha and the full reliability bundle

use std::collections::BTreeMap;
use likert_core::{codes, CaseMatrix, DataTable, StatsError};
use serde::Serialize;
use tracing::debug;
use crate::bivariate::{correlation, CorrelationMatrix, ZERO_VARIANCE_EPSILON};
use crate::helpers::{mean, std_dev, sum, variance};

// ============ Cronbach's Alpha ============

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CronbachAlpha {
    pub alpha: f64,
    /// Item vs. sum of the other items
    pub item_total_correlations: BTreeMap<String, f64>,
    /// `None` when fewer than two items would remain
    pub alpha_if_item_deleted: BTreeMap<String, Option<f64>>,
}

/// Alpha over `variables`; `Ok(None)` for fewer than two variables or no valid cases
pub fn cronbach_alpha(table: &DataTable, variables: &[String]) -> Result<Option<CronbachAlpha>, StatsError> {
    if variables.len() < 2 {
        return Ok(None);
    }
    let cases = table.cases(variables)?;
    if cases.is_empty() {
        return Ok(None);
    }

    let alpha = alpha_of(&cases)?;
    let totals = cases.row_sums();

    let mut item_total_correlations = BTreeMap::new();
    let mut alpha_if_item_deleted = BTreeMap::new();
    for (j, name) in cases.variables.iter().enumerate() {
        item_total_correlations.insert(name.clone(), item_total_correlation(&cases, &totals, j));
        alpha_if_item_deleted.insert(name.clone(), alpha_without(&cases, j)?);
    }

    Ok(Some(CronbachAlpha {
        alpha,
        item_total_correlations,
        alpha_if_item_deleted,
    }))
}

/// (k / (k−1)) · (1 − Σ item variances / variance of row sums), population variances
pub fn alpha_of(cases: &CaseMatrix) -> Result<f64, StatsError> {
    let k = cases.p();
    if k < 2 {
        return Err(StatsError::variable_count("cronbach", "at least 2", k));
    }

    let item_variance_sum = cases
        .columns()
        .iter()
        .map(|c| variance(c))
        .sum::<Result<f64, _>>()?;
    let total_variance = variance(&cases.row_sums())?;

    if total_variance < ZERO_VARIANCE_EPSILON {
        return Err(StatsError::zero_variance("total score").with_note("scale sum is constant across cases"));
    }

    let k = k as f64;
    Ok((k / (k - 1.0)) * (1.0 - item_variance_sum / total_variance))
}

fn alpha_without(cases: &CaseMatrix, j: usize) -> Result<Option<f64>, StatsError> {
    if cases.p() < 3 {
        return Ok(None);
    }
    match alpha_of(&cases.without(j)) {
        Ok(a) => Ok(Some(a)),
        Err(e) if e.is(codes::ZERO_VARIANCE) => {
            debug!(item = %cases.variables[j], "remaining items have a constant sum; alpha if deleted undefined");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn rest_scores(cases: &CaseMatrix, totals: &[f64], j: usize) -> Vec<f64> {
    cases.rows.iter().zip(totals).map(|(row, t)| t - row[j]).collect()
}

fn item_total_correlation(cases: &CaseMatrix, totals: &[f64], j: usize) -> f64 {
    correlation(&cases.column(j), &rest_scores(cases, totals, j))
}

// ============ Full Reliability Analysis ============

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaseProcessing {
    pub valid: usize,
    pub excluded: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReliabilityStatistics {
    pub cronbach_alpha: f64,
    /// Spearman-Brown form from the mean inter-item correlation
    pub standardized_alpha: f64,
    pub n_items: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStatistics {
    pub variable: String,
    pub mean: f64,
    pub std_dev: f64,
    pub n: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemTotalStatistics {
    pub variable: String,
    pub scale_mean_if_deleted: f64,
    pub scale_variance_if_deleted: f64,
    pub item_total_correlation: f64,
    pub squared_multiple_correlation: f64,
    pub alpha_if_deleted: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleStatistics {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub n_items: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReliabilityReport {
    pub case_processing: CaseProcessing,
    pub reliability: ReliabilityStatistics,
    pub item_statistics: Vec<ItemStatistics>,
    pub inter_item_correlations: CorrelationMatrix,
    pub item_total_statistics: Vec<ItemTotalStatistics>,
    pub scale: ScaleStatistics,
}

/// Reliability bundle; `Ok(None)` under the same conditions as [`cronbach_alpha`]
pub fn full_reliability(table: &DataTable, variables: &[String]) -> Result<Option<ReliabilityReport>, StatsError> {
    if variables.len() < 2 {
        return Ok(None);
    }
    let cases = table.cases(variables)?;
    if cases.is_empty() {
        return Ok(None);
    }

    let k = cases.p();
    let n = cases.n();
    let alpha = alpha_of(&cases)?;
    let correlations = CorrelationMatrix::from_cases(&cases)?;
    let r_bar = correlations.mean_off_diagonal();
    let standardized_alpha = (k as f64 * r_bar) / (1.0 + (k as f64 - 1.0) * r_bar);

    let totals = cases.row_sums();
    let columns = cases.columns();

    let mut item_statistics = Vec::with_capacity(k);
    let mut item_total_statistics = Vec::with_capacity(k);
    for (j, name) in cases.variables.iter().enumerate() {
        item_statistics.push(ItemStatistics {
            variable: name.clone(),
            mean: mean(&columns[j])?,
            std_dev: std_dev(&columns[j])?,
            n,
        });

        let rest = rest_scores(&cases, &totals, j);
        item_total_statistics.push(ItemTotalStatistics {
            variable: name.clone(),
            scale_mean_if_deleted: mean(&rest)?,
            scale_variance_if_deleted: variance(&rest)?,
            item_total_correlation: correlation(&columns[j], &rest),
            squared_multiple_correlation: squared_multiple_correlation(&correlations, j)?,
            alpha_if_deleted: alpha_without(&cases, j)?,
        });
    }

    let scale_variance = variance(&totals)?;

    Ok(Some(ReliabilityReport {
        case_processing: CaseProcessing {
            valid: n,
            excluded: cases.excluded,
            total: cases.total(),
        },
        reliability: ReliabilityStatistics {
            cronbach_alpha: alpha,
            standardized_alpha,
            n_items: k,
        },
        item_statistics,
        inter_item_correlations: correlations,
        item_total_statistics,
        scale: ScaleStatistics {
            mean: sum(&totals) / n as f64,
            variance: scale_variance,
            std_dev: scale_variance.sqrt(),
            n_items: k,
        },
    }))
}

/// R² of item `i` regressed on the other items (standardized)
///
/// `r_io · R_oo⁻¹ · r_oi`; when `R_oo` is singular the largest squared
/// single correlation stands in.
fn squared_multiple_correlation(cm: &CorrelationMatrix, i: usize) -> Result<f64, StatsError> {
    let others: Vec<usize> = (0..cm.len()).filter(|&j| j != i).collect();
    let r_io: Vec<f64> = others.iter().map(|&j| cm.values[(i, j)]).collect();

    match cm.values.submatrix(&others, &others)?.inverse() {
        Ok(inv) => {
            let beta = inv.mat_vec(&r_io)?;
            Ok(r_io.iter().zip(&beta).map(|(r, b)| r * b).sum())
        }
        Err(e) if e.is(codes::SINGULAR_MATRIX) => {
            debug!(item = %cm.variables[i], "singular predictor correlations; using max squared correlation");
            Ok(r_io.iter().map(|r| r * r).fold(0.0, f64::max))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use likert_core::Cell;

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn identical_items() -> DataTable {
        let col: Vec<f64> = (0..10).map(|i| (i % 5 + 1) as f64).collect();
        DataTable::from_columns(&[
            ("q1", col.clone()),
            ("q2", col.clone()),
            ("q3", col.clone()),
            ("q4", col),
        ])
    }

    fn three_items() -> DataTable {
        DataTable::from_columns(&[
            ("a", vec![1.0, 2.0, 3.0, 4.0]),
            ("b", vec![2.0, 2.0, 3.0, 3.0]),
            ("c", vec![1.0, 3.0, 2.0, 4.0]),
        ])
    }

    #[test]
    fn test_identical_items_alpha_one() {
        let result = cronbach_alpha(&identical_items(), &vars(&["q1", "q2", "q3", "q4"]))
            .unwrap()
            .unwrap();
        assert!((result.alpha - 1.0).abs() < 0.01);
        for r in result.item_total_correlations.values() {
            assert!((r - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_known_alpha() {
        // item variances 1.25 + 0.25 + 1.25, total variance 6.25
        let result = cronbach_alpha(&three_items(), &vars(&["a", "b", "c"])).unwrap().unwrap();
        assert!((result.alpha - 0.84).abs() < 1e-12);
    }

    #[test]
    fn test_alpha_order_independent() {
        let t = three_items();
        let a = cronbach_alpha(&t, &vars(&["a", "b", "c"])).unwrap().unwrap();
        let b = cronbach_alpha(&t, &vars(&["c", "a", "b"])).unwrap().unwrap();
        assert!((a.alpha - b.alpha).abs() < 1e-12);
        assert_eq!(a.item_total_correlations, b.item_total_correlations);
    }

    #[test]
    fn test_alpha_if_deleted() {
        let result = cronbach_alpha(&three_items(), &vars(&["a", "b", "c"])).unwrap().unwrap();
        // dropping b leaves a and c: variances 1.25 + 1.25, sum variance 4.5
        let expected = 2.0 * (1.0 - 2.5 / 4.5);
        assert!((result.alpha_if_item_deleted["b"].unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_two_items_no_alpha_if_deleted() {
        let result = cronbach_alpha(&three_items(), &vars(&["a", "c"])).unwrap().unwrap();
        assert!(result.alpha_if_item_deleted.values().all(Option::is_none));
    }

    #[test]
    fn test_too_few_variables_is_none() {
        assert!(cronbach_alpha(&three_items(), &vars(&["a"])).unwrap().is_none());
    }

    #[test]
    fn test_no_valid_cases_is_none() {
        let t = DataTable::from_columns(&[
            ("a", vec![Cell::from("x"), Cell::Null]),
            ("b", vec![Cell::from(1.0), Cell::from(2.0)]),
        ]);
        assert!(cronbach_alpha(&t, &vars(&["a", "b"])).unwrap().is_none());
    }

    #[test]
    fn test_constant_total_is_zero_variance() {
        let t = DataTable::from_columns(&[("a", vec![3.0, 3.0, 3.0]), ("b", vec![1.0, 1.0, 1.0])]);
        let err = cronbach_alpha(&t, &vars(&["a", "b"])).unwrap_err();
        assert_eq!(err.code, codes::ZERO_VARIANCE);
    }

    #[test]
    fn test_full_reliability_bundle() {
        let t = DataTable::from_columns(&[
            ("a", vec![Cell::from(1.0), Cell::from(2.0), Cell::from(3.0), Cell::from(4.0), Cell::Null]),
            ("b", vec![Cell::from(2.0), Cell::from(2.0), Cell::from(3.0), Cell::from(3.0), Cell::from(1.0)]),
            ("c", vec![Cell::from(1.0), Cell::from(3.0), Cell::from(2.0), Cell::from(4.0), Cell::from(5.0)]),
        ]);
        let report = full_reliability(&t, &vars(&["a", "b", "c"])).unwrap().unwrap();

        assert_eq!(report.case_processing, CaseProcessing { valid: 4, excluded: 1, total: 5 });
        assert!((report.reliability.cronbach_alpha - 0.84).abs() < 1e-12);
        assert_eq!(report.reliability.n_items, 3);
        assert_eq!(report.item_statistics[0].mean, 2.5);
        assert_eq!(report.item_statistics[0].n, 4);
        assert_eq!(report.scale.mean, 7.5);
        assert!((report.scale.variance - 6.25).abs() < 1e-12);
        assert_eq!(report.item_total_statistics[1].scale_mean_if_deleted, 5.0);
        assert_eq!(report.inter_item_correlations.len(), 3);
    }

    #[test]
    fn test_smc_two_items_is_r_squared() {
        let t = three_items();
        let report = full_reliability(&t, &vars(&["a", "c"])).unwrap().unwrap();
        let r = report.inter_item_correlations.get("a", "c").unwrap();
        for item in &report.item_total_statistics {
            assert!((item.squared_multiple_correlation - r * r).abs() < 1e-12);
        }
    }

    #[test]
    fn test_smc_singular_falls_back() {
        let report = full_reliability(&identical_items(), &vars(&["q1", "q2", "q3", "q4"]))
            .unwrap()
            .unwrap();
        for item in &report.item_total_statistics {
            assert!((item.squared_multiple_correlation - 1.0).abs() < 1e-12);
        }
        assert!((report.reliability.standardized_alpha - 1.0).abs() < 1e-12);
    }
}
