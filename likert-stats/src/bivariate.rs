//! Pearson correlation and correlation matrices

use likert_core::{CaseMatrix, DataTable, StatsError};
use likert_matrix::Matrix;
use serde::Serialize;
use crate::helpers::{mean, variance};

/// Columns with variance below this are treated as constant
pub const ZERO_VARIANCE_EPSILON: f64 = 1e-10;

/// Minimum listwise-complete cases for a correlation matrix
pub const MIN_CORRELATION_CASES: usize = 3;

/// Pearson r with pairwise filtering of non-finite entries
///
/// The numerator runs over the filtered pairs, but both means and the
/// denominator come from the unfiltered inputs, so a single non-finite
/// entry makes the result NaN. Returns 0 when no finite pair exists and
/// NaN when either input is constant.
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .map(|(&a, &b)| (a, b))
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .collect();

    if pairs.is_empty() {
        return 0.0;
    }

    let (mx, my) = match (mean(x), mean(y)) {
        (Ok(a), Ok(b)) => (a, b),
        _ => return 0.0,
    };

    let numerator: f64 = pairs.iter().map(|(a, b)| (a - mx) * (b - my)).sum();
    let sxx: f64 = x.iter().map(|a| (a - mx).powi(2)).sum();
    let syy: f64 = y.iter().map(|b| (b - my).powi(2)).sum();

    numerator / (sxx * syy).sqrt()
}

/// Two-variable correlation over raw (row-aligned) columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub x: String,
    pub y: String,
    /// May be NaN: see [`correlation`]
    pub r: f64,
    /// Rows where both cells are numeric
    pub n: usize,
}

pub fn correlate(table: &DataTable, a: &str, b: &str) -> Result<CorrelationResult, StatsError> {
    table.require_columns(&[a.to_string(), b.to_string()])?;
    let x = table.raw_column(a);
    let y = table.raw_column(b);
    let n = x.iter().zip(&y).filter(|(p, q)| p.is_finite() && q.is_finite()).count();

    Ok(CorrelationResult {
        x: a.to_string(),
        y: b.to_string(),
        r: correlation(&x, &y),
        n,
    })
}

/// Symmetric variable × variable correlation grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub variables: Vec<String>,
    pub values: Matrix,
    /// Cases the grid was computed from
    pub n: usize,
}

impl CorrelationMatrix {
    /// Grid over listwise-complete cases
    ///
    /// Fails with `INSUFFICIENT_DATA` below three cases and with
    /// `ZERO_VARIANCE` for a constant column.
    pub fn from_cases(cases: &CaseMatrix) -> Result<Self, StatsError> {
        let n = cases.n();
        if n < MIN_CORRELATION_CASES {
            return Err(StatsError::insufficient_data(MIN_CORRELATION_CASES, n));
        }

        let columns = cases.columns();
        for (name, col) in cases.variables.iter().zip(&columns) {
            if variance(col)? < ZERO_VARIANCE_EPSILON {
                return Err(StatsError::zero_variance(name));
            }
        }

        let p = cases.p();
        let mut values = Matrix::identity(p);
        for i in 0..p {
            for j in (i + 1)..p {
                let r = correlation(&columns[i], &columns[j]);
                values[(i, j)] = r;
                values[(j, i)] = r;
            }
        }

        Ok(Self {
            variables: cases.variables.clone(),
            values,
            n,
        })
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// r between two named variables
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.variables.iter().position(|v| v == a)?;
        let j = self.variables.iter().position(|v| v == b)?;
        self.values.get(i, j)
    }

    /// Mean of the off-diagonal entries
    pub fn mean_off_diagonal(&self) -> f64 {
        let p = self.len();
        if p < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        for i in 0..p {
            for j in (i + 1)..p {
                total += self.values[(i, j)];
            }
        }
        total / (p * (p - 1) / 2) as f64
    }
}

/// Correlation matrix of `variables` after listwise deletion
pub fn correlation_matrix(table: &DataTable, variables: &[String]) -> Result<CorrelationMatrix, StatsError> {
    let cases = table.cases(variables)?;
    CorrelationMatrix::from_cases(&cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use likert_core::{codes, Cell};

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_self_correlation() {
        let x = [1.0, 3.0, 2.0, 5.0, 4.0];
        assert!((correlation(&x, &x) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetry() {
        let x = [1.0, 2.0, 4.0, 3.0, 5.0];
        let y = [2.0, 1.0, 5.0, 5.0, 4.0];
        assert_eq!(correlation(&x, &y), correlation(&y, &x));
    }

    #[test]
    fn test_no_valid_pairs_is_zero() {
        let x = [f64::NAN, 1.0];
        let y = [2.0, f64::NAN];
        assert_eq!(correlation(&x, &y), 0.0);
        assert_eq!(correlation(&[], &[]), 0.0);
    }

    #[test]
    fn test_non_finite_entry_poisons_result() {
        // means and denominator use the unfiltered arrays
        let x = [1.0, 2.0, 3.0, f64::NAN];
        let y = [1.0, 2.0, 3.0, 4.0];
        assert!(correlation(&x, &y).is_nan());
    }

    #[test]
    fn test_constant_is_nan() {
        assert!(correlation(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]).is_nan());
    }

    #[test]
    fn test_correlate_columns() {
        let table = DataTable::from_columns(&[
            ("a", vec![1.0, 2.0, 3.0, 4.0]),
            ("b", vec![4.0, 3.0, 2.0, 1.0]),
        ]);
        let result = correlate(&table, "a", "b").unwrap();
        assert!((result.r + 1.0).abs() < 1e-12);
        assert_eq!(result.n, 4);
    }

    #[test]
    fn test_matrix_diagonal_and_symmetry() {
        let table = DataTable::from_columns(&[
            ("a", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("b", vec![2.0, 1.0, 4.0, 3.0, 5.0]),
            ("c", vec![5.0, 3.0, 4.0, 1.0, 2.0]),
        ]);
        let cm = correlation_matrix(&table, &vars(&["a", "b", "c"])).unwrap();
        assert_eq!(cm.len(), 3);
        assert!(cm.values.is_symmetric(0.0));
        for i in 0..3 {
            assert_eq!(cm.values[(i, i)], 1.0);
        }
        assert!((cm.get("a", "b").unwrap() - 0.8).abs() < 1e-12);
        assert_eq!(cm.get("a", "z"), None);
    }

    #[test]
    fn test_matrix_listwise_deletion() {
        let table = DataTable::from_columns(&[
            ("a", vec![Cell::from(1.0), Cell::from(2.0), Cell::from(3.0), Cell::from(4.0)]),
            ("b", vec![Cell::from(1.0), Cell::Null, Cell::from(2.0), Cell::from(5.0)]),
        ]);
        let cm = correlation_matrix(&table, &vars(&["a", "b"])).unwrap();
        assert_eq!(cm.n, 3);
    }

    #[test]
    fn test_matrix_insufficient_cases() {
        let table = DataTable::from_columns(&[("a", vec![1.0, 2.0]), ("b", vec![2.0, 1.0])]);
        let err = correlation_matrix(&table, &vars(&["a", "b"])).unwrap_err();
        assert_eq!(err.code, codes::INSUFFICIENT_DATA);
    }

    #[test]
    fn test_matrix_constant_column() {
        let table = DataTable::from_columns(&[
            ("a", vec![1.0, 2.0, 3.0]),
            ("b", vec![3.0, 3.0, 3.0]),
        ]);
        let err = correlation_matrix(&table, &vars(&["a", "b"])).unwrap_err();
        assert_eq!(err.code, codes::ZERO_VARIANCE);
        assert_eq!(err.context.unwrap().variable, Some("b".to_string()));
    }
}
