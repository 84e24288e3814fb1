//! In-memory survey data and listwise case extraction
//!
//! Rows map variable names to raw cells. Analyses never read cells directly;
//! they ask the table for a numeric view of the variables they need.

use crate::{Cell, StatsError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One case (respondent): variable name → raw cell
pub type Row = HashMap<String, Cell>;

/// Rectangular survey data (rows = cases, columns = variables)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataTable {
    pub rows: Vec<Row>,
}

/// Listwise-deleted numeric view over a set of variables
#[derive(Debug, Clone, PartialEq)]
pub struct CaseMatrix {
    /// Variables in matrix column order
    pub variables: Vec<String>,
    /// Valid cases, each holding one value per variable
    pub rows: Vec<Vec<f64>>,
    /// Cases dropped because some selected cell was not numeric
    pub excluded: usize,
}

impl DataTable {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a table from `(column, values)` pairs of equal length
    pub fn from_columns<C: Into<Cell> + Clone>(columns: &[(&str, Vec<C>)]) -> Self {
        let len = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let rows = (0..len)
            .map(|i| {
                columns
                    .iter()
                    .map(|(name, values)| {
                        let cell = values.get(i).cloned().map(Into::into).unwrap_or(Cell::Null);
                        (name.to_string(), cell)
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All column names seen in any row, sorted
    pub fn columns(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self.rows.iter().flat_map(|r| r.keys()).collect();
        names.into_iter().cloned().collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.rows.iter().any(|r| r.contains_key(name))
    }

    /// Fail with `UNKNOWN_VARIABLE` for the first name no row carries
    pub fn require_columns(&self, variables: &[String]) -> Result<(), StatsError> {
        if self.rows.is_empty() {
            return Ok(());
        }
        match variables.iter().find(|v| !self.has_column(v)) {
            Some(missing) => Err(StatsError::unknown_variable(missing)),
            None => Ok(()),
        }
    }

    /// Numeric values of one column, invalid cells dropped
    pub fn numeric_column(&self, variable: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|r| r.get(variable).and_then(Cell::to_f64))
            .collect()
    }

    /// Numeric values of one column aligned with rows, invalid cells as NaN
    pub fn raw_column(&self, variable: &str) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| r.get(variable).and_then(Cell::to_f64).unwrap_or(f64::NAN))
            .collect()
    }

    /// Listwise deletion: keep rows where every selected cell is numeric
    pub fn cases(&self, variables: &[String]) -> Result<CaseMatrix, StatsError> {
        self.require_columns(variables)?;

        let mut rows = Vec::with_capacity(self.rows.len());
        let mut excluded = 0;

        for row in &self.rows {
            let values: Option<Vec<f64>> = variables
                .iter()
                .map(|v| row.get(v).and_then(Cell::to_f64))
                .collect();
            match values {
                Some(v) => rows.push(v),
                None => excluded += 1,
            }
        }

        Ok(CaseMatrix {
            variables: variables.to_vec(),
            rows,
            excluded,
        })
    }

    /// Split `value_var` into groups keyed by the text of `group_var`
    ///
    /// Rows with a missing group label or a non-numeric value are skipped.
    pub fn split_by(&self, value_var: &str, group_var: &str) -> Result<BTreeMap<String, Vec<f64>>, StatsError> {
        self.require_columns(&[value_var.to_string(), group_var.to_string()])?;

        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for row in &self.rows {
            let label = match row.get(group_var) {
                Some(Cell::Text(s)) if !s.trim().is_empty() => s.trim().to_string(),
                Some(Cell::Number(n)) if n.is_finite() => n.to_string(),
                _ => continue,
            };
            if let Some(v) = row.get(value_var).and_then(Cell::to_f64) {
                groups.entry(label).or_default().push(v);
            }
        }
        Ok(groups)
    }
}

impl CaseMatrix {
    /// Number of valid cases
    pub fn n(&self) -> usize {
        self.rows.len()
    }

    /// Number of variables
    pub fn p(&self) -> usize {
        self.variables.len()
    }

    pub fn total(&self) -> usize {
        self.rows.len() + self.excluded
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of the j-th variable across valid cases
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[j]).collect()
    }

    pub fn columns(&self) -> Vec<Vec<f64>> {
        (0..self.p()).map(|j| self.column(j)).collect()
    }

    /// Per-case sum over all variables
    pub fn row_sums(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.iter().sum()).collect()
    }

    /// Keep only the given variable indices, in that order
    pub fn select(&self, indices: &[usize]) -> CaseMatrix {
        CaseMatrix {
            variables: indices.iter().map(|&j| self.variables[j].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| indices.iter().map(|&j| r[j]).collect())
                .collect(),
            excluded: self.excluded,
        }
    }

    /// Same cases without variable `skip`
    pub fn without(&self, skip: usize) -> CaseMatrix {
        let keep: Vec<usize> = (0..self.p()).filter(|&j| j != skip).collect();
        self.select(&keep)
    }
}
