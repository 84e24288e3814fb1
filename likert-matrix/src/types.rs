//! Core matrix type

use std::fmt;
use std::ops::{Index, IndexMut};
use likert_core::StatsError;
use nalgebra::DMatrix;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Dense f64 matrix with fixed row/column counts
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: DMatrix<f64>,
}

impl Matrix {
    /// rows × cols matrix of zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { data: DMatrix::zeros(rows, cols) }
    }

    /// n × n identity
    pub fn identity(n: usize) -> Self {
        Self { data: DMatrix::identity(n, n) }
    }

    /// Create from row-major nested data
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, StatsError> {
        if rows.is_empty() {
            return Err(StatsError::shape("matrix: empty data"));
        }

        let cols = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(StatsError::shape(format!(
                    "matrix: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
        }

        Ok(Self {
            data: DMatrix::from_fn(rows.len(), cols, |i, j| rows[i][j]),
        })
    }

    /// Create from nalgebra DMatrix
    pub fn from_dmatrix(data: DMatrix<f64>) -> Self {
        Self { data }
    }

    /// Borrow the underlying nalgebra storage
    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    /// Fail with `SHAPE_ERROR` unless the matrix is square
    pub fn require_square(&self, op: &str) -> Result<(), StatsError> {
        if self.is_square() {
            Ok(())
        } else {
            Err(StatsError::shape(format!(
                "{} requires a square matrix, got {}×{}",
                op,
                self.rows(),
                self.cols()
            )))
        }
    }

    /// Element at (row, col), `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    /// Overwrite element at (row, col); panics when out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[(row, col)] = value;
    }

    pub fn row(&self, i: usize) -> Vec<f64> {
        self.data.row(i).iter().copied().collect()
    }

    pub fn col(&self, j: usize) -> Vec<f64> {
        self.data.column(j).iter().copied().collect()
    }

    /// Row-major nested copy
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows()).map(|i| self.row(i)).collect()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, idx: (usize, usize)) -> &f64 {
        &self.data[idx]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut f64 {
        &mut self.data[idx]
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_rows())
    }
}

impl<'de> Deserialize<'de> for Matrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
        Self::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows() {
            let cells: Vec<String> = self.row(i).iter().map(|v| format!("{:.3}", v)).collect();
            writeln!(f, "[{}]", cells.join(", "))?;
        }
        Ok(())
    }
}
