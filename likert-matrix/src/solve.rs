//! Matrix inverse by Gauss-Jordan elimination

use likert_core::StatsError;
use crate::types::Matrix;

/// Pivots with smaller magnitude mark the matrix as singular
pub const PIVOT_EPSILON: f64 = 1e-10;

impl Matrix {
    /// Inverse via Gauss-Jordan on `[A | I]` with partial pivoting
    pub fn inverse(&self) -> Result<Matrix, StatsError> {
        self.require_square("inverse")?;
        let n = self.rows();

        // Augmented [A | I]
        let mut aug = vec![vec![0.0; 2 * n]; n];
        for i in 0..n {
            for j in 0..n {
                aug[i][j] = self[(i, j)];
            }
            aug[i][n + i] = 1.0;
        }

        for col in 0..n {
            let pivot_row = (col..n)
                .max_by(|&a, &b| aug[a][col].abs().total_cmp(&aug[b][col].abs()))
                .unwrap_or(col);
            aug.swap(col, pivot_row);

            let pivot = aug[col][col];
            if pivot.abs() < PIVOT_EPSILON {
                return Err(StatsError::singular_matrix(format!(
                    "pivot {:.3e} in column {} is below {:e}",
                    pivot, col, PIVOT_EPSILON
                )));
            }

            for v in aug[col].iter_mut() {
                *v /= pivot;
            }

            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = aug[row][col];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..2 * n {
                    aug[row][j] -= factor * aug[col][j];
                }
            }
        }

        let right: Vec<Vec<f64>> = aug.into_iter().map(|row| row[n..].to_vec()).collect();
        Matrix::from_rows(&right)
    }
}
