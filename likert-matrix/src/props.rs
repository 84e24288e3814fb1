//! Matrix properties: determinant, norm, symmetry

use likert_core::StatsError;
use crate::types::Matrix;

impl Matrix {
    /// Determinant by cofactor expansion along the first row
    ///
    /// Cost grows factorially with size. Factor-analysis matrices have one
    /// axis per selected survey item, which keeps this usable in practice.
    pub fn determinant(&self) -> Result<f64, StatsError> {
        self.require_square("determinant")?;
        let n = self.rows();

        match n {
            0 => Ok(1.0),
            1 => Ok(self[(0, 0)]),
            2 => Ok(self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)]),
            _ => {
                let mut det = 0.0;
                for j in 0..n {
                    let a = self[(0, j)];
                    if a == 0.0 {
                        continue;
                    }
                    let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                    det += sign * a * self.minor(0, j)?.determinant()?;
                }
                Ok(det)
            }
        }
    }

    /// Frobenius norm: square root of the sum of squared elements
    pub fn frobenius_norm(&self) -> f64 {
        self.as_dmatrix().iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Symmetric within `eps`
    pub fn is_symmetric(&self, eps: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.rows() {
            for j in (i + 1)..self.cols() {
                if (self[(i, j)] - self[(j, i)]).abs() > eps {
                    return false;
                }
            }
        }
        true
    }
}
