//! Eigen-decomposition by power iteration with deflation
//!
//! This is an approximation, not a full eigensolver. Each eigenpair comes
//! from a fixed number of power iterations started at the unit vector `e_k`,
//! after which the pair is deflated out of the working matrix. Dominant,
//! well-separated eigenvalues converge well; near-degenerate or
//! ill-conditioned correlation matrices may give inaccurate trailing pairs.

use likert_core::StatsError;
use serde::Serialize;
use tracing::debug;
use crate::types::Matrix;

/// Power iterations spent on each eigenpair
pub const POWER_ITERATIONS: usize = 100;

const ZERO_NORM: f64 = 1e-300;

/// Eigenvalues (descending) with matching unit eigenvectors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Eigen {
    pub values: Vec<f64>,
    /// `vectors[k]` belongs to `values[k]`
    pub vectors: Vec<Vec<f64>>,
}

impl Eigen {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Matrix {
    /// Extract the `k` dominant eigenpairs of a square matrix
    pub fn eigen_power(&self, k: usize) -> Result<Eigen, StatsError> {
        self.require_square("eigen decomposition")?;
        let n = self.rows();
        let k = k.min(n);

        let mut work = self.clone();
        let mut pairs: Vec<(f64, Vec<f64>)> = Vec::with_capacity(k);

        for component in 0..k {
            let mut v = vec![0.0; n];
            v[component] = 1.0;

            for _ in 0..POWER_ITERATIONS {
                let next = work.mat_vec(&v)?;
                let norm = next.iter().map(|x| x * x).sum::<f64>().sqrt();
                if norm < ZERO_NORM {
                    debug!(component, "power iteration reached a zero vector; keeping last estimate");
                    break;
                }
                v = next.into_iter().map(|x| x / norm).collect();
            }

            // Rayleigh quotient against the deflated matrix
            let av = work.mat_vec(&v)?;
            let lambda: f64 = v.iter().zip(&av).map(|(a, b)| a * b).sum();

            work = work.sub(&Matrix::outer(&v).scale(lambda))?;
            pairs.push((lambda, orient(v)));
        }

        pairs.sort_by(|a, b| b.0.total_cmp(&a.0));
        let (values, vectors) = pairs.into_iter().unzip();
        Ok(Eigen { values, vectors })
    }
}

/// Fix the arbitrary sign so the components sum to a non-negative value
fn orient(v: Vec<f64>) -> Vec<f64> {
    if v.iter().sum::<f64>() < 0.0 {
        v.into_iter().map(|x| -x).collect()
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use likert_core::codes;

    #[test]
    fn test_diagonal_matrix() {
        let a = Matrix::from_rows(&[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 5.0, 0.0],
            vec![0.0, 0.0, 3.0],
        ])
        .unwrap();
        let eig = a.eigen_power(3).unwrap();
        assert_eq!(eig.values, vec![5.0, 3.0, 1.0]);
        assert_eq!(eig.vectors[0], vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_two_by_two_correlation() {
        // eigenvalues 1 ± r, eigenvectors (1, ±1)/√2
        let a = Matrix::from_rows(&[vec![1.0, 0.6], vec![0.6, 1.0]]).unwrap();
        let eig = a.eigen_power(2).unwrap();
        assert!((eig.values[0] - 1.6).abs() < 1e-9);
        assert!((eig.values[1] - 0.4).abs() < 1e-9);
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((eig.vectors[0][0] - h).abs() < 1e-9);
        assert!((eig.vectors[0][1] - h).abs() < 1e-9);
    }

    #[test]
    fn test_matches_symmetric_eigen() {
        let a = Matrix::from_rows(&[
            vec![1.0, 0.7, 0.5],
            vec![0.7, 1.0, 0.4],
            vec![0.5, 0.4, 1.0],
        ])
        .unwrap();
        let eig = a.eigen_power(3).unwrap();

        let mut expected: Vec<f64> = a.as_dmatrix().clone().symmetric_eigen().eigenvalues.iter().copied().collect();
        expected.sort_by(|x, y| y.total_cmp(x));

        assert!((eig.values[0] - expected[0]).abs() < 1e-6);
        let total: f64 = eig.values.iter().sum();
        assert!((total - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_vectors_unit_length() {
        let a = Matrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 2.0]]).unwrap();
        let eig = a.eigen_power(2).unwrap();
        for v in &eig.vectors {
            let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_requested_count_capped() {
        let eig = Matrix::identity(2).eigen_power(5).unwrap();
        assert_eq!(eig.len(), 2);
    }

    #[test]
    fn test_non_square() {
        let err = Matrix::zeros(2, 3).eigen_power(1).unwrap_err();
        assert_eq!(err.code, codes::SHAPE_ERROR);
    }
}
