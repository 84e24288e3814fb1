//! Likert Matrix - Dense linear algebra for survey analyses
//!
//! Small, square, symmetric matrices dominate here (correlation matrices
//! with one axis per survey item), so the kernel favours plain algorithms:
//! - Construction and access (zeros, identity, from_rows, submatrix, minor)
//! - Basic operations (transpose, matmul, mat_vec, sub, scale, outer)
//! - Properties (determinant, frobenius_norm, is_symmetric)
//! - Inverse (Gauss-Jordan with partial pivoting)
//! - Eigenpairs (power iteration with deflation)
//! - Varimax rotation (Kaiser normalization)
//!
//! Storage is an f64 nalgebra `DMatrix`.

mod types;
mod ops;
mod props;
mod solve;
mod decompose;
mod rotate;

pub use types::Matrix;
pub use solve::PIVOT_EPSILON;
pub use decompose::{Eigen, POWER_ITERATIONS};
pub use rotate::{varimax, Rotation, VARIMAX_MAX_ITERATIONS, VARIMAX_TOLERANCE};
