//! Varimax rotation of a loading matrix (Kaiser's pairwise method)
//!
//! Columns are rotated two at a time in their common plane by the angle
//! that maximizes the variance of squared loadings. Rows are Kaiser
//! normalized (divided by the square root of their communality) before
//! rotating and scaled back afterwards.

use likert_core::StatsError;
use serde::Serialize;
use tracing::debug;
use crate::types::Matrix;

pub const VARIMAX_MAX_ITERATIONS: usize = 100;
pub const VARIMAX_TOLERANCE: f64 = 1e-6;

/// Result of a varimax rotation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rotation {
    /// Rotated loadings (variables × components)
    pub loadings: Matrix,
    /// Orthogonal matrix T with `rotated = original · T`
    pub rotation: Matrix,
    pub iterations: usize,
    pub converged: bool,
}

/// Rotate `loadings` (variables × components) to the varimax criterion
pub fn varimax(loadings: &Matrix) -> Result<Rotation, StatsError> {
    let p = loadings.rows();
    let m = loadings.cols();

    if p == 0 || m < 2 {
        return Ok(Rotation {
            loadings: loadings.clone(),
            rotation: Matrix::identity(m),
            iterations: 0,
            converged: true,
        });
    }

    let h: Vec<f64> = (0..p)
        .map(|i| loadings.row(i).iter().map(|x| x * x).sum::<f64>().sqrt())
        .collect();

    let mut x = loadings.clone();
    for i in 0..p {
        if h[i] > 0.0 {
            for j in 0..m {
                x[(i, j)] /= h[i];
            }
        }
    }

    let mut t = Matrix::identity(m);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < VARIMAX_MAX_ITERATIONS {
        iterations += 1;
        let previous = t.clone();

        for a in 0..m - 1 {
            for b in a + 1..m {
                let phi = pair_angle(&x, a, b);
                if phi.abs() < f64::EPSILON {
                    continue;
                }
                rotate_columns(&mut x, a, b, phi);
                rotate_columns(&mut t, a, b, phi);
            }
        }

        if t.sub(&previous)?.frobenius_norm() < VARIMAX_TOLERANCE {
            converged = true;
            break;
        }
    }

    if !converged {
        debug!(iterations, "varimax stopped before convergence");
    }

    for i in 0..p {
        if h[i] > 0.0 {
            for j in 0..m {
                x[(i, j)] *= h[i];
            }
        }
    }

    Ok(Rotation {
        loadings: x,
        rotation: t,
        iterations,
        converged,
    })
}

/// Optimal planar rotation angle for columns `a` and `b`
fn pair_angle(x: &Matrix, a: usize, b: usize) -> f64 {
    let p = x.rows() as f64;
    let (mut sa, mut sb, mut sc, mut sd) = (0.0, 0.0, 0.0, 0.0);

    for i in 0..x.rows() {
        let (xa, xb) = (x[(i, a)], x[(i, b)]);
        let u = xa * xa - xb * xb;
        let v = 2.0 * xa * xb;
        sa += u;
        sb += v;
        sc += u * u - v * v;
        sd += 2.0 * u * v;
    }

    let num = sd - 2.0 * sa * sb / p;
    let den = sc - (sa * sa - sb * sb) / p;
    num.atan2(den) / 4.0
}

fn rotate_columns(x: &mut Matrix, a: usize, b: usize, phi: f64) {
    let (s, c) = phi.sin_cos();
    for i in 0..x.rows() {
        let (xa, xb) = (x[(i, a)], x[(i, b)]);
        x[(i, a)] = c * xa + s * xb;
        x[(i, b)] = -s * xa + c * xb;
    }
}
