//! Principal component factor analysis
//!
//! Pipeline: listwise cases → correlation matrix → KMO and Bartlett →
//! power-iteration eigenpairs → Kaiser extraction (eigenvalue > 1) →
//! communalities and variance table → optional varimax.

use std::collections::BTreeMap;
use likert_core::{DataTable, StatsError};
use likert_matrix::{varimax, Matrix, Rotation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::bivariate::CorrelationMatrix;
use crate::distributions::chi_square_cdf;

/// Denominators below this make a partial correlation unusable
const PARTIAL_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorOptions {
    /// Varimax-rotate when two or more components are extracted
    pub rotate: bool,
    /// Require `n >= ratio · p` cases; 0 disables the gate
    pub min_cases_per_variable: usize,
}

impl Default for FactorOptions {
    fn default() -> Self {
        Self {
            rotate: true,
            min_cases_per_variable: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kmo {
    /// Clipped to [0, 1]
    pub overall: f64,
    /// Per-variable measure of sampling adequacy
    pub individual: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bartlett {
    pub chi_square: f64,
    pub degrees_of_freedom: usize,
    pub significance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Communality {
    pub variable: String,
    pub initial: f64,
    pub extraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VarianceShare {
    pub total: f64,
    pub percent_of_variance: f64,
    pub cumulative_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentVariance {
    /// 1-based component number
    pub component: usize,
    pub initial: VarianceShare,
    /// Present for extracted components only
    pub extraction: Option<VarianceShare>,
    /// Present for rotated components only
    pub rotation: Option<VarianceShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorAnalysis {
    pub variables: Vec<String>,
    pub n: usize,
    pub kmo: Kmo,
    pub bartlett: Bartlett,
    /// All eigenvalues, descending
    pub eigenvalues: Vec<f64>,
    pub n_components: usize,
    pub communalities: Vec<Communality>,
    pub total_variance: Vec<ComponentVariance>,
    /// Loadings, variables × extracted components
    pub component_matrix: Matrix,
    pub rotated: Option<Rotation>,
    pub correlation_matrix: CorrelationMatrix,
}

pub fn factor_analysis(
    table: &DataTable,
    variables: &[String],
    options: &FactorOptions,
) -> Result<FactorAnalysis, StatsError> {
    let p = variables.len();
    if p < 2 {
        return Err(StatsError::variable_count("factor", "at least 2", p));
    }

    let cases = table.cases(variables)?;
    let n = cases.n();
    if n == 0 {
        return Err(StatsError::insufficient_data(1, 0));
    }
    let required = options.min_cases_per_variable * p;
    if n < required {
        return Err(StatsError::insufficient_data(required, n)
            .with_note(format!("{} cases per variable for {} variables", options.min_cases_per_variable, p)));
    }

    let correlations = CorrelationMatrix::from_cases(&cases)?;
    let r = &correlations.values;

    let kmo = kmo(&correlations);
    let bartlett = bartlett(r, n)?;

    let eigen = r.eigen_power(p)?;
    // eigenvalues are descending, so the first `extracted` exceed 1
    let extracted = eigen.values.iter().filter(|&&l| l > 1.0).count();
    let m = extracted.max(1);
    debug!(variables = p, cases = n, components = m, "factor extraction");

    let mut loadings = Matrix::zeros(p, m);
    for c in 0..m {
        let scale = eigen.values[c].max(0.0).sqrt();
        for i in 0..p {
            loadings[(i, c)] = eigen.vectors[c][i] * scale;
        }
    }

    let communalities = variables
        .iter()
        .enumerate()
        .map(|(i, v)| Communality {
            variable: v.clone(),
            initial: 1.0,
            extraction: loadings.row(i).iter().map(|l| l * l).sum(),
        })
        .collect();

    let rotated = if options.rotate && m >= 2 {
        Some(varimax(&loadings)?)
    } else {
        None
    };

    let initial = shares(&eigen.values, p);
    let extraction = shares(&eigen.values[..extracted], p);
    let rotation = rotated.as_ref().map(|rot| {
        let sums: Vec<f64> = (0..m)
            .map(|c| rot.loadings.col(c).iter().map(|l| l * l).sum())
            .collect();
        shares(&sums, p)
    });

    let total_variance = initial
        .into_iter()
        .enumerate()
        .map(|(c, init)| ComponentVariance {
            component: c + 1,
            initial: init,
            extraction: extraction.get(c).copied(),
            rotation: rotation.as_ref().and_then(|r| r.get(c).copied()),
        })
        .collect();

    Ok(FactorAnalysis {
        variables: variables.to_vec(),
        n,
        kmo,
        bartlett,
        eigenvalues: eigen.values,
        n_components: m,
        communalities,
        total_variance,
        component_matrix: loadings,
        rotated,
        correlation_matrix: correlations,
    })
}

/// Running percent-of-variance table for `p` standardized variables
fn shares(totals: &[f64], p: usize) -> Vec<VarianceShare> {
    let mut cumulative = 0.0;
    totals
        .iter()
        .map(|&total| {
            let percent = total / p as f64 * 100.0;
            cumulative += percent;
            VarianceShare {
                total,
                percent_of_variance: percent,
                cumulative_percent: cumulative,
            }
        })
        .collect()
}

/// Partial correlation of i and j: mean of first-order partials over controls
///
/// Falls back to r_ij when no control variable is usable.
fn partial_proxy(r: &Matrix, i: usize, j: usize) -> f64 {
    let rij = r[(i, j)];
    let partials: Vec<f64> = (0..r.rows())
        .filter(|&k| k != i && k != j)
        .filter_map(|k| {
            let (rik, rjk) = (r[(i, k)], r[(j, k)]);
            let denom = ((1.0 - rik * rik) * (1.0 - rjk * rjk)).sqrt();
            (denom > PARTIAL_EPSILON).then(|| (rij - rik * rjk) / denom)
        })
        .collect();

    if partials.is_empty() {
        rij
    } else {
        partials.iter().sum::<f64>() / partials.len() as f64
    }
}

/// Kaiser-Meyer-Olkin sampling adequacy
pub fn kmo(cm: &CorrelationMatrix) -> Kmo {
    let r = &cm.values;
    let p = cm.len();
    let ratio = |sum_r: f64, sum_q: f64| {
        let denom = sum_r + sum_q;
        if denom > 0.0 {
            (sum_r / denom).clamp(0.0, 1.0)
        } else {
            0.0
        }
    };

    let mut total_r = 0.0;
    let mut total_q = 0.0;
    let mut individual = BTreeMap::new();

    for i in 0..p {
        let (mut sum_r, mut sum_q) = (0.0, 0.0);
        for j in (0..p).filter(|&j| j != i) {
            let rij = r[(i, j)];
            let qij = partial_proxy(r, i, j);
            sum_r += rij * rij;
            sum_q += qij * qij;
        }
        individual.insert(cm.variables[i].clone(), ratio(sum_r, sum_q));
        total_r += sum_r;
        total_q += sum_q;
    }

    Kmo {
        overall: ratio(total_r, total_q),
        individual,
    }
}

/// Bartlett's test of sphericity
pub fn bartlett(r: &Matrix, n: usize) -> Result<Bartlett, StatsError> {
    let p = r.rows();
    let det = r.determinant()?;
    if det <= 0.0 {
        return Err(StatsError::singular_matrix(format!(
            "correlation matrix determinant is {:e}",
            det
        ))
        .with_note("Bartlett's test needs ln(det R)"));
    }

    let chi_square = -((n as f64 - 1.0) - (2.0 * p as f64 + 5.0) / 6.0) * det.ln();
    let degrees_of_freedom = p * (p - 1) / 2;

    Ok(Bartlett {
        chi_square,
        degrees_of_freedom,
        significance: 1.0 - chi_square_cdf(chi_square, degrees_of_freedom as f64),
    })
}
