//! F distribution CDF: logistic surrogate and exact incomplete-beta form

use std::str::FromStr;
use likert_core::StatsError;
use serde::{Deserialize, Serialize};
use super::chi::ln_gamma;

/// Which F CDF backs ANOVA and regression p-values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FTail {
    /// Logistic-curve surrogate; monotone but not a true F CDF
    #[default]
    Approximate,
    /// Regularized incomplete beta
    Exact,
}

impl FTail {
    pub fn cdf(self, x: f64, d1: f64, d2: f64) -> f64 {
        match self {
            FTail::Approximate => f_cdf_approx(x, d1, d2),
            FTail::Exact => f_cdf_exact(x, d1, d2),
        }
    }

    /// Upper-tail probability, 1 − CDF
    pub fn p_value(self, x: f64, d1: f64, d2: f64) -> f64 {
        1.0 - self.cdf(x, d1, d2)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FTail::Approximate => "approximate",
            FTail::Exact => "exact",
        }
    }
}

impl FromStr for FTail {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approximate" | "approx" => Ok(FTail::Approximate),
            "exact" => Ok(FTail::Exact),
            other => Err(StatsError::validation(format!("unknown F tail '{}'", other))
                .with_suggestion("Use 'approximate' or 'exact'")),
        }
    }
}

/// Logistic surrogate centred on (d1 + d2) / 2
pub fn f_cdf_approx(x: f64, d1: f64, d2: f64) -> f64 {
    1.0 / (1.0 + (-(x - (d1 + d2) / 2.0) / (d1 * d2).sqrt()).exp())
}

/// F CDF = I_z(d1/2, d2/2) with z = d1·x / (d1·x + d2)
pub fn f_cdf_exact(x: f64, d1: f64, d2: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x.is_infinite() {
        return 1.0;
    }
    let z = d1 * x / (d1 * x + d2);
    regularized_incomplete_beta(d1 / 2.0, d2 / 2.0, z)
}

/// Regularized incomplete beta I_x(a, b)
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let front = (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln()).exp();

    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const FPMIN: f64 = 1e-300;
    const MAX_ITERATIONS: usize = 200;
    const EPSILON: f64 = 1e-14;

    let clamp = |v: f64| if v.abs() < FPMIN { FPMIN } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 / clamp(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / clamp(1.0 + aa * d);
        c = clamp(1.0 + aa / c);
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / clamp(1.0 + aa * d);
        c = clamp(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }

    h
}
