//! Standard normal CDF

/// Φ(x) by the Zelen & Severo rational approximation (|error| < 7.5e-8)
pub fn normal_cdf(x: f64) -> f64 {
    const P: f64 = 0.2316419;
    const B: [f64; 5] = [0.3193815, -0.3565638, 1.781478, -1.821256, 1.330274];

    let t = 1.0 / (1.0 + P * x.abs());
    let d = 0.3989423 * (-x * x / 2.0).exp();
    let poly = t * (B[0] + t * (B[1] + t * (B[2] + t * (B[3] + t * B[4]))));
    let tail = d * poly;

    if x > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Two-sided p-value of a z statistic
pub fn two_sided_p(z: f64) -> f64 {
    2.0 * (1.0 - normal_cdf(z.abs()))
}
