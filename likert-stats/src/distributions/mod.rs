//! Distribution functions backing p-values: normal, chi-squared, F

pub mod normal;
pub mod chi;
pub mod f;

pub use normal::normal_cdf;
pub use chi::{chi_square_cdf, gamma, ln_gamma, lower_incomplete_gamma};
pub use f::{f_cdf_approx, f_cdf_exact, regularized_incomplete_beta, FTail};
