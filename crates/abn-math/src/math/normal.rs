//! Standard normal CDF and two-sided z-test tails.
//!
//! Both are expressed through the regularized incomplete gamma function:
//! `erfc(x) = Q(1/2, x^2)` for `x >= 0`, so `2 * (1 - Phi(|z|)) = Q(1/2, z^2 / 2)`.

use super::gamma::gamma_q;

/// Phi(z), the standard normal CDF.
pub fn std_normal_cdf(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    let upper_tail = 0.5 * gamma_q(0.5, 0.5 * z * z);
    if z >= 0.0 {
        1.0 - upper_tail
    } else {
        upper_tail
    }
}

/// Two-sided p-value `2 * (1 - Phi(|z|))` for a z statistic.
///
/// `z == 0` maps to exactly 1.0; infinite `z` maps to 0.0.
pub fn two_sided_p_value(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    gamma_q(0.5, 0.5 * z * z)
}
