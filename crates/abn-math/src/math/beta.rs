//! Beta distribution utilities for conversion-rate posteriors.
//!
//! `BetaParams` carries the two shape parameters of a Beta posterior and
//! exposes the conjugate Binomial update, moments, the CDF (regularized
//! incomplete beta via a continued fraction, Numerical Recipes §6.4) and a
//! bisection quantile used for credible intervals.

use serde::{Deserialize, Serialize};

use super::stable::log_beta;

const BETACF_MAX_ITERS: usize = 300;
const BETACF_EPS: f64 = 1.0e-13;
const BETACF_FPMIN: f64 = 1.0e-300;
const QUANTILE_MAX_ITERS: usize = 200;
const QUANTILE_TOL: f64 = 1.0e-12;

/// Shape parameters of a Beta(alpha, beta) distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaParams {
    /// Prior pseudo-successes plus observed successes.
    pub alpha: f64,
    /// Prior pseudo-failures plus observed failures.
    pub beta: f64,
}

impl BetaParams {
    /// Returns None if either parameter is non-positive, infinite or NaN.
    pub fn new(alpha: f64, beta: f64) -> Option<Self> {
        if !alpha.is_finite() || !beta.is_finite() || alpha <= 0.0 || beta <= 0.0 {
            return None;
        }
        Some(Self { alpha, beta })
    }

    /// Beta(1, 1), the uniform prior.
    pub fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    /// Conjugate update after `successes` conversions out of `trials`.
    ///
    /// Returns None when `successes > trials`.
    pub fn observe(&self, successes: u64, trials: u64) -> Option<Self> {
        if successes > trials {
            return None;
        }
        Self::new(
            self.alpha + successes as f64,
            self.beta + (trials - successes) as f64,
        )
    }

    /// E[p] = alpha / (alpha + beta).
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// Var[p] = alpha*beta / ((alpha+beta)^2 (alpha+beta+1)).
    pub fn variance(&self) -> f64 {
        let sum = self.alpha + self.beta;
        (self.alpha * self.beta) / (sum * sum * (sum + 1.0))
    }

    /// P(X <= x).
    pub fn cdf(&self, x: f64) -> f64 {
        beta_cdf(x, self.alpha, self.beta)
    }

    /// Inverse CDF.
    pub fn quantile(&self, p: f64) -> f64 {
        beta_inv_cdf(p, self.alpha, self.beta)
    }

    /// Equal-tailed interval holding `mass` of the distribution.
    ///
    /// Returns None when `mass` is not strictly inside (0, 1).
    pub fn credible_interval(&self, mass: f64) -> Option<(f64, f64)> {
        if mass.is_nan() || mass <= 0.0 || mass >= 1.0 {
            return None;
        }
        let tail = (1.0 - mass) / 2.0;
        Some((self.quantile(tail), self.quantile(1.0 - tail)))
    }
}

/// Regularized incomplete beta function I_x(alpha, beta).
pub fn beta_cdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let front = (alpha * x.ln() + beta * (-x).ln_1p() - log_beta(alpha, beta)).exp();
    // The continued fraction converges fastest below the mean-ish split point;
    // above it, use the symmetry I_x(a, b) = 1 - I_{1-x}(b, a).
    if x < (alpha + 1.0) / (alpha + beta + 2.0) {
        (front * betacf(alpha, beta, x) / alpha).clamp(0.0, 1.0)
    } else {
        (1.0 - front * betacf(beta, alpha, 1.0 - x) / beta).clamp(0.0, 1.0)
    }
}

/// Quantile of Beta(alpha, beta) by bisection on the CDF.
pub fn beta_inv_cdf(p: f64, alpha: f64, beta: f64) -> f64 {
    if p.is_nan() || alpha.is_nan() || beta.is_nan() || alpha <= 0.0 || beta <= 0.0 {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }

    let (mut low, mut high) = (0.0_f64, 1.0_f64);
    let mut mid = 0.5;
    for _ in 0..QUANTILE_MAX_ITERS {
        mid = 0.5 * (low + high);
        let cdf = beta_cdf(mid, alpha, beta);
        if cdf.is_nan() {
            return f64::NAN;
        }
        if (cdf - p).abs() < QUANTILE_TOL || high - low < f64::EPSILON {
            break;
        }
        if cdf < p {
            low = mid;
        } else {
            high = mid;
        }
    }
    mid
}

fn betacf(alpha: f64, beta: f64, x: f64) -> f64 {
    let qab = alpha + beta;
    let qap = alpha + 1.0;
    let qam = alpha - 1.0;
    let clamp_tiny = |v: f64| if v.abs() < BETACF_FPMIN { BETACF_FPMIN } else { v };

    let mut c = 1.0;
    let mut d = 1.0 / clamp_tiny(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=BETACF_MAX_ITERS {
        let m_f = m as f64;
        let m2 = 2.0 * m_f;

        // even step
        let aa = m_f * (beta - m_f) * x / ((qam + m2) * (alpha + m2));
        d = 1.0 / clamp_tiny(1.0 + aa * d);
        c = clamp_tiny(1.0 + aa / c);
        h *= d * c;

        // odd step
        let aa = -(alpha + m_f) * (qab + m_f) * x / ((alpha + m2) * (qap + m2));
        d = 1.0 / clamp_tiny(1.0 + aa * d);
        c = clamp_tiny(1.0 + aa / c);
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < BETACF_EPS {
            break;
        }
    }

    h
}
