//! Beta-Binomial posteriors and Monte Carlo probability of being best.
//!
//! Each group gets a conjugate posterior `Beta(alpha0 + k, beta0 + n - k)`.
//! `draws` samples are taken per group, group by group in discovery order,
//! from a single RNG stream; a seed therefore fixes the whole result.
//!
//! `prob_best[g]` is the fraction of draw positions at which group `g` holds
//! the maximum. Groups are scanned in discovery order and the running maximum
//! is replaced only on a strictly greater draw, so an exact tie credits the
//! earliest group and the probabilities sum to 1.

use abn_common::{Dataset, Error, GroupLabel, Result};
use abn_math::BetaParams;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Distribution};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::first_argmax;

/// Posterior summary for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorSummary {
    pub group: GroupLabel,
    pub alpha: f64,
    pub beta: f64,
    /// Mean of the Monte Carlo draws.
    pub posterior_mean: f64,
    /// `alpha / (alpha + beta)`.
    pub exact_mean: f64,
    pub credible_lower: f64,
    pub credible_upper: f64,
    pub prob_best: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesianResult {
    /// Discovery order.
    pub posteriors: Vec<PosteriorSummary>,
    /// Highest `prob_best`; first in discovery order on ties.
    pub best_group: GroupLabel,
    pub draws: u64,
    /// `None` when the generator was seeded from the OS or supplied by the caller.
    pub seed: Option<u64>,
    pub prior: BetaParams,
    pub credible_mass: f64,
    /// Raw draws, one vector per group in discovery order.
    #[serde(skip)]
    pub samples: Vec<Vec<f64>>,
}

impl BayesianResult {
    pub fn posterior(&self, label: &str) -> Option<&PosteriorSummary> {
        self.posteriors.iter().find(|p| p.group == label)
    }

    /// Draws for one group, for histogramming.
    pub fn samples_for(&self, label: &str) -> Option<&[f64]> {
        let idx = self.posteriors.iter().position(|p| p.group == label)?;
        self.samples.get(idx).map(Vec::as_slice)
    }

    /// Sum of `prob_best` across groups.
    pub fn prob_best_total(&self) -> f64 {
        self.posteriors.iter().map(|p| p.prob_best).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BayesianAnalyzer {
    prior: BetaParams,
    credible_mass: f64,
}

impl Default for BayesianAnalyzer {
    fn default() -> Self {
        Self {
            prior: BetaParams::uniform(),
            credible_mass: 0.95,
        }
    }
}

impl BayesianAnalyzer {
    pub fn new(prior_alpha: f64, prior_beta: f64, credible_mass: f64) -> Result<Self> {
        let prior = BetaParams::new(prior_alpha, prior_beta).ok_or_else(|| {
            Error::invalid_parameter(
                "prior",
                format!("Beta({prior_alpha}, {prior_beta}) needs finite positive parameters"),
            )
        })?;
        if !(credible_mass > 0.0 && credible_mass < 1.0) {
            return Err(Error::invalid_parameter(
                "credible_mass",
                format!("must be in (0, 1), got {credible_mass}"),
            ));
        }
        Ok(Self {
            prior,
            credible_mass,
        })
    }

    pub fn prior(&self) -> BetaParams {
        self.prior
    }

    /// Seeded entry point. `None` draws a seed from the OS.
    pub fn analyze(
        &self,
        dataset: &Dataset,
        draws: u64,
        seed: Option<u64>,
    ) -> Result<BayesianResult> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut result = self.analyze_with_rng(dataset, draws, &mut rng)?;
        result.seed = seed;
        Ok(result)
    }

    /// Run the analysis with a caller-supplied generator.
    pub fn analyze_with_rng<R: Rng + ?Sized>(
        &self,
        dataset: &Dataset,
        draws: u64,
        rng: &mut R,
    ) -> Result<BayesianResult> {
        if draws < 1 {
            return Err(Error::invalid_parameter("draws", "must be at least 1"));
        }
        let n_draws = usize::try_from(draws)
            .map_err(|_| Error::invalid_parameter("draws", format!("{draws} is too large")))?;

        let counts = dataset.group_counts();
        let mut posteriors = Vec::with_capacity(counts.len());
        let mut samples = Vec::with_capacity(counts.len());

        for c in &counts {
            let posterior = self.prior.observe(c.successes, c.trials).ok_or_else(|| {
                Error::invalid_parameter(
                    "counts",
                    format!("group {} has more conversions than trials", c.group),
                )
            })?;
            let dist = Beta::new(posterior.alpha, posterior.beta).map_err(|e| {
                Error::invalid_parameter("posterior", format!("group {}: {e}", c.group))
            })?;
            let draws_g: Vec<f64> = (0..n_draws).map(|_| dist.sample(&mut *rng)).collect();

            let (lower, upper) = posterior
                .credible_interval(self.credible_mass)
                .ok_or_else(|| Error::invalid_parameter("credible_mass", "must be in (0, 1)"))?;
            let sampled_mean = draws_g.iter().sum::<f64>() / n_draws as f64;

            posteriors.push(PosteriorSummary {
                group: c.group.clone(),
                alpha: posterior.alpha,
                beta: posterior.beta,
                posterior_mean: sampled_mean,
                exact_mean: posterior.mean(),
                credible_lower: lower,
                credible_upper: upper,
                prob_best: 0.0,
            });
            samples.push(draws_g);
        }

        let wins = count_wins(&samples, n_draws);
        for (summary, w) in posteriors.iter_mut().zip(&wins) {
            summary.prob_best = *w as f64 / n_draws as f64;
        }

        let best_idx =
            first_argmax(posteriors.iter().map(|p| p.prob_best)).ok_or(Error::EmptyDataset)?;
        let best_group = posteriors[best_idx].group.clone();

        debug!(
            groups = posteriors.len(),
            draws,
            best = %best_group,
            "posterior simulation finished"
        );

        Ok(BayesianResult {
            posteriors,
            best_group,
            draws,
            seed: None,
            prior: self.prior,
            credible_mass: self.credible_mass,
            samples,
        })
    }
}

/// Per-group count of draw positions holding the maximum.
fn count_wins(samples: &[Vec<f64>], n_draws: usize) -> Vec<u64> {
    let mut wins = vec![0u64; samples.len()];
    for i in 0..n_draws {
        if let Some(winner) = first_argmax(samples.iter().map(|s| s[i])) {
            wins[winner] += 1;
        }
    }
    wins
}
