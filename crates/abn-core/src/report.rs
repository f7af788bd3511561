//! Result composition: both analyses merged into one serializable report.

use abn_common::{GroupLabel, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};

use crate::analysis::{
    BayesianResult, FrequentistResult, GroupSummary, PairwiseComparison, PosteriorSummary,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentistSection {
    pub groups: Vec<GroupSummary>,
    pub comparisons: Vec<PairwiseComparison>,
    pub best_group: GroupLabel,
    pub significance_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesianSection {
    pub posteriors: Vec<PosteriorSummary>,
    pub best_group: GroupLabel,
    pub prior_alpha: f64,
    pub prior_beta: f64,
    pub credible_mass: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub draws: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub frequentist: FrequentistSection,
    pub bayesian: BayesianSection,
}

impl Report {
    /// Both paradigms name the same winner.
    pub fn verdicts_agree(&self) -> bool {
        self.frequentist.best_group == self.bayesian.best_group
    }

    pub fn group_count(&self) -> usize {
        self.frequentist.groups.len()
    }
}

/// Merge the two analyses. No recomputation, no rendering.
///
/// Raw posterior draws stay on the `BayesianResult`; the report carries
/// summaries only.
pub fn compose(frequentist: &FrequentistResult, bayesian: &BayesianResult) -> Report {
    Report {
        schema_version: SCHEMA_VERSION.to_string(),
        draws: bayesian.draws,
        seed: bayesian.seed,
        frequentist: FrequentistSection {
            groups: frequentist.groups.clone(),
            comparisons: frequentist.comparisons.clone(),
            best_group: frequentist.best_group.clone(),
            significance_level: frequentist.significance_level,
        },
        bayesian: BayesianSection {
            posteriors: bayesian.posteriors.clone(),
            best_group: bayesian.best_group.clone(),
            prior_alpha: bayesian.prior.alpha,
            prior_beta: bayesian.prior.beta,
            credible_mass: bayesian.credible_mass,
        },
    }
}
