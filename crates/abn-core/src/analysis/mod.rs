//! Statistical analyzers.

pub mod bayesian;
pub mod frequentist;

pub use bayesian::{BayesianAnalyzer, BayesianResult, PosteriorSummary};
pub use frequentist::{
    two_proportion_z_test, FrequentistAnalyzer, FrequentistResult, GroupSummary,
    PairwiseComparison,
};

/// Monte Carlo draws per group when none are configured.
pub const DEFAULT_DRAWS: u64 = 5000;

/// Index of the largest value; ties go to the earliest index.
///
/// The running maximum is replaced only on a strictly greater value, so the
/// scan order is the tie-break order. NaN never wins.
pub(crate) fn first_argmax<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in values.into_iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}
