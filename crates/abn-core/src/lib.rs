//! A/B/n Conversion Testing Core Library
//!
//! This library provides the statistical engine for A/B/n tests:
//! - Dataset adapter (raw table or CSV → validated `Dataset`)
//! - Frequentist analysis (pairwise two-proportion z-tests)
//! - Bayesian analysis (Beta-Binomial posteriors, Monte Carlo probability of being best)
//! - Report composition and rendering
//! - Exit codes and logging for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod adapter;
pub mod analysis;
pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod report;

pub use adapter::{normalize, ColumnMapping, RawTable};
pub use analysis::{
    BayesianAnalyzer, BayesianResult, FrequentistAnalyzer, FrequentistResult, GroupSummary,
    PairwiseComparison, PosteriorSummary, DEFAULT_DRAWS,
};
pub use report::{compose, Report};
