//! Property-based tests for analysis invariants.

use abn_common::{Dataset, Observation};
use abn_core::analysis::{two_proportion_z_test, BayesianAnalyzer, FrequentistAnalyzer};
use proptest::prelude::*;

/// Per-group `(trials, successes)` with successes <= trials.
fn group_counts_strategy() -> impl Strategy<Value = Vec<(u64, u64)>> {
    prop::collection::vec(
        (1u64..=60).prop_flat_map(|n| (Just(n), 0u64..=n)),
        1..=5,
    )
}

fn build_dataset(counts: &[(u64, u64)]) -> Dataset {
    let mut obs = Vec::new();
    for (g, &(n, k)) in counts.iter().enumerate() {
        let label = format!("g{g}");
        for i in 0..n {
            obs.push(Observation::new(format!("{label}-{i}"), label.as_str(), i < k));
        }
    }
    Dataset::new(obs).expect("generated dataset is valid")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn one_comparison_per_unordered_pair(counts in group_counts_strategy()) {
        let ds = build_dataset(&counts);
        let result = FrequentistAnalyzer::default().analyze(&ds).expect("analyze");
        let n = counts.len();
        prop_assert_eq!(result.comparisons.len(), n * (n - 1) / 2);
        prop_assert_eq!(result.groups.len(), n);
    }

    #[test]
    fn rates_and_p_values_are_bounded(counts in group_counts_strategy()) {
        let ds = build_dataset(&counts);
        let result = FrequentistAnalyzer::default().analyze(&ds).expect("analyze");
        for g in &result.groups {
            prop_assert!((0.0..=1.0).contains(&g.rate), "rate={}", g.rate);
        }
        for c in &result.comparisons {
            prop_assert!(c.z_score.is_finite());
            prop_assert!((0.0..=1.0).contains(&c.p_value), "p={}", c.p_value);
            prop_assert_eq!(c.significant, c.p_value < result.significance_level);
        }
    }

    #[test]
    fn z_test_is_antisymmetric(
        (n1, k1) in (1u64..=500).prop_flat_map(|n| (Just(n), 0u64..=n)),
        (n2, k2) in (1u64..=500).prop_flat_map(|n| (Just(n), 0u64..=n)),
    ) {
        let (z_ab, p_ab) = two_proportion_z_test(k1, n1, k2, n2);
        let (z_ba, p_ba) = two_proportion_z_test(k2, n2, k1, n1);
        prop_assert!((z_ab + z_ba).abs() < 1e-12);
        prop_assert!((p_ab - p_ba).abs() < 1e-12);
    }

    #[test]
    fn frequentist_is_deterministic(counts in group_counts_strategy()) {
        let ds = build_dataset(&counts);
        let a = FrequentistAnalyzer::default().analyze(&ds).expect("analyze");
        let b = FrequentistAnalyzer::default().analyze(&ds).expect("analyze");
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prob_best_sums_to_one(counts in group_counts_strategy(), seed in any::<u64>()) {
        let ds = build_dataset(&counts);
        let result = BayesianAnalyzer::default()
            .analyze(&ds, 200, Some(seed))
            .expect("analyze");
        let total = result.prob_best_total();
        prop_assert!((total - 1.0).abs() < 1e-9, "total={total}");
        for p in &result.posteriors {
            prop_assert!((0.0..=1.0).contains(&p.prob_best));
            prop_assert!(p.credible_lower <= p.exact_mean && p.exact_mean <= p.credible_upper);
        }
    }

    #[test]
    fn same_seed_same_result(counts in group_counts_strategy(), seed in any::<u64>()) {
        let ds = build_dataset(&counts);
        let analyzer = BayesianAnalyzer::default();
        let a = analyzer.analyze(&ds, 100, Some(seed)).expect("analyze");
        let b = analyzer.analyze(&ds, 100, Some(seed)).expect("analyze");
        prop_assert_eq!(a, b);
    }
}
