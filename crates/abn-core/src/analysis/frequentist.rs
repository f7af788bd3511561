//! Pairwise two-proportion z-tests.
//!
//! For groups i < j in discovery order:
//!
//! ```text
//! p_pool = (k_i + k_j) / (n_i + n_j)
//! se     = sqrt(p_pool (1 - p_pool) (1/n_i + 1/n_j))
//! z      = (p_i - p_j) / se        (0 when se == 0)
//! p      = 2 (1 - Phi(|z|))
//! ```
//!
//! No multiple-comparison correction is applied.

use abn_common::{Dataset, Error, GroupCounts, GroupLabel, Result};
use abn_math::two_sided_p_value;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::first_argmax;

/// Observed conversion statistics for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: GroupLabel,
    pub sample_size: u64,
    pub conversions: u64,
    /// `conversions / sample_size`.
    pub rate: f64,
}

impl From<&GroupCounts> for GroupSummary {
    fn from(counts: &GroupCounts) -> Self {
        Self {
            group: counts.group.clone(),
            sample_size: counts.trials,
            conversions: counts.successes,
            rate: counts.successes as f64 / counts.trials as f64,
        }
    }
}

/// One unordered pair of groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    pub group_a: GroupLabel,
    pub group_b: GroupLabel,
    pub rate_a: f64,
    pub rate_b: f64,
    pub z_score: f64,
    pub p_value: f64,
    /// `group_a` if its rate is strictly higher, otherwise `group_b`.
    pub favored_group: GroupLabel,
    /// `p_value < significance_level`.
    pub significant: bool,
}

impl PairwiseComparison {
    /// "A vs B".
    pub fn label(&self) -> String {
        format!("{} vs {}", self.group_a, self.group_b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentistResult {
    /// Discovery order.
    pub groups: Vec<GroupSummary>,
    /// C(N, 2) entries, ordered by (i, j) with i < j.
    pub comparisons: Vec<PairwiseComparison>,
    /// Highest observed rate; first in discovery order on ties.
    pub best_group: GroupLabel,
    pub significance_level: f64,
}

impl FrequentistResult {
    pub fn group(&self, label: &str) -> Option<&GroupSummary> {
        self.groups.iter().find(|g| g.group == label)
    }

    pub fn comparison(&self, a: &str, b: &str) -> Option<&PairwiseComparison> {
        self.comparisons
            .iter()
            .find(|c| c.group_a == a && c.group_b == b)
    }
}

/// Pooled two-proportion z-test.
///
/// Returns `(z, p)`. When the pooled standard error is zero (both groups at
/// 0% or both at 100%) the statistic is defined as `z = 0`, giving `p = 1`.
pub fn two_proportion_z_test(k1: u64, n1: u64, k2: u64, n2: u64) -> (f64, f64) {
    let (k1, n1, k2, n2) = (k1 as f64, n1 as f64, k2 as f64, n2 as f64);
    let p1 = k1 / n1;
    let p2 = k2 / n2;
    let pooled = (k1 + k2) / (n1 + n2);
    let se = (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();

    let z = if se > 0.0 { (p1 - p2) / se } else { 0.0 };
    (z, two_sided_p_value(z))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequentistAnalyzer {
    significance_level: f64,
}

impl Default for FrequentistAnalyzer {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
        }
    }
}

impl FrequentistAnalyzer {
    /// `significance_level` must lie strictly inside (0, 1).
    pub fn new(significance_level: f64) -> Result<Self> {
        if !(significance_level > 0.0 && significance_level < 1.0) {
            return Err(Error::invalid_parameter(
                "significance_level",
                format!("must be in (0, 1), got {significance_level}"),
            ));
        }
        Ok(Self { significance_level })
    }

    pub fn significance_level(&self) -> f64 {
        self.significance_level
    }

    /// Deterministic: equal datasets give bit-identical results.
    pub fn analyze(&self, dataset: &Dataset) -> Result<FrequentistResult> {
        let groups: Vec<GroupSummary> =
            dataset.group_counts().iter().map(GroupSummary::from).collect();

        let pairs = groups.len() * groups.len().saturating_sub(1) / 2;
        let mut comparisons = Vec::with_capacity(pairs);
        for (i, a) in groups.iter().enumerate() {
            for b in &groups[i + 1..] {
                comparisons.push(self.compare(a, b));
            }
        }

        let best_idx =
            first_argmax(groups.iter().map(|g| g.rate)).ok_or(Error::EmptyDataset)?;
        let best_group = groups[best_idx].group.clone();

        Ok(FrequentistResult {
            groups,
            comparisons,
            best_group,
            significance_level: self.significance_level,
        })
    }

    fn compare(&self, a: &GroupSummary, b: &GroupSummary) -> PairwiseComparison {
        let (z, p) =
            two_proportion_z_test(a.conversions, a.sample_size, b.conversions, b.sample_size);
        let favored = if a.rate > b.rate { &a.group } else { &b.group };

        debug!(
            group_a = %a.group,
            group_b = %b.group,
            z_score = z,
            p_value = p,
            "pairwise z-test"
        );

        PairwiseComparison {
            group_a: a.group.clone(),
            group_b: b.group.clone(),
            rate_a: a.rate,
            rate_b: b.rate,
            z_score: z,
            p_value: p,
            favored_group: favored.clone(),
            significant: p < self.significance_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abn_common::Observation;

    fn dataset(groups: &[(&str, u64, u64)]) -> Dataset {
        let mut obs = Vec::new();
        for &(label, n, k) in groups {
            for i in 0..n {
                obs.push(Observation::new(format!("{label}-{i}"), label, i < k));
            }
        }
        Dataset::new(obs).unwrap()
    }

    #[test]
    fn z_test_known_value() {
        // 40/100 vs 55/100: pooled 0.475, se = sqrt(0.475*0.525*0.02)
        let (z, p) = two_proportion_z_test(40, 100, 55, 100);
        let se = (0.475_f64 * 0.525 * 0.02).sqrt();
        assert!((z - (-0.15 / se)).abs() < 1e-12);
        assert!((p - 0.033_672_069).abs() < 1e-6, "p={p}");
    }

    #[test]
    fn equal_rates_give_zero_z_and_unit_p() {
        let (z, p) = two_proportion_z_test(25, 50, 25, 50);
        assert_eq!(z, 0.0);
        assert_eq!(p, 1.0);
    }

    #[test]
    fn zero_standard_error_is_defined() {
        // all-zero and all-one pools
        assert_eq!(two_proportion_z_test(0, 30, 0, 20), (0.0, 1.0));
        assert_eq!(two_proportion_z_test(30, 30, 20, 20), (0.0, 1.0));
    }

    #[test]
    fn comparisons_cover_all_pairs_in_order() {
        let ds = dataset(&[("A", 10, 3), ("B", 10, 5), ("C", 10, 7), ("D", 10, 1)]);
        let result = FrequentistAnalyzer::default().analyze(&ds).unwrap();
        let labels: Vec<String> = result.comparisons.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec!["A vs B", "A vs C", "A vs D", "B vs C", "B vs D", "C vs D"]
        );
    }

    #[test]
    fn favored_group_ties_go_to_second() {
        let ds = dataset(&[("A", 50, 25), ("B", 50, 25)]);
        let result = FrequentistAnalyzer::default().analyze(&ds).unwrap();
        assert_eq!(result.comparisons[0].favored_group, "B");
        assert!(!result.comparisons[0].significant);
    }

    #[test]
    fn best_group_ties_go_to_first() {
        let ds = dataset(&[("A", 10, 2), ("B", 20, 10), ("C", 40, 20)]);
        let result = FrequentistAnalyzer::default().analyze(&ds).unwrap();
        assert_eq!(result.best_group, "B");
    }

    #[test]
    fn single_group_has_no_comparisons() {
        let ds = dataset(&[("only", 5, 2)]);
        let result = FrequentistAnalyzer::default().analyze(&ds).unwrap();
        assert!(result.comparisons.is_empty());
        assert_eq!(result.best_group, "only");
    }

    #[test]
    fn significance_flag_uses_configured_level() {
        let ds = dataset(&[("A", 100, 40), ("B", 100, 55)]);
        let loose = FrequentistAnalyzer::new(0.05).unwrap().analyze(&ds).unwrap();
        let strict = FrequentistAnalyzer::new(0.01).unwrap().analyze(&ds).unwrap();
        assert!(loose.comparisons[0].significant);
        assert!(!strict.comparisons[0].significant);
    }

    #[test]
    fn invalid_significance_level_rejected() {
        for level in [0.0, 1.0, -0.1, f64::NAN] {
            let err = FrequentistAnalyzer::new(level).unwrap_err();
            assert!(err.is_invalid_parameter());
        }
    }

    #[test]
    fn lookup_helpers() {
        let ds = dataset(&[("A", 4, 1), ("B", 4, 3)]);
        let result = FrequentistAnalyzer::default().analyze(&ds).unwrap();
        assert_eq!(result.group("B").map(|g| g.conversions), Some(3));
        assert!(result.comparison("A", "B").is_some());
        assert!(result.comparison("B", "A").is_none());
    }
}
