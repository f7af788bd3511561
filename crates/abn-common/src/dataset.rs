//! Canonical observation and dataset model.
//!
//! A [`Dataset`] is an ordered, immutable sequence of [`Observation`]s plus
//! the list of group labels in *discovery order* (order of first
//! appearance). Every ordering and tie-break downstream keys off that list,
//! so it is computed once here rather than re-derived by each analyzer.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};

/// Experiment arm label. Any non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupLabel(String);

impl GroupLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupLabel {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for GroupLabel {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for GroupLabel {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GroupLabel {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One user's outcome in one arm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Caller-supplied identifier. Uniqueness is not enforced.
    pub id: String,
    pub group: GroupLabel,
    pub converted: bool,
}

impl Observation {
    pub fn new(id: impl Into<String>, group: impl Into<GroupLabel>, converted: bool) -> Self {
        Self {
            id: id.into(),
            group: group.into(),
            converted,
        }
    }
}

/// Conversion counts for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCounts {
    pub group: GroupLabel,
    /// Number of observations, always >= 1.
    pub trials: u64,
    /// Number of converted observations, `<= trials`.
    pub successes: u64,
}

/// Validated, ordered observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    observations: Vec<Observation>,
    groups: Vec<GroupLabel>,
}

impl Dataset {
    /// Build a dataset, checking that it is non-empty and every label is non-empty.
    ///
    /// Row numbers in errors are 1-based positions in `observations`.
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let mut seen: HashSet<&GroupLabel> = HashSet::new();
        let mut groups: Vec<GroupLabel> = Vec::new();
        for (idx, obs) in observations.iter().enumerate() {
            if obs.group.as_str().trim().is_empty() {
                return Err(Error::EmptyGroupLabel { row: idx + 1 });
            }
            if seen.insert(&obs.group) {
                groups.push(obs.group.clone());
            }
        }

        Ok(Self {
            observations,
            groups,
        })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Distinct group labels in order of first appearance.
    pub fn groups(&self) -> &[GroupLabel] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Fail with `EmptyGroup` for the first declared label that has no rows.
    pub fn require_groups(&self, declared: &[GroupLabel]) -> Result<()> {
        match declared.iter().find(|g| !self.groups.contains(g)) {
            Some(missing) => Err(Error::EmptyGroup {
                group: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Per-group trial and success counts, in discovery order.
    pub fn group_counts(&self) -> Vec<GroupCounts> {
        let index: HashMap<&GroupLabel, usize> = self
            .groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g, i))
            .collect();

        let mut counts: Vec<GroupCounts> = self
            .groups
            .iter()
            .map(|g| GroupCounts {
                group: g.clone(),
                trials: 0,
                successes: 0,
            })
            .collect();

        for obs in &self.observations {
            // every label was registered in `new`
            if let Some(&i) = index.get(&obs.group) {
                counts[i].trials += 1;
                if obs.converted {
                    counts[i].successes += 1;
                }
            }
        }

        counts
    }
}
