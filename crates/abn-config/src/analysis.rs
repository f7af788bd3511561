//! Analysis configuration types.
//!
//! Every section defaults, so `{}` is a valid analysis.json and a missing
//! file behaves exactly like the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::{ValidationError, ValidationResult};

/// Complete analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub columns: ColumnNames,

    #[serde(default)]
    pub frequentist: FrequentistSettings,

    #[serde(default)]
    pub bayesian: BayesianSettings,

    /// Arms the experiment is expected to contain. Each must have rows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
}

/// Input column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub id: String,
    pub group: String,
    pub converted: String,
}

/// Settings for the pairwise z-tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequentistSettings {
    /// Threshold below which a comparison is flagged significant.
    pub significance_level: f64,
}

/// Settings for posterior simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BayesianSettings {
    /// Monte Carlo draws per group.
    pub draws: u64,

    /// Fixed RNG seed; `None` seeds from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    pub prior_alpha: f64,
    pub prior_beta: f64,

    /// Probability mass of the reported credible interval.
    pub credible_mass: f64,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            description: None,
            columns: ColumnNames::default(),
            frequentist: FrequentistSettings::default(),
            bayesian: BayesianSettings::default(),
            groups: Vec::new(),
        }
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            id: "user_id".to_string(),
            group: "group".to_string(),
            converted: "converted".to_string(),
        }
    }
}

impl Default for FrequentistSettings {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
        }
    }
}

impl Default for BayesianSettings {
    fn default() -> Self {
        Self {
            draws: 5000,
            seed: None,
            prior_alpha: 1.0,
            prior_beta: 1.0,
            credible_mass: 0.95,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn parse_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> ValidationResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("Serialization failed: {}", e)))
    }
}
