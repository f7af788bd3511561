//! Error types for A/B/n analysis.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification (data schema, data validity, parameters, config, I/O)
//! - Remediation hints for humans
//!
//! # Agent-Facing Output
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 10,
//!   "category": "schema",
//!   "message": "missing required column(s): converted",
//!   "context": { "missing": ["converted"] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for A/B/n operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Input table is missing columns or is structurally malformed.
    Schema,
    /// Input values violate the dataset invariants.
    Validation,
    /// A caller-supplied analysis parameter is out of range.
    Parameter,
    /// Configuration file errors.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Schema => write!(f, "schema"),
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Parameter => write!(f, "parameter"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for A/B/n analysis.
#[derive(Error, Debug)]
pub enum Error {
    // Schema errors (10-19)
    #[error("missing required column(s): {}", .missing.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("row {row} has {found} cell(s), header declares {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    // Validation errors (20-29)
    #[error("row {row}: converted value {value:?} is not binary (expected 0/1 or true/false)")]
    NonBinaryOutcome { row: usize, value: String },

    #[error("row {row}: group label is empty")]
    EmptyGroupLabel { row: usize },

    #[error("dataset contains no observations")]
    EmptyDataset,

    #[error("group {group:?} has no observations")]
    EmptyGroup { group: String },

    // Parameter errors (30-39)
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter { name: String, message: String },

    // Configuration errors (40-49)
    #[error("configuration error: {0}")]
    Config(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for an out-of-range analysis parameter.
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Schema errors
    /// - 20-29: Validation errors
    /// - 30-39: Parameter errors
    /// - 40-49: Configuration errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::MissingColumns { .. } => 10,
            Error::RaggedRow { .. } => 11,
            Error::NonBinaryOutcome { .. } => 20,
            Error::EmptyGroupLabel { .. } => 21,
            Error::EmptyDataset => 22,
            Error::EmptyGroup { .. } => 23,
            Error::InvalidParameter { .. } => 30,
            Error::Config(_) => 40,
            Error::Io(_) => 60,
            Error::Csv(_) => 61,
            Error::Json(_) => 62,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::MissingColumns { .. } | Error::RaggedRow { .. } => ErrorCategory::Schema,

            Error::NonBinaryOutcome { .. }
            | Error::EmptyGroupLabel { .. }
            | Error::EmptyDataset
            | Error::EmptyGroup { .. } => ErrorCategory::Validation,

            Error::InvalidParameter { .. } => ErrorCategory::Parameter,

            Error::Config(_) => ErrorCategory::Config,

            Error::Io(_) | Error::Csv(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// True for the schema family (missing/misnamed columns, malformed rows).
    pub fn is_schema_error(&self) -> bool {
        self.category() == ErrorCategory::Schema
    }

    /// True for the data-validity family (non-binary outcomes, empty groups).
    pub fn is_validation_error(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    /// True for out-of-range analysis parameters.
    pub fn is_invalid_parameter(&self) -> bool {
        self.category() == ErrorCategory::Parameter
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::MissingColumns { .. } => {
                "The input needs user_id, group and converted columns. Rename them or pass --id-column/--group-column/--converted-column."
            }
            Error::RaggedRow { .. } => {
                "Every CSV row must have as many cells as the header. Check for unquoted commas."
            }
            Error::NonBinaryOutcome { .. } => {
                "The converted column accepts only 0/1 or true/false. Clean the offending rows."
            }
            Error::EmptyGroupLabel { .. } => "Every row needs a non-empty group label.",
            Error::EmptyDataset => "Provide at least one observation.",
            Error::EmptyGroup { .. } => "Drop the group or supply observations for it.",
            Error::InvalidParameter { .. } => {
                "Check the draw count, prior parameters and probability settings."
            }
            Error::Config(_) => {
                "Run 'abn check' to validate configuration, or remove the config file to use defaults."
            }
            Error::Io(_) => "Check that the file exists and is readable.",
            Error::Csv(_) => "The file is not valid CSV. Check encoding (UTF-8) and quoting.",
            Error::Json(_) => "Invalid JSON. Check syntax with 'jq . <file>'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Schema => "Input Schema Error",
            ErrorCategory::Validation => "Input Validation Error",
            ErrorCategory::Parameter => "Invalid Parameter",
            ErrorCategory::Config => "Configuration Error",
            ErrorCategory::Io => "I/O Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Remediation hint.
    pub remediation: String,

    /// Additional structured context (e.g., row number, column names).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::MissingColumns { missing, available } => {
                context.insert("missing".to_string(), serde_json::json!(missing));
                context.insert("available".to_string(), serde_json::json!(available));
            }
            Error::RaggedRow { row, .. }
            | Error::NonBinaryOutcome { row, .. }
            | Error::EmptyGroupLabel { row } => {
                context.insert("row".to_string(), serde_json::json!(row));
            }
            Error::EmptyGroup { group } => {
                context.insert("group".to_string(), serde_json::json!(group));
            }
            Error::InvalidParameter { name, .. } => {
                context.insert("parameter".to_string(), serde_json::json!(name));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            remediation: err.remediation().to_string(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Format for human consumption: headline, reason, fix.
    pub fn to_human(&self, headline: &str) -> String {
        format!(
            "✗ {}\n  Reason: {}\n  Fix: {}",
            headline, self.message, self.remediation
        )
    }
}
