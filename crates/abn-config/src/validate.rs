//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::analysis::{AnalysisConfig, BayesianSettings, ColumnNames};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 41,
            ValidationError::ParseError(_) => 42,
            ValidationError::SemanticError(_) => 43,
            ValidationError::InvalidValue { .. } => 44,
            ValidationError::VersionMismatch { .. } => 45,
        }
    }

    fn invalid(field: &str, message: String) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message,
        }
    }
}

impl From<ValidationError> for abn_common::Error {
    fn from(err: ValidationError) -> Self {
        abn_common::Error::Config(err.to_string())
    }
}

/// Validate an analysis configuration semantically.
pub fn validate_config(config: &AnalysisConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    validate_columns(&config.columns)?;

    let alpha = config.frequentist.significance_level;
    if !open_unit(alpha) {
        return Err(ValidationError::invalid(
            "frequentist.significance_level",
            format!("Must be in (0, 1), got {}", alpha),
        ));
    }

    validate_bayesian(&config.bayesian)?;
    validate_groups(&config.groups)?;

    Ok(())
}

fn validate_columns(columns: &ColumnNames) -> ValidationResult<()> {
    let named = [
        ("columns.id", &columns.id),
        ("columns.group", &columns.group),
        ("columns.converted", &columns.converted),
    ];
    for (field, name) in named {
        if name.trim().is_empty() {
            return Err(ValidationError::invalid(field, "Must not be empty".into()));
        }
    }

    if columns.id == columns.group
        || columns.id == columns.converted
        || columns.group == columns.converted
    {
        return Err(ValidationError::SemanticError(format!(
            "column names must be distinct (id={}, group={}, converted={})",
            columns.id, columns.group, columns.converted
        )));
    }

    Ok(())
}

fn validate_bayesian(bayes: &BayesianSettings) -> ValidationResult<()> {
    if bayes.draws == 0 {
        return Err(ValidationError::invalid(
            "bayesian.draws",
            "Must be at least 1".into(),
        ));
    }

    for (field, value) in [
        ("bayesian.prior_alpha", bayes.prior_alpha),
        ("bayesian.prior_beta", bayes.prior_beta),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::invalid(
                field,
                format!("Must be positive, got {}", value),
            ));
        }
    }

    if !open_unit(bayes.credible_mass) {
        return Err(ValidationError::invalid(
            "bayesian.credible_mass",
            format!("Must be in (0, 1), got {}", bayes.credible_mass),
        ));
    }

    Ok(())
}

fn validate_groups(groups: &[String]) -> ValidationResult<()> {
    for (idx, group) in groups.iter().enumerate() {
        if group.trim().is_empty() {
            return Err(ValidationError::invalid(
                &format!("groups[{}]", idx),
                "Must not be empty".into(),
            ));
        }
        if groups[..idx].contains(group) {
            return Err(ValidationError::SemanticError(format!(
                "group {:?} is declared twice",
                group
            )));
        }
    }
    Ok(())
}

fn open_unit(p: f64) -> bool {
    p > 0.0 && p < 1.0
}
