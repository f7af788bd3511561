//! A/B/n testing common types and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - Canonical observation and dataset model with discovery-ordered groups
//! - Unified error taxonomy with stable codes
//! - Output format specifications

pub mod dataset;
pub mod error;
pub mod output;

pub use dataset::{Dataset, GroupCounts, GroupLabel, Observation};
pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use output::OutputFormat;

/// Schema version stamped on serialized reports.
pub const SCHEMA_VERSION: &str = "1.0.0";
