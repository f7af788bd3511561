//! Exit codes for the `abn` CLI.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/input errors (recoverable by fixing arguments, data or config)
//! - 20-29: Internal and I/O errors

use abn_common::{Error, ErrorCategory};

/// Exit codes for abn operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Analysis completed.
    Clean = 0,

    // ========================================================================
    // User / Input Errors (10-19)
    // ========================================================================
    /// Invalid arguments
    ArgsError = 10,

    /// Input table is missing columns or malformed
    SchemaError = 11,

    /// Input values violate dataset invariants
    ValidationError = 12,

    /// Analysis parameter out of range
    ParameterError = 13,

    /// Configuration file unreadable or invalid
    ConfigError = 14,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Check if this exit code is a user/input error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    /// Check if this exit code is an internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        self.as_i32() >= 20
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::SchemaError => "ERR_SCHEMA",
            ExitCode::ValidationError => "ERR_VALIDATION",
            ExitCode::ParameterError => "ERR_PARAMETER",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Schema => ExitCode::SchemaError,
            ErrorCategory::Validation => ExitCode::ValidationError,
            ErrorCategory::Parameter => ExitCode::ParameterError,
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Io => match err {
                Error::Json(_) => ExitCode::InternalError,
                _ => ExitCode::IoError,
            },
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_their_family() {
        let schema = Error::MissingColumns {
            missing: vec!["converted".into()],
            available: vec![],
        };
        assert_eq!(ExitCode::from(&schema), ExitCode::SchemaError);
        assert_eq!(ExitCode::from(&Error::EmptyDataset), ExitCode::ValidationError);
        assert_eq!(
            ExitCode::from(&Error::invalid_parameter("draws", "must be at least 1")),
            ExitCode::ParameterError
        );
        assert_eq!(ExitCode::from(&Error::Config("x".into())), ExitCode::ConfigError);

        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(ExitCode::from(&io), ExitCode::IoError);
    }

    #[test]
    fn ranges() {
        assert!(ExitCode::Clean.is_success());
        assert!(ExitCode::SchemaError.is_user_error());
        assert!(ExitCode::ConfigError.is_user_error());
        assert!(ExitCode::IoError.is_internal_error());
        assert!(!ExitCode::ArgsError.is_internal_error());
    }

    #[test]
    fn display_includes_name_and_number() {
        assert_eq!(ExitCode::ValidationError.to_string(), "ERR_VALIDATION (12)");
    }
}
