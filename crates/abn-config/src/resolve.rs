//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path → defaults.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::analysis::AnalysisConfig;
use crate::validate::{validate_config, ValidationResult};

/// Where the configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Outcome of path discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    /// Path to analysis.json, or None when falling back to defaults.
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "ABN_CONFIG";
pub const ENV_CONFIG_DIR: &str = "ABN_CONFIG_DIR";

/// Standard config file name.
pub const CONFIG_FILENAME: &str = "analysis.json";

/// Application name for XDG directories.
const APP_NAME: &str = "abn-testing";

/// Resolve the analysis.json path.
///
/// 1. Explicit CLI path
/// 2. `ABN_CONFIG` (direct path)
/// 3. `ABN_CONFIG_DIR` + analysis.json, if that file exists
/// 4. XDG config directory (~/.config/abn-testing/), if the file exists
/// 5. Built-in defaults (None)
///
/// Explicit paths from steps 1 and 2 are returned even when the file is
/// absent, so a typo surfaces as a read error instead of silently using
/// defaults.
pub fn resolve_config(cli_path: Option<&Path>) -> ResolvedConfig {
    if let Some(path) = cli_path {
        return ResolvedConfig {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    if let Some(env_path) = non_empty_env(ENV_CONFIG_PATH) {
        return ResolvedConfig {
            path: Some(PathBuf::from(env_path)),
            source: ConfigSource::Environment,
        };
    }

    if let Some(config_dir) = non_empty_env(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            return ResolvedConfig {
                path: Some(path),
                source: ConfigSource::Environment,
            };
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return ResolvedConfig {
                path: Some(path),
                source: ConfigSource::XdgConfig,
            };
        }
    }

    ResolvedConfig::default()
}

/// Resolve, parse and validate the configuration in one step.
pub fn load_config(cli_path: Option<&Path>) -> ValidationResult<(AnalysisConfig, ResolvedConfig)> {
    let resolved = resolve_config(cli_path);
    let config = match &resolved.path {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    validate_config(&config)?;

    debug!(
        source = %resolved.source,
        path = ?resolved.path,
        draws = config.bayesian.draws,
        "configuration loaded"
    );
    Ok((config, resolved))
}

/// Get the XDG config directory for abn-testing.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::CliArgument), "CLI argument");
        assert_eq!(
            format!("{}", ConfigSource::Environment),
            "environment variable"
        );
        assert_eq!(format!("{}", ConfigSource::XdgConfig), "XDG config");
        assert_eq!(
            format!("{}", ConfigSource::BuiltinDefault),
            "builtin default"
        );
    }

    #[test]
    fn cli_path_wins_even_if_missing() {
        let resolved = resolve_config(Some(Path::new("/nonexistent/analysis.json")));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(
            resolved.path.as_deref(),
            Some(Path::new("/nonexistent/analysis.json"))
        );
    }

    #[test]
    fn test_xdg_config_dir() {
        if let Some(path) = xdg_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }
}
