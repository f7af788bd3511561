//! Where log settings come from.
//!
//! Precedence, lowest to highest: built-in default (`warn`, human),
//! `RUST_LOG` (passed through as a raw directive), `ABN_LOG` / `ABN_LOG_FORMAT`,
//! then the CLI flags `-v`/`-q`/`--log-format`.

use clap::ValueEnum;
use tracing_subscriber::filter::LevelFilter;

/// Selects the level filter (`trace` .. `error`, or `off`).
pub const ENV_LOG: &str = "ABN_LOG";
/// Selects `human` or `jsonl`.
pub const ENV_LOG_FORMAT: &str = "ABN_LOG_FORMAT";
const ENV_RUST_LOG: &str = "RUST_LOG";

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    #[value(alias = "pretty")]
    Human,
    /// One JSON object per line.
    #[value(alias = "json")]
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s.trim(), true)
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LogFormat::Human => "human",
            LogFormat::Jsonl => "jsonl",
        })
    }
}

/// Level requested by `-v` repetitions or `-q`. `None` leaves the
/// environment in charge.
pub fn level_from_flags(verbose: u8, quiet: bool) -> Option<LevelFilter> {
    if quiet {
        return Some(LevelFilter::OFF);
    }
    match verbose {
        0 => None,
        1 => Some(LevelFilter::INFO),
        2 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LevelFilter,
    /// Timestamps on human lines.
    pub timestamps: bool,
    /// Raw `RUST_LOG` directive; replaces the per-crate default filter.
    pub directive: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Human,
            level: LevelFilter::WARN,
            timestamps: true,
            directive: None,
        }
    }
}

impl LogConfig {
    pub fn from_env(cli_level: Option<LevelFilter>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), cli_level, cli_format)
    }

    /// [`LogConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        cli_level: Option<LevelFilter>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let mut config = Self::default();

        let env_level = lookup(ENV_LOG).and_then(|v| v.trim().parse::<LevelFilter>().ok());
        match env_level {
            Some(level) => config.level = level,
            None => {
                config.directive = lookup(ENV_RUST_LOG).filter(|v| !v.trim().is_empty());
            }
        }

        if let Some(format) = lookup(ENV_LOG_FORMAT).and_then(|v| v.parse().ok()) {
            config.format = format;
        }

        if let Some(level) = cli_level {
            config.level = level;
            config.directive = None;
        }
        config.format = cli_format.unwrap_or(config.format);
        config
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Directive for `EnvFilter`: the raw `RUST_LOG` value, or the level
    /// applied to the binary and both library crates.
    pub fn filter_directive(&self) -> String {
        if let Some(directive) = &self.directive {
            return directive.clone();
        }
        let level = self.level.to_string().to_lowercase();
        ["abn", "abn_core", "abn_config"]
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}
