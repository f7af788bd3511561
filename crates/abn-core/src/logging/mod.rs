//! Structured logging for the `abn` CLI.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for pipelines
//!
//! # Usage
//!
//! ```ignore
//! use abn_core::logging::{init_logging, LogConfig, Stage, event_names};
//!
//! let config = LogConfig::from_env(None, None);
//! init_logging(&config);
//!
//! abn_core::log_event!(INFO, event_names::RUN_STARTED, Stage::Init, "analysis started");
//! ```
//!
//! stdout is reserved for command payloads (JSON/MD output); stderr receives
//! all log output.

pub mod config;
pub mod events;

pub use config::{level_from_flags, LogConfig, LogFormat};
pub use tracing_subscriber::filter::LevelFilter;
pub use events::{event_names, Stage};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging subsystem.
///
/// Call once at startup. A second call is a no-op.
pub fn init_logging(config: &LogConfig) {
    // a malformed RUST_LOG degrades to the level alone
    let filter = EnvFilter::try_new(config.filter_directive())
        .unwrap_or_else(|_| EnvFilter::default().add_directive(config.level.into()));

    let result = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
        }
    };

    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}

/// Structured event with a stable name and stage.
///
/// Usage:
/// ```ignore
/// log_event!(INFO, event_names::DATA_LOADED, Stage::Load, "dataset ready", rows = 1200);
/// ```
#[macro_export]
macro_rules! log_event {
    (INFO, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::info!(
            event = $event,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
    (DEBUG, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::debug!(
            event = $event,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
    (WARN, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::warn!(
            event = $event,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
    (ERROR, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::error!(
            event = $event,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
}
