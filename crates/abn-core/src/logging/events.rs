//! Stable event names and pipeline stages for structured logs.

use serde::{Deserialize, Serialize};

/// Processing stages in the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Reading and normalizing input data.
    Load,
    /// Pairwise z-tests.
    Frequentist,
    /// Posterior simulation.
    Bayesian,
    /// Report composition and rendering.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Frequentist => "frequentist",
            Stage::Bayesian => "bayesian",
            Stage::Report => "report",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";

    // Load stage
    pub const DATA_LOADED: &str = "data.loaded";
    pub const DATA_REJECTED: &str = "data.rejected";

    // Analysis stages
    pub const FREQ_FINISHED: &str = "freq.finished";
    pub const BAYES_FINISHED: &str = "bayes.finished";

    // Report stage
    pub const REPORT_COMPOSED: &str = "report.composed";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_serialization() {
        assert_eq!(serde_json::to_string(&Stage::Load).unwrap(), "\"load\"");
        assert_eq!(
            serde_json::to_string(&Stage::Frequentist).unwrap(),
            "\"frequentist\""
        );
    }

    #[test]
    fn display_matches_serde() {
        for stage in [
            Stage::Init,
            Stage::Load,
            Stage::Frequentist,
            Stage::Bayesian,
            Stage::Report,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json.trim_matches('"'), stage.to_string());
        }
    }

    #[test]
    fn event_names_are_dotted() {
        for name in [
            event_names::RUN_STARTED,
            event_names::DATA_LOADED,
            event_names::FREQ_FINISHED,
            event_names::BAYES_FINISHED,
            event_names::REPORT_COMPOSED,
        ] {
            assert!(name.contains('.'), "{name}");
        }
    }
}
