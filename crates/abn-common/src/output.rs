//! Report formats selectable with `--format`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Full report as pretty-printed JSON
    #[default]
    Json,

    /// Markdown tables for both analyses
    #[value(alias = "markdown")]
    Md,

    /// Both verdicts on one line
    Summary,
}

impl OutputFormat {
    /// Errors on stderr are JSON objects in this format, prose otherwise.
    pub fn is_machine_readable(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::Md => "md",
            OutputFormat::Summary => "summary",
        };
        f.write_str(name)
    }
}
