// =============================================================================
// Shared types used across the Prism analysis engine
// =============================================================================

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which analytical view the orchestrator should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Per-ticker trend view: moving averages plus RSI.
    Full,
    /// Cross-ticker performance comparison, each series rebased to 100.
    Compare,
    /// Pairwise correlation matrix over the common date range.
    Corr,
}

impl Default for AnalysisMode {
    fn default() -> Self {
        Self::Full
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Compare => write!(f, "compare"),
            Self::Corr => write!(f, "corr"),
        }
    }
}

/// How the final report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Text
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
