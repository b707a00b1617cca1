// =============================================================================
// App Configuration — analysis defaults with per-field serde fallbacks
// =============================================================================
//
// Optional JSON file holding the defaults the CLI does not override: RSI
// period, default moving-average windows, fetch timeout, and the provider
// base URL.  Every field carries `#[serde(default)]` so that adding new
// fields never breaks loading an older config file; a missing file is not
// an error — the caller falls back to `AppConfig::default()` with a warning.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::market_data::yahoo::DEFAULT_BASE_URL;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_rsi_period() -> usize {
    14
}

fn default_ma_windows() -> Vec<usize> {
    vec![50, 200]
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_yahoo_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

// =============================================================================
// AppConfig
// =============================================================================

/// Analysis defaults, overridable per run by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// RSI smoothing period used in full mode.
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Moving-average windows used when `--ma` is not given.
    #[serde(default = "default_ma_windows")]
    pub ma_windows: Vec<usize>,

    /// Per-request HTTP timeout for the market-data client.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Provider base URL; also overridable via `PRISM_YAHOO_BASE_URL`.
    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            ma_windows: default_ma_windows(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            yahoo_base_url: default_yahoo_base_url(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            rsi_period = config.rsi_period,
            ma_windows = ?config.ma_windows,
            "config loaded"
        );

        Ok(config)
    }
}
