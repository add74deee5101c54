//! Client configuration loaded via OrthoConfig.
//!
//! The only required knob is the backend origin. It is read from
//! `PORTFOLIO_API_BASE_URL` (or `--base-url`) and falls back to the local
//! development address when unset.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Backend origin used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings controlling how the client reaches the backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTFOLIO_API")]
pub struct ClientSettings {
    /// Base URL every request path is appended to.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl ClientSettings {
    /// Configured base URL, or [`DEFAULT_BASE_URL`].
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    /// Configured request timeout; zero is treated as unset.
    pub fn timeout(&self) -> Duration {
        let secs = self
            .timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }
}
