use crate::modules::drafts::use_cases::capture_draft::runner::AutosaveConfig;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Management API address (default: 127.0.0.1:8080)
    pub http_addr: SocketAddr,
    /// Draft store file (default: ./pr_drafts.json)
    pub store_path: PathBuf,
    /// File standing in for the description editor. Capture is off when unset.
    pub editor_path: Option<PathBuf>,
    /// URL of the pull request page the editor belongs to (default: about:blank)
    pub page_url: String,
    /// Branch shown on the page when the URL carries none.
    pub fallback_branch: Option<String>,
    /// Command receiving copied text on stdin, e.g. `wl-copy` or `xclip -selection clipboard`.
    pub clipboard_command: Option<String>,
    pub save_interval_ms: u64,
    pub debounce_ms: u64,
    pub sweep_interval_ms: u64,
    pub min_save_gap_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PR_DRAFTS_HTTP_ADDR: {0}")]
    InvalidAddr(String),

    #[error("invalid {name}: {value}")]
    InvalidMillis { name: &'static str, value: String },
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let addr = lookup("PR_DRAFTS_HTTP_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let http_addr = addr.parse().map_err(|_| ConfigError::InvalidAddr(addr))?;

        let millis = |name: &'static str, default: u64| -> Result<u64, ConfigError> {
            match lookup(name) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidMillis { name, value }),
                None => Ok(default),
            }
        };
        // Timer periods must be non-zero.
        let period = |name: &'static str, default: u64| -> Result<u64, ConfigError> {
            match millis(name, default)? {
                0 => Err(ConfigError::InvalidMillis {
                    name,
                    value: "0".to_string(),
                }),
                ms => Ok(ms),
            }
        };

        Ok(Self {
            http_addr,
            store_path: PathBuf::from(
                lookup("PR_DRAFTS_STORE_PATH").unwrap_or_else(|| "./pr_drafts.json".to_string()),
            ),
            editor_path: non_blank("PR_DRAFTS_EDITOR_PATH").map(PathBuf::from),
            page_url: lookup("PR_DRAFTS_PAGE_URL").unwrap_or_else(|| "about:blank".to_string()),
            fallback_branch: non_blank("PR_DRAFTS_FALLBACK_BRANCH"),
            clipboard_command: non_blank("PR_DRAFTS_CLIPBOARD_CMD"),
            save_interval_ms: period("PR_DRAFTS_SAVE_INTERVAL_MS", 7_000)?,
            debounce_ms: millis("PR_DRAFTS_DEBOUNCE_MS", 1_500)?,
            sweep_interval_ms: period("PR_DRAFTS_SWEEP_INTERVAL_MS", 10_000)?,
            min_save_gap_ms: millis("PR_DRAFTS_MIN_SAVE_GAP_MS", 5_000)?,
        })
    }

    pub fn autosave(&self) -> AutosaveConfig {
        AutosaveConfig {
            save_interval: Duration::from_millis(self.save_interval_ms),
            debounce: Duration::from_millis(self.debounce_ms),
            sweep_interval: Duration::from_millis(self.sweep_interval_ms),
            min_save_gap: Duration::from_millis(self.min_save_gap_ms),
        }
    }
}
