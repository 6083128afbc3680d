//! Environment configuration for the panel.
//!
//! | Variable                         | Default                 |
//! |----------------------------------|-------------------------|
//! | `SCRAPER_PANEL_POLL_INTERVAL_MS` | `5000`                  |
//! | `SCRAPER_PANEL_BASE_URL`         | `http://127.0.0.1:5173` |
//! | `SCRAPER_PANEL_OUTPUT_DIR`       | `./downloads`           |
//! | `SCRAPER_PANEL_LOG`              | `terminal`              |
//!
//! The base url must serve `api/status`, `api/start` and the rest beneath it:
//! the frontend dev server that proxies `/api`, or any reverse proxy prefix
//! (`http://host/scraper/` is kept as a prefix). The bare job server has no
//! `/api` routes.

use std::path::PathBuf;
use std::time::Duration;

use scraper_panel_engine::ApiSettings;

use super::logging::LogDestination;

pub const POLL_INTERVAL_VAR: &str = "SCRAPER_PANEL_POLL_INTERVAL_MS";
pub const BASE_URL_VAR: &str = "SCRAPER_PANEL_BASE_URL";
pub const OUTPUT_DIR_VAR: &str = "SCRAPER_PANEL_OUTPUT_DIR";
pub const LOG_VAR: &str = "SCRAPER_PANEL_LOG";

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub poll_interval: Duration,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub log_destination: LogDestination,
    /// Problems found while reading the environment; logged once logging is up.
    pub warnings: Vec<String>,
}

impl PanelConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        let poll_interval_ms = match lookup(POLL_INTERVAL_VAR) {
            None => DEFAULT_POLL_INTERVAL_MS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => {
                    warnings.push(format!(
                        "{POLL_INTERVAL_VAR}={raw:?} is not a positive number of milliseconds; \
                         using {DEFAULT_POLL_INTERVAL_MS}"
                    ));
                    DEFAULT_POLL_INTERVAL_MS
                }
            },
        };

        let base_url = lookup(BASE_URL_VAR)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| ApiSettings::DEFAULT_BASE_URL.to_string());

        let output_dir = lookup(OUTPUT_DIR_VAR)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("downloads"));

        let log_destination = match lookup(LOG_VAR) {
            None => LogDestination::Terminal,
            Some(raw) => LogDestination::parse(&raw).unwrap_or_else(|| {
                warnings.push(format!(
                    "{LOG_VAR}={raw:?} is not one of terminal, file, both; using terminal"
                ));
                LogDestination::Terminal
            }),
        };

        Self {
            poll_interval: Duration::from_millis(poll_interval_ms),
            base_url,
            output_dir,
            log_destination,
            warnings,
        }
    }
}
