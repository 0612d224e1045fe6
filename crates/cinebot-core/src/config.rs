//! Application configuration
//!
//! [`AppConfig`] bundles the HTTP client settings with the controller's
//! timing and pagination knobs. `from_env` reads the same settings from
//! environment variables.

use std::time::Duration;

use crate::client::ClientConfig;
use crate::error::{CinebotError, Result};
use crate::pagination::DEFAULT_WINDOW;
use crate::store::MAX_TOTAL_PAGES;

/// Default quiet window before a search query settles
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Configuration for the mini-app controller
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfig,
    /// Search debounce window (default: 500ms)
    pub debounce: Duration,
    /// Number of page buttons in pagination controls (default: 5)
    pub page_window: usize,
    /// Cap on `total_pages` kept in state (default: 20)
    pub max_total_pages: u32,
    /// `tracing` filter directive; `RUST_LOG` applies when unset
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            debounce: DEFAULT_DEBOUNCE,
            page_window: DEFAULT_WINDOW,
            max_total_pages: MAX_TOTAL_PAGES,
            log_filter: None,
        }
    }
}

impl AppConfig {
    /// Build configuration from process environment variables.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `TMDB_API_KEY` (required) | `client.api_key` |
    /// | `TMDB_BASE_URL` | `client.base_url` |
    /// | `TMDB_LANGUAGE` | `client.language` |
    /// | `CINEBOT_DEBOUNCE_MS` | `debounce` |
    /// | `CINEBOT_LOG` | `log_filter` |
    ///
    /// # Errors
    /// `CinebotError::Config` when the key is missing or a number is malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`AppConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.client.api_key = lookup("TMDB_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CinebotError::Config("TMDB_API_KEY is not set".to_string()))?;

        if let Some(base_url) = lookup("TMDB_BASE_URL") {
            config.client.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(language) = lookup("TMDB_LANGUAGE") {
            config.client.language = language;
        }
        if let Some(millis) = lookup("CINEBOT_DEBOUNCE_MS") {
            let millis: u64 = millis.trim().parse().map_err(|_| {
                CinebotError::Config(format!("CINEBOT_DEBOUNCE_MS is not a number: {}", millis))
            })?;
            config.debounce = Duration::from_millis(millis);
        }
        config.log_filter = lookup("CINEBOT_LOG");

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.debounce, Duration::from_millis(500));
        assert_eq!(config.page_window, 5);
        assert_eq!(config.max_total_pages, 20);
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn test_from_lookup_requires_api_key() {
        let result = AppConfig::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(CinebotError::Config(_))));

        let result = AppConfig::from_lookup(lookup(&[("TMDB_API_KEY", "  ")]));
        assert!(matches!(result, Err(CinebotError::Config(_))));
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("TMDB_API_KEY", "secret"),
            ("TMDB_BASE_URL", "http://localhost:8080/"),
            ("TMDB_LANGUAGE", "en-US"),
            ("CINEBOT_DEBOUNCE_MS", "250"),
            ("CINEBOT_LOG", "cinebot_core=debug"),
        ]))
        .unwrap();

        assert_eq!(config.client.api_key, "secret");
        assert_eq!(config.client.base_url, "http://localhost:8080");
        assert_eq!(config.client.language, "en-US");
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert_eq!(config.log_filter.as_deref(), Some("cinebot_core=debug"));
    }

    #[test]
    fn test_from_lookup_rejects_bad_debounce() {
        let result = AppConfig::from_lookup(lookup(&[
            ("TMDB_API_KEY", "secret"),
            ("CINEBOT_DEBOUNCE_MS", "soon"),
        ]));
        assert!(matches!(result, Err(CinebotError::Config(_))));
    }
}
