//! Rate-limited HTTP client for the TMDB REST API
//!
//! This module provides the thin transport layer: it issues GET requests
//! with the API key, locale and page parameters attached, and turns
//! responses into parsed JSON or a typed error.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::error::{CinebotError, Result};

/// Base URL for TMDB v3
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Base URL for TMDB images
pub const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Image shown when an item has no poster
pub const PLACEHOLDER_POSTER: &str = "/placeholder.jpg";

/// Full image URL for a TMDB poster path, or the placeholder when absent.
pub fn poster_url(image_base_url: &str, path: Option<&str>, size: &str) -> String {
    match path {
        Some(path) if !path.is_empty() => format!("{}/{}{}", image_base_url.trim_end_matches('/'), size, path),
        _ => PLACEHOLDER_POSTER.to_string(),
    }
}

/// Default locale for titles and overviews
const DEFAULT_LANGUAGE: &str = "ru";

/// Rate limiter to control request frequency
///
/// Ensures that requests are spaced at least `min_interval` apart
/// to stay under TMDB's request quota.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// # Example
    /// ```
    /// use cinebot_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(4.0); // 4 requests per second
    /// ```
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = Duration::from_secs_f64(1.0 / requests_per_second);
        let now = Instant::now();
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(now.checked_sub(min_interval).unwrap_or(now))),
        }
    }

    /// Wait until the next request is allowed
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }

        *last = Instant::now();
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for the TMDB HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// TMDB v3 API key
    pub api_key: String,
    /// API root, overridable for tests (default: [`TMDB_BASE_URL`])
    pub base_url: String,
    /// Image root (default: [`TMDB_IMAGE_BASE_URL`])
    pub image_base_url: String,
    /// `language` query parameter (default: "ru")
    pub language: String,
    /// Maximum requests per second (default: 20.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: TMDB_BASE_URL.to_string(),
            image_base_url: TMDB_IMAGE_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            requests_per_second: 20.0,
            timeout_secs: 30,
        }
    }
}

/// Error body returned by TMDB on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    status_message: Option<String>,
    message: Option<String>,
}

/// HTTP client for TMDB with rate limiting
pub struct TmdbClient {
    client: reqwest::Client,
    rate_limiter: RateLimiter,
    config: ClientConfig,
}

impl TmdbClient {
    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// - `CinebotError::Config` - `requests_per_second` is not a positive number
    /// - `CinebotError::NetworkFailure` - the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        if !(config.requests_per_second.is_finite() && config.requests_per_second > 0.0) {
            return Err(CinebotError::Config(format!(
                "requests_per_second must be positive, got {}",
                config.requests_per_second
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let rate_limiter = RateLimiter::new(config.requests_per_second);

        Ok(Self {
            client,
            rate_limiter,
            config,
        })
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET `path` and decode the JSON body.
    ///
    /// `api_key` and `language` are always attached; `params` adds
    /// endpoint-specific ones such as `query` and `page`.
    ///
    /// # Errors
    /// - `CinebotError::NetworkFailure` - request could not complete
    /// - `CinebotError::ApiError` - non-2xx status, with the body's message when present
    /// - `CinebotError::Parse` - 2xx body was not the expected JSON
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        self.rate_limiter.acquire().await;

        let url = format!("{}{}", self.config.base_url, path);
        let mut query: Vec<(&str, String)> = vec![
            ("api_key", self.config.api_key.clone()),
            ("language", self.config.language.clone()),
        ];
        query.extend(params.iter().cloned());

        tracing::debug!(path, "TMDB request");
        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            tracing::warn!(path, status = status.as_u16(), %message, "TMDB request failed");
            return Err(CinebotError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| CinebotError::Parse(e.to_string()))
    }

    /// Full image URL for a poster path, or the placeholder when absent.
    ///
    /// Common sizes: "w92", "w185", "w342", "w500", "original"
    pub fn poster_url(&self, path: Option<&str>, size: &str) -> String {
        poster_url(&self.config.image_base_url, path, size)
    }

    /// Get a reference to the rate limiter (for testing)
    #[cfg(test)]
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

/// Pull the human-readable message out of an error body
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| {
            [body.status_message, body.message]
                .into_iter()
                .flatten()
                .find(|message| !message.trim().is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_creation() {
        let limiter = RateLimiter::new(2.0);
        assert_eq!(limiter.min_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_rate_limiter_different_rates() {
        let limiter = RateLimiter::new(1.0);
        assert_eq!(limiter.min_interval(), Duration::from_secs(1));

        let limiter = RateLimiter::new(4.0);
        assert_eq!(limiter.min_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, TMDB_BASE_URL);
        assert_eq!(config.language, "ru");
        assert_eq!(config.requests_per_second, 20.0);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_client_creation() {
        let client = TmdbClient::with_config(ClientConfig::default());
        assert!(client.is_ok());
        let client = client.unwrap();
        assert_eq!(client.rate_limiter().min_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_poster_url() {
        let client = TmdbClient::with_config(ClientConfig::default()).unwrap();
        assert_eq!(
            client.poster_url(Some("/abc.jpg"), "w500"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(client.poster_url(None, "w500"), PLACEHOLDER_POSTER);
        assert_eq!(client.poster_url(Some(""), "w500"), PLACEHOLDER_POSTER);
    }

    #[test]
    fn test_error_message_reads_status_message() {
        let body = r#"{"status_code":7,"status_message":"Invalid API key","success":false}"#;
        assert_eq!(error_message(body).as_deref(), Some("Invalid API key"));
    }

    #[test]
    fn test_error_message_reads_message_field() {
        let body = r#"{"message":"Service unavailable"}"#;
        assert_eq!(error_message(body).as_deref(), Some("Service unavailable"));
    }

    #[test]
    fn test_error_message_prefers_status_message() {
        let body = r#"{"message":"Unauthorized","status_message":"Invalid API key"}"#;
        assert_eq!(error_message(body).as_deref(), Some("Invalid API key"));

        let body = r#"{"message":"Unauthorized","status_message":" "}"#;
        assert_eq!(error_message(body).as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn test_non_positive_rate_is_rejected() {
        for rate in [0.0, -4.0, f64::NAN, f64::INFINITY] {
            let result = TmdbClient::with_config(ClientConfig {
                requests_per_second: rate,
                ..Default::default()
            });
            assert!(matches!(result, Err(CinebotError::Config(_))), "rate {rate} accepted");
        }
    }

    #[test]
    fn test_error_message_missing() {
        assert_eq!(error_message("<html>bad gateway</html>"), None);
        assert_eq!(error_message(r#"{"success":false}"#), None);
    }

    #[tokio::test]
    async fn test_rate_limiter_acquire() {
        let limiter = RateLimiter::new(10.0);

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
