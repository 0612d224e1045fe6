//! Error types for Cinebot
//!
//! This module defines all error types used throughout the library.
//! CinebotError implements Serialize so it can cross the host boundary as text.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Message shown when a request never produced a usable response.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to load data, please try again";

/// Error type for Cinebot operations
#[derive(Error, Debug)]
pub enum CinebotError {
    /// Request could not complete (connection, timeout, TLS, body read)
    #[error("Network request failed: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    /// Upstream API answered with a non-2xx status
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Response body was not the JSON we expected
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// Category key outside the fixed table
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Telegram host bridge is not present
    #[error("Telegram host unavailable: {0}")]
    HostUnavailable(String),

    /// Missing or malformed configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CinebotError {
    /// Text stored in a state's `error` field for display.
    ///
    /// API errors surface the upstream message verbatim; everything else
    /// collapses into a generic failure string.
    pub fn user_message(&self) -> String {
        match self {
            CinebotError::ApiError { message, .. } => message.clone(),
            CinebotError::UnknownCategory(_)
            | CinebotError::HostUnavailable(_)
            | CinebotError::Config(_) => self.to_string(),
            CinebotError::NetworkFailure(_) | CinebotError::Parse(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

/// Serialize CinebotError as a string
impl Serialize for CinebotError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for Cinebot operations
pub type Result<T> = std::result::Result<T, CinebotError>;
