//! Unified Error Type System
//!
//! Centralized error types for the entire application, with rate-limit
//! classification used by the retrying completion client.
//!
//! ## Design Principles
//!
//! - Single unified error type (`WikiError`) for the entire application
//! - Structured variants with context for better debugging
//! - Message/status-based rate-limit detection for retry decisions
//! - No panic/unwrap - all errors are recoverable

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, WikiError>;

#[derive(Debug, Error)]
pub enum WikiError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Provider Errors
    // -------------------------------------------------------------------------
    /// Error returned by a model provider call
    #[error("{provider} API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Api {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    /// All retry attempts were spent on rate-limited calls
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        source: Box<WikiError>,
    },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl WikiError {
    /// Create a provider API error from a plain message.
    pub fn api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Create a provider API error carrying the HTTP status code.
    pub fn api_status(
        provider: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        Self::Api {
            provider: provider.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Whether this error signals a rate-limit condition from the provider.
    ///
    /// HTTP 429 is authoritative; otherwise the message text is inspected
    /// for the markers providers commonly emit.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Self::Api {
                status: Some(429), ..
            } => true,
            Self::Api { message, .. } => is_rate_limit_message(message),
            _ => false,
        }
    }
}

/// Heuristic rate-limit detection over an error message.
pub fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("rate limit")
        || lower.contains("429")
        || lower.contains("too many requests")
        || lower.contains("quota exceeded")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_429_is_rate_limit() {
        let err = WikiError::api_status("openai", 429, "slow down");
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_message_markers_are_rate_limit() {
        for message in [
            "Rate limit reached for requests",
            "HTTP 429 returned",
            "Too Many Requests",
            "quota exceeded for this month",
        ] {
            let err = WikiError::api("openai", message);
            assert!(err.is_rate_limit(), "expected rate limit for: {message}");
        }
    }

    #[test]
    fn test_other_errors_are_not_rate_limit() {
        assert!(!WikiError::api("openai", "invalid api key").is_rate_limit());
        assert!(!WikiError::api_status("openai", 500, "server error").is_rate_limit());
        assert!(!WikiError::Config("bad value".to_string()).is_rate_limit());
    }

    #[test]
    fn test_api_error_display_includes_status() {
        let err = WikiError::api_status("openai", 429, "slow down");
        let rendered = err.to_string();
        assert!(rendered.contains("openai"));
        assert!(rendered.contains("429"));
    }
}
