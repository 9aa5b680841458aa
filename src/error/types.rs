//! Error taxonomy for the request pipeline
//!
//! The four core failure classes (`Concurrency`, `Transport`, `Authentication`,
//! `Challenge`) are distinguishable by variant so callers can branch without
//! string inspection. Nothing here is retried internally; the pipeline fails
//! fast and leaves the decision to the caller.

use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error)]
pub enum Error {
    /// Another operation already holds the request gate.
    ///
    /// Deliberate fail-fast policy: the caller must abandon the whole operation
    /// and may retry later at its own discretion. Attempts are never queued.
    #[error("another request is already in flight")]
    Concurrency,

    /// Non-2xx HTTP status from the service
    #[error("transport failure: HTTP status {status}")]
    Transport {
        /// The HTTP status code returned by the service
        status: u16,
    },

    /// The service rejected the session token pair.
    ///
    /// The caller is expected to re-authenticate before retrying.
    #[error("authentication failure: session token rejected")]
    Authentication,

    /// The service served a bot-verification page.
    ///
    /// Unrecoverable without human intervention; never retried.
    #[error("bot challenge required: manual verification needed")]
    Challenge,

    /// HTTP request errors from the underlying client
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error in {field}: {message}")]
    Config {
        /// The configuration field that has an error
        field: String,
        /// Error message describing the issue
        message: String,
    },

    /// Token store errors
    #[error("Token store error during {operation}: {details}")]
    TokenStore {
        /// The store operation that failed
        operation: String,
        /// Detailed error description
        details: String,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a transport error from an HTTP status code
    pub fn transport(status: u16) -> Self {
        Self::Transport { status }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(field: S, message: S) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a token store error
    pub fn token_store<S: Into<String>>(operation: S, details: S) -> Self {
        Self::TokenStore {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Whether the caller may usefully retry after re-authenticating
    pub fn needs_reauthentication(&self) -> bool {
        matches!(self, Error::Authentication)
    }

    /// Whether the failure requires human intervention
    pub fn needs_human(&self) -> bool {
        matches!(self, Error::Challenge)
    }

    /// Get error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Error::Concurrency => "concurrency",
            Error::Transport { .. } => "transport",
            Error::Authentication => "authentication",
            Error::Challenge => "challenge",
            Error::Http(..) => "http",
            Error::Json(..) => "json",
            Error::Toml(..) => "toml",
            Error::Url(..) => "url",
            Error::Io(..) => "io",
            Error::Config { .. } => "config",
            Error::TokenStore { .. } => "token_store",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_carries_status() {
        let err = Error::transport(502);
        assert!(matches!(err, Error::Transport { status: 502 }));
        assert_eq!(err.to_string(), "transport failure: HTTP status 502");
    }

    #[test]
    fn test_concurrency_error_message() {
        let err = Error::Concurrency;
        assert_eq!(err.to_string(), "another request is already in flight");
        assert_eq!(err.category(), "concurrency");
    }

    #[test]
    fn test_core_failures_distinguishable_by_variant() {
        // Callers branch on variants, never on message text
        assert!(Error::Authentication.needs_reauthentication());
        assert!(!Error::Challenge.needs_reauthentication());
        assert!(Error::Challenge.needs_human());
        assert!(!Error::transport(503).needs_human());
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("service.host", "unknown host alias");
        assert!(matches!(err, Error::Config { .. }));
        assert_eq!(
            err.to_string(),
            "Configuration error in service.host: unknown host alias"
        );
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
        assert_eq!(err.category(), "json");
    }

    #[test]
    fn test_error_from_url_parse() {
        let url_err = url::Url::parse("not a url");
        assert!(url_err.is_err());

        let err: Error = url_err.unwrap_err().into();
        assert!(matches!(err, Error::Url(_)));
    }

    #[test]
    fn test_token_store_error() {
        let err = Error::token_store("save", "disk full");
        assert!(matches!(err, Error::TokenStore { .. }));
        assert!(err.to_string().contains("Token store error"));
    }
}
