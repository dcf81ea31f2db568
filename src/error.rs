//! Error types for twitch-rest
//!
//! Every public API returns `Result<T, Error>`. Response-derived failures
//! (`Format`, `Client`, `Server`) share a [`ResponseError`] payload carrying the
//! request URL, HTTP status and raw body so callers can decide their own policy.

use std::fmt;
use thiserror::Error;

/// Context captured from an HTTP response that could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseError {
    /// Human-readable description
    pub message: String,
    /// Request URL, including the query string
    pub url: String,
    /// HTTP status code returned by the server
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl ResponseError {
    /// Create a new response error
    pub fn new(
        message: impl Into<String>,
        url: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            url: url.into(),
            status,
            body: body.into(),
        }
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} from {}: {}", self.status, self.url, self.message)
    }
}

/// The main error type for twitch-rest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Precondition Errors
    // ============================================================================
    #[error("Invalid argument: {name}")]
    InvalidArgument { name: String },

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("Malformed response body: {0}")]
    Format(ResponseError),

    #[error("Client error: {0}")]
    Client(ResponseError),

    #[error("Server error: {0}")]
    Server(ResponseError),

    #[error("Response from {url} has no '{key}' items")]
    MissingItems { key: String, url: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(name: impl Into<String>) -> Self {
        Self::InvalidArgument { name: name.into() }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing items error
    pub fn missing_items(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self::MissingItems {
            key: key.into(),
            url: url.into(),
        }
    }

    /// Response context, if this error came from an HTTP response
    pub fn response(&self) -> Option<&ResponseError> {
        match self {
            Self::Format(r) | Self::Client(r) | Self::Server(r) => Some(r),
            _ => None,
        }
    }

    /// HTTP status of the failed response
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    /// Request URL of the failed response
    pub fn url(&self) -> Option<&str> {
        self.response().map(|r| r.url.as_str())
    }

    /// Check if this is a 4xx error
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Client(_))
    }

    /// Check if this is a 5xx error
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server(_))
    }

    /// Check if the server reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Client(r) if r.status == 404)
    }
}

/// Result type alias for twitch-rest
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
