//! Error types for the Crossref client
//!
//! Every public API returns `Result<T, Error>`. Validation errors are raised
//! before any request is issued; network errors surface from the dispatcher
//! and are wrapped with the cursor position or identifier that failed.

use thiserror::Error;

/// The main error type for the Crossref client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("Unknown filter: {name}")]
    UnknownFilter { name: String },

    #[error("Invalid value for filter '{name}': {message}")]
    FilterValue { name: String, message: String },

    #[error("Unknown parameter: {name}")]
    UnknownParameter { name: String },

    #[error("Parameter '{name}' is not supported on /{resource}")]
    UnsupportedParameter { resource: String, name: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Network Errors
    // ============================================================================
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Position Context
    // ============================================================================
    #[error("Page {page} (cursor '{cursor}') failed: {source}")]
    AtCursor {
        cursor: String,
        page: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Request for '{id}' failed: {source}")]
    ForId {
        id: String,
        #[source]
        source: Box<Error>,
    },
}

/// The stage of a logical operation an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Parameter or filter validation, before any request
    Validation,
    /// Client configuration
    Config,
    /// A request on the wire
    Network,
}

impl Error {
    /// Create an unknown filter error
    pub fn unknown_filter(name: impl Into<String>) -> Self {
        Self::UnknownFilter { name: name.into() }
    }

    /// Create a filter value error
    pub fn filter_value(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FilterValue {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an unknown parameter error
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::UnknownParameter { name: name.into() }
    }

    /// Create an unsupported parameter error
    pub fn unsupported(resource: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnsupportedParameter {
            resource: resource.into(),
            name: name.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Wrap an error with the cursor position it occurred at
    pub fn at_cursor(self, cursor: impl Into<String>, page: usize) -> Self {
        Self::AtCursor {
            cursor: cursor.into(),
            page,
            source: Box::new(self),
        }
    }

    /// Wrap an error with the identifier it occurred for
    pub fn for_id(self, id: impl Into<String>) -> Self {
        Self::ForId {
            id: id.into(),
            source: Box::new(self),
        }
    }

    /// Strip position context and return the underlying error
    pub fn root(&self) -> &Error {
        match self {
            Error::AtCursor { source, .. } | Error::ForId { source, .. } => source.root(),
            other => other,
        }
    }

    /// Which stage of the operation failed
    pub fn stage(&self) -> Stage {
        match self.root() {
            Error::UnknownFilter { .. }
            | Error::FilterValue { .. }
            | Error::UnknownParameter { .. }
            | Error::UnsupportedParameter { .. }
            | Error::InvalidRequest { .. } => Stage::Validation,
            Error::Config { .. } | Error::Yaml(_) | Error::Io(_) => Stage::Config,
            _ => Stage::Network,
        }
    }

    /// Check if this error is worth retrying at the transport layer
    pub fn is_retryable(&self) -> bool {
        match self.root() {
            Error::Timeout { .. } => true,
            Error::Transport(e) => e.is_timeout() || e.is_connect(),
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the Crossref client
pub type Result<T> = std::result::Result<T, Error>;
