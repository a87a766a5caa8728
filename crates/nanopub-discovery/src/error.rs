//! Error types for nanopublication discovery.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Every [`EndpointError`] is soft: the orchestrator logs it and moves on to the next
//! endpoint, so none of these ever reach a `discover` caller.

use std::time::Duration;

/// Maximum number of body characters kept in an error for log context.
pub const BODY_SNIPPET_CHARS: usize = 200;

/// Coarse classification of an endpoint failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Network failure or timeout.
    Transport,
    /// Non-2xx HTTP status.
    Http,
    /// Empty, non-JSON or wrong-shape body.
    Format,
}

/// Errors from a single endpoint call.
#[derive(thiserror::Error, Debug)]
pub enum EndpointError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-2xx response
    #[error("HTTP status {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// First bytes of the response body
        body: String,
    },

    /// Response body could not be used
    #[error("Unusable response ({reason}): {snippet:?}")]
    Format {
        /// What was wrong with the body
        reason: String,
        /// First bytes of the response body
        snippet: String,
    },
}

impl EndpointError {
    /// Create an HTTP status error, truncating the body.
    #[must_use]
    pub fn http(status: u16, body: &str) -> Self {
        Self::Http { status, body: snippet(body) }
    }

    /// Create a format error, truncating the body.
    #[must_use]
    pub fn format(reason: impl Into<String>, body: &str) -> Self {
        Self::Format { reason: reason.into(), snippet: snippet(body) }
    }

    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Timeout(_) => ErrorKind::Transport,
            Self::Http { .. } => ErrorKind::Http,
            Self::Format { .. } => ErrorKind::Format,
        }
    }

    /// Returns true if discovery should continue with the next endpoint.
    ///
    /// There is no fatal endpoint error; this always holds.
    #[must_use]
    pub const fn is_soft(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Http | ErrorKind::Format)
    }

    /// HTTP status code, if the endpoint answered with one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised while assembling configuration or the HTTP client.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Endpoint URL did not parse
    #[error("Invalid endpoint URL '{url}': {source}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Parser error
        source: url::ParseError,
    },

    /// Environment variable held an unusable value
    #[error("Invalid value for {name}: {value}")]
    InvalidValue {
        /// Variable name
        name: String,
        /// Raw value
        value: String,
    },

    /// Neither primary nor legacy endpoints were configured
    #[error("No endpoints configured")]
    NoEndpoints,

    /// HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl ConfigError {
    /// Create an invalid value error.
    #[must_use]
    pub fn invalid_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue { name: name.into(), value: value.into() }
    }
}

/// Result type alias for endpoint calls.
pub type EndpointResult<T> = Result<T, EndpointError>;

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(EndpointError::Timeout(Duration::from_secs(30)).kind(), ErrorKind::Transport);
        assert_eq!(EndpointError::http(503, "unavailable").kind(), ErrorKind::Http);
        assert_eq!(EndpointError::format("empty body", "").kind(), ErrorKind::Format);
    }

    #[test]
    fn test_all_endpoint_errors_are_soft() {
        assert!(EndpointError::Timeout(Duration::from_secs(1)).is_soft());
        assert!(EndpointError::http(500, "boom").is_soft());
        assert!(EndpointError::format("not json", "<html>").is_soft());
    }

    #[test]
    fn test_body_is_truncated() {
        let body = "x".repeat(BODY_SNIPPET_CHARS * 3);
        let err = EndpointError::http(502, &body);
        match err {
            EndpointError::Http { body, .. } => assert_eq!(body.len(), BODY_SNIPPET_CHARS),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(EndpointError::http(404, "").status(), Some(404));
        assert_eq!(EndpointError::format("empty body", "").status(), None);
    }
}
