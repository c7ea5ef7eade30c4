//! Client error types
//!
//! Every failure a completion call can produce maps onto one of these
//! variants. Callers match on them to tell misconfiguration apart from
//! transient transport problems.

use thiserror::Error;

/// The error type for all language-model clients
#[derive(Error, Debug)]
pub enum ClientError {
    /// Required settings are missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request was rejected before any I/O happened
    #[error("Validation error: {0}")]
    Validation(String),

    /// Connect, timeout or transport failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// The upstream returned HTTP 429
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Any other upstream failure
    #[error("API error{}: {message}", .status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    Api { status: Option<u16>, message: String },
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => *status,
            ClientError::RateLimited(_) => Some(429),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            ClientError::Connection(err.to_string())
        } else if err.is_decode() {
            ClientError::Api {
                status: err.status().map(|s| s.as_u16()),
                message: format!("Malformed response body: {}", err),
            }
        } else {
            ClientError::Api {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Configuration(format!("Invalid endpoint URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_includes_status() {
        let err = ClientError::Api {
            status: Some(500),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): boom");

        let err = ClientError::Api {
            status: None,
            message: "No response choices returned from the API".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error: No response choices returned from the API"
        );
    }

    #[test]
    fn test_error_status_code() {
        assert_eq!(ClientError::RateLimited("slow down".into()).status_code(), Some(429));
        assert_eq!(ClientError::Validation("empty".into()).status_code(), None);
    }
}
