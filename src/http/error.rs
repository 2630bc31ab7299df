//! API client errors.

use thiserror::Error;

use crate::signing::SigningError;

/// Message shown to end users when a call fails for a reason they cannot act on.
pub const CONNECTION_FAILED_MESSAGE: &str =
    "Failed to connect to the server. Please check your connection and try again.";

/// Errors raised by [`crate::http::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The endpoint does not use `https`. Nothing was sent.
    #[error("Only HTTPS endpoints are allowed (got {0})")]
    Security(String),

    /// The endpoint is not a valid absolute URL.
    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("request signing failed: {0}")]
    Signing(#[from] SigningError),

    /// No response arrived within the deadline (milliseconds).
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Connection, TLS or body read failure.
    #[error("network error: {0}")]
    Network(String),

    #[error("failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Security(_) => "security",
            ApiError::InvalidEndpoint { .. } => "invalid_endpoint",
            ApiError::Signing(_) => "signing",
            ApiError::Timeout(_) => "timeout",
            ApiError::Network(_) => "network",
            ApiError::Serialization(_) => "serialization",
            ApiError::InvalidResponse(_) => "invalid_response",
        }
    }

    /// Text safe to show to an end user. Details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        CONNECTION_FAILED_MESSAGE
    }
}
