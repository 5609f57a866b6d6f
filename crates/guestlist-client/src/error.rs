//! Client error types.

use thiserror::Error;

use crate::validation::FieldError;

/// Message used when a failed response carries no usable `message` field.
pub const GENERIC_FAILURE: &str = "Request failed";

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Request {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, or a generic fallback.
        message: String,
    },

    /// The session could not be recovered by a token refresh.
    ///
    /// The session has already been torn down when this is returned.
    #[error("session expired")]
    SessionExpired,

    /// Client-side form validation failed.
    #[error("validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Request { status: 404, .. })
    }

    /// Check if the caller must sign in again.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Error::SessionExpired)
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Request { status, .. } if *status >= 500)
    }

    /// Message suitable for showing to the operator.
    pub fn user_message(&self) -> String {
        match self {
            Error::Request { message, .. } => message.clone(),
            Error::SessionExpired => "Session expired, please sign in again".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the admin API.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Why a refresh attempt did not renew the session.
///
/// Never surfaced to callers directly; it is converted into
/// [`Error::SessionExpired`] after the session is torn down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// The refresh endpoint answered with a non-2xx status.
    #[error("refresh rejected with HTTP {0}")]
    Rejected(u16),

    /// The refresh call failed before a response arrived.
    #[error("refresh transport error: {0}")]
    Transport(String),

    /// The refresh call did not settle within the configured bound.
    #[error("refresh timed out")]
    TimedOut,
}
