//! Failure taxonomy for the query lifecycle.
//!
//! `ServiceError` is what a `QueryService` reports; `ClassifiedError` is what
//! the lifecycle state carries to presentation.

use thiserror::Error;

pub const TIMEOUT_OR_CANCELLED_MESSAGE: &str =
    "Request timed out or was cancelled. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {detail}")]
    Http { status: u16, detail: String },
    #[error("non-JSON response (HTTP {status}): {excerpt}")]
    NonJson { status: u16, excerpt: String },
    #[error("empty response body (HTTP {status})")]
    EmptyBody { status: u16 },
    /// The request's abort handle fired before the service settled.
    #[error("request cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkError,
    HttpError { status: u16, detail: String },
    /// Deadline elapsed or the user cancelled; both share one message.
    Timeout,
    EmptyBody,
    NonJsonResponse { status: u16, excerpt: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    kind: ErrorKind,
    message: String,
}

impl ClassifiedError {
    pub fn timeout() -> Self {
        Self {
            kind: ErrorKind::Timeout,
            message: TIMEOUT_OR_CANCELLED_MESSAGE.to_string(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ServiceError> for ClassifiedError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Network(reason) => Self {
                kind: ErrorKind::NetworkError,
                message: format!(
                    "Unable to reach the query service ({reason}). Check your connection and try again."
                ),
            },
            ServiceError::Http { status, detail } => Self {
                message: format!("Server error ({status}): {detail}"),
                kind: ErrorKind::HttpError { status, detail },
            },
            ServiceError::NonJson { status, excerpt } => Self {
                message: format!("Unexpected non-JSON response from server ({status}): {excerpt}"),
                kind: ErrorKind::NonJsonResponse { status, excerpt },
            },
            ServiceError::EmptyBody { .. } => Self {
                kind: ErrorKind::EmptyBody,
                message: "Server returned an empty response. Please try again.".to_string(),
            },
            ServiceError::Cancelled => Self::timeout(),
        }
    }
}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
