//! Error types for the marketing API client.
//!
//! # Design
//! Every failure a call can produce is one `ApiError` variant. Errors the
//! server reports are split by whether the body matched the problem-detail
//! shape: `Api` carries the parsed payload, `Http` the raw text. Failures
//! that never produced a status code live under `Transport` so a dropped
//! connection can't be mistaken for a server answer.

use serde::{Deserialize, Serialize};

/// Errors returned by `Client` calls and entity operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required identity field was empty, or the entity carries no client.
    /// Raised before any network activity.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The exchange never completed, so there is no status code.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-2xx response whose body is a problem-detail document. `status`
    /// is the observed HTTP status, which may differ from `problem.status`.
    #[error("HTTP {status}: {} ({})", .problem.title, .problem.detail)]
    Api { status: u16, problem: ProblemDetail },

    /// Non-2xx response with a body that isn't a problem-detail document.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// 2xx response whose body doesn't match the expected shape.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client could not be configured.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// The HTTP status observed on the wire, if the exchange got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } | ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The parsed problem-detail payload, for structured errors.
    pub fn problem(&self) -> Option<&ProblemDetail> {
        match self {
            ApiError::Api { problem, .. } => Some(problem),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}

/// Failures below HTTP: nothing came back from the server.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Problem-detail document the service returns on failure.
///
/// `type`, `title` and `status` must be present for a body to count as a
/// problem detail; the rest default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: i64,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub instance: String,
    /// Per-field messages attached to validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub message: String,
}
