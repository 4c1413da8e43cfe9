//! Error types for record-set lifecycle operations
//!
//! All operations in this crate return [`Result`]. Errors coming back from the
//! DNS API client are carried unchanged so callers see the server's status code
//! and message.

use std::time::Duration;

use thiserror::Error;

use crate::types::{RecordSetChange, RecordType};

/// Result type alias for record-set operations
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP status the API uses for resources that do not exist (yet)
pub const STATUS_NOT_FOUND: u16 = 404;

/// Rejections produced by the record translator before anything is submitted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Record type that cannot be managed through this path
    #[error("{record_type} records are not currently supported")]
    Unsupported { record_type: RecordType },

    /// CNAME target that is empty or not fully qualified
    #[error("record_cname must end in trailing '.', got {cname:?}")]
    MalformedCName { cname: String },

    /// The value shape does not match the record type
    #[error("{record_type} records take {expected}")]
    MismatchedValue {
        record_type: RecordType,
        expected: &'static str,
    },
}

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Record set description rejected before submission
    #[error("Invalid record set: {0}")]
    Validation(#[from] ValidationError),

    /// Structured error returned by the DNS API
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP-like status code
        status: u16,
        /// Error message or response body
        message: String,
    },

    /// The server reported the change as failed
    #[error("record set status Failed (change {change_id})")]
    ChangeFailed {
        /// Change that failed
        change_id: String,
        /// Raw change object, kept for diagnostics
        change: Box<RecordSetChange>,
    },

    /// The change reported a status outside the pending and target sets
    #[error("unexpected change status {status:?} for change {change_id}, wanted \"Complete\"")]
    UnexpectedStatus {
        /// Change being polled
        change_id: String,
        /// Raw status string
        status: String,
    },

    /// The change was still pending when the wait budget ran out
    #[error("timeout after {elapsed:?} waiting for change {change_id} to complete")]
    Timeout {
        /// Change being polled
        change_id: String,
        /// Time spent waiting
        elapsed: Duration,
    },

    /// Resource state store errors
    #[error("State store error: {0}")]
    StateStore(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP failures (no response received)
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an API error with a status code
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a 404 API error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::api(STATUS_NOT_FOUND, message)
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Status code of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the API reported the resource as absent
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(STATUS_NOT_FOUND)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
