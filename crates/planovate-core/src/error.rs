//! Error types for planovate.

use thiserror::Error;

use crate::models::{AssetId, AssetRole, MissingField, WorkflowPhase};

/// Result type alias using planovate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for planovate operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Required input missing; never sent to a remote collaborator
    #[error("Missing required field(s): {}", join_fields(.missing))]
    Validation { missing: Vec<MissingField> },

    /// Analysis service call failed or returned non-success
    #[error("Analysis error: {detail}")]
    Analysis { status: Option<u16>, detail: String },

    /// One of the two asset uploads failed during commit
    #[error("Upload error ({asset}): {message}")]
    Upload { asset: AssetRole, message: String },

    /// Record creation failed after both uploads succeeded
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
        orphaned: Vec<AssetId>,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A call is already in flight for this workflow instance
    #[error("Workflow busy: {0} in progress")]
    Busy(WorkflowPhase),

    /// Operation not allowed in the current phase
    #[error("Cannot {operation} while {phase}")]
    InvalidState {
        operation: &'static str,
        phase: WorkflowPhase,
    },

    /// A response arrived for a workflow run that was abandoned
    #[error("Workflow run superseded; response discarded")]
    Superseded,

    /// Authentication/authorization failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of errors for the interactive surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Analysis,
    Upload,
    Persistence,
    NotFound,
    Workflow,
    Other,
}

impl Error {
    pub(crate) fn malformed_analysis(detail: String) -> Self {
        Error::Analysis {
            status: None,
            detail: format!("Malformed analysis result: {}", detail),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Analysis { .. } => ErrorKind::Analysis,
            Error::Upload { .. } => ErrorKind::Upload,
            Error::Persistence { .. } => ErrorKind::Persistence,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Busy(_) | Error::InvalidState { .. } | Error::Superseded => {
                ErrorKind::Workflow
            }
            _ => ErrorKind::Other,
        }
    }

    /// Whether repeating the same operation later may succeed.
    ///
    /// Validation errors need different input, so they are not retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Analysis { status, .. } => match status {
                None => true,
                Some(code) => *code == 429 || *code >= 500,
            },
            Error::Upload { .. } | Error::Persistence { .. } | Error::Busy(_) => true,
            Error::Request(_) => true,
            _ => false,
        }
    }
}

fn join_fields(fields: &[MissingField]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
