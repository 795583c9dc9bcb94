use thiserror::Error;

use crate::report::{Severity, StatusMessage};

/// Error type that captures the failure modes of the finance core.
#[derive(Debug, Error)]
pub enum FinanceError {
    /// Rejected input: non-positive amount where one is required, unknown
    /// enum token, missing required field.
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// An id prefix matched more than one record; never resolved by an
    /// arbitrary pick.
    #[error("id prefix `{0}` is ambiguous")]
    AmbiguousId(String),
    #[error("duplicate id: {0}")]
    Duplicate(String),
    #[error("repository error: {0}")]
    Repository(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type FinanceResult<T> = Result<T, FinanceError>;

impl FinanceError {
    /// Severity used when the failure degrades to a user-facing message.
    pub fn severity(&self) -> Severity {
        match self {
            FinanceError::NotFound(_) | FinanceError::AmbiguousId(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn to_message(&self) -> StatusMessage {
        StatusMessage {
            text: self.to_string(),
            severity: self.severity(),
        }
    }
}
