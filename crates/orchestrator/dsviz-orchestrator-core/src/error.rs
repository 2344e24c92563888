use thiserror::Error;

use dsviz_api_core::{CallError, StructureKind};

use crate::status::Severity;

/// Why an operation did not start. None of these leave partial state behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// Rejected before any engine call.
    #[error("{0}")]
    InvalidInput(String),
    /// The engine answered with `action: "error"` or failed to answer.
    #[error("{0}")]
    Engine(String),
    #[error("Failed to parse engine response: {0}")]
    Malformed(String),
    #[error("An animation is already running.")]
    Busy,
    #[error("{} not initialized.", .0.label())]
    NotInitialized(StructureKind),
}

impl OperationError {
    /// Severity of the status line reporting this error.
    pub fn severity(&self) -> Severity {
        match self {
            OperationError::InvalidInput(_) | OperationError::Busy => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl From<CallError> for OperationError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::Engine(e) => OperationError::Engine(e.to_string()),
            CallError::Wire(e) => OperationError::Malformed(e.to_string()),
        }
    }
}
