//! Execution boundary error types.

use pexec_domain::{DomainError, ExecutorKind};
use thiserror::Error;

/// Errors that can occur at the executor boundary.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Domain error (validation or rejected state transition)
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// No factory registered for the executor kind
    #[error("No executor registered for kind: {0}")]
    UnknownExecutor(ExecutorKind),

    /// A factory for this kind is already registered
    #[error("Executor already registered for kind: {0}")]
    DuplicateExecutor(ExecutorKind),

    /// Operation not valid in the executor's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl ExecError {
    /// True if the error came from the status transition guard
    pub fn is_rejected_transition(&self) -> bool {
        matches!(self, ExecError::Domain(DomainError::InvalidStateTransition(_)))
    }
}

/// Result type for execution operations.
pub type ExecResult<T> = Result<T, ExecError>;
