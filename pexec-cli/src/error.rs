//! CLI error types.

use pexec_domain::DomainError;
use pexec_exec::ExecError;
use thiserror::Error;

/// CLI-level errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Domain error
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Execution error
    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),

    /// Reading the executor config failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Executor config JSON is malformed or invalid
    #[error("Invalid executor config: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
