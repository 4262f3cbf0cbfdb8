//! Application error types

use loancheck_domain::DomainError;
use thiserror::Error;

use crate::execute_request::ExecuteRequestError;

/// The environment is missing, conflicting or cannot be loaded.
///
/// Fatal for the whole run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No environment was set before the first request.
    #[error("environment not configured; set it before running the suite")]
    NotConfigured,

    /// A different environment was already set for this run.
    #[error("environment already configured as '{current}', refusing to switch to '{attempted}'")]
    AlreadyConfigured {
        /// Environment in effect.
        current: String,
        /// Environment that was refused.
        attempted: String,
    },

    /// The environment definition is invalid.
    #[error("invalid environment: {0}")]
    Domain(#[from] DomainError),

    /// Contract or settings could not be loaded.
    #[error("failed to load configuration: {0}")]
    Load(String),
}

/// A suite run that could not start.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    /// Configuration problem; no request was sent.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
}

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Configuration problem.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A request could not be executed.
    #[error("execution error: {0}")]
    Execute(#[from] ExecuteRequestError),

    /// A suite run could not start.
    #[error("run error: {0}")]
    Run(#[from] RunError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
