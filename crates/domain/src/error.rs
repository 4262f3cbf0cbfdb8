//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported by the harness.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request body is not valid JSON.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// A header name or value cannot be sent over HTTP.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader {
        /// The header name as given.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A response field path could not be parsed.
    #[error("invalid field path '{path}': {reason}")]
    InvalidFieldPath {
        /// The offending path.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No environment contract is known under this name.
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    /// The environment contract has no base URI and none was supplied.
    #[error("environment '{0}' has no base URI configured")]
    MissingBaseUri(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
