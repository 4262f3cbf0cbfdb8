//! HTTP Client port

use async_trait::async_trait;
use loancheck_domain::{PreparedRequest, response::ResponseSpec};
use thiserror::Error;

/// Failure below the HTTP-response level.
///
/// A transport error means no response was received; it is never turned
/// into a synthetic response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("DNS resolution failed for {host}: {message}")]
    Dns {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection could not be established for another reason.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// TLS handshake or certificate failure.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The URL was rejected by the client.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Redirect limit exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// Any other transport-level failure, including a body that could not be read.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// Implementations perform exactly one attempt per call and honour
/// `PreparedRequest::timeout`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` if no response was received.
    async fn execute(&self, request: &PreparedRequest) -> Result<ResponseSpec, TransportError>;
}
