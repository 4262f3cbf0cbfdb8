//! Execute Request Use Case
//!
//! Resolves a request against the environment, sends it once and returns
//! the response or the reason no response was received.

use std::sync::Arc;

use loancheck_domain::{
    DomainError, Environment, PreparedRequest, RequestSpec, response::ResponseSpec,
};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::ports::{HttpClient, TransportError};

/// Result type for request execution.
pub type ExecuteResult = Result<ResponseSpec, ExecuteRequestError>;

/// Error type for the execute request use case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecuteRequestError {
    /// The path does not resolve to a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The body could not be encoded as JSON.
    #[error("Invalid body: {0}")]
    InvalidBody(String),

    /// A header cannot be sent.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// No response was received.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
}

impl ExecuteRequestError {
    /// Returns true for failures below the HTTP-response level.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<DomainError> for ExecuteRequestError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidBody(msg) => Self::InvalidBody(msg),
            invalid @ DomainError::InvalidHeader { .. } => Self::InvalidHeader(invalid.to_string()),
            other => Self::InvalidUrl(other.to_string()),
        }
    }
}

/// Use case for executing HTTP requests.
///
/// One attempt per call, no retry. The call is bounded by the environment
/// timeout even if the client ignores it.
///
/// # Example
///
/// ```ignore
/// let use_case = ExecuteRequest::new(Arc::new(ReqwestHttpClient::new()?));
/// let prepared = use_case.prepare(&environment, &request)?;
/// let response = use_case.send(&prepared).await?;
/// ```
pub struct ExecuteRequest<C: HttpClient> {
    client: Arc<C>,
}

impl<C: HttpClient> Clone for ExecuteRequest<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: HttpClient> ExecuteRequest<C> {
    /// Creates a new `ExecuteRequest` use case with the given HTTP client.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Resolves the request against the environment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl`, `InvalidBody` or `InvalidHeader` if the request
    /// cannot be built.
    pub fn prepare(
        &self,
        environment: &Environment,
        request: &RequestSpec,
    ) -> Result<PreparedRequest, ExecuteRequestError> {
        Ok(PreparedRequest::resolve(request, environment)?)
    }

    /// Sends a prepared request.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if no response was received in time.
    #[instrument(
        skip_all,
        fields(case = %request.name, method = %request.method, url = %request.url)
    )]
    pub async fn send(&self, request: &PreparedRequest) -> ExecuteResult {
        let timeout_ms = u64::try_from(request.timeout.as_millis()).unwrap_or(u64::MAX);

        let response = tokio::time::timeout(request.timeout, self.client.execute(request))
            .await
            .map_err(|_| TransportError::Timeout { timeout_ms })??;

        debug!(status = response.status, "response received");
        Ok(response)
    }

    /// Prepares and sends a request in one step.
    ///
    /// # Errors
    ///
    /// Returns `ExecuteRequestError` on build or transport failures.
    pub async fn execute(&self, environment: &Environment, request: &RequestSpec) -> ExecuteResult {
        let prepared = self.prepare(environment, request)?;
        self.send(&prepared).await
    }
}
