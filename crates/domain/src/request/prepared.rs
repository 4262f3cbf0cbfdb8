//! Request resolved against an environment

use std::time::Duration;

use url::Url;

use super::{Header, Headers, HttpMethod, JSON_CONTENT_TYPE, RequestSpec};
use crate::environment::Environment;
use crate::error::DomainResult;

/// A request with everything filled in: absolute URL, merged headers,
/// encoded body and the timeout that bounds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// Test case name, for logging.
    pub name: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute target URL.
    pub url: Url,
    /// Request headers merged with the environment defaults.
    pub headers: Headers,
    /// Encoded JSON body.
    pub body: Option<String>,
    /// Upper bound for the call.
    pub timeout: Duration,
}

impl PreparedRequest {
    /// Resolves `request` against `environment`.
    ///
    /// Adds `Content-Type: application/json` when a body is present and the
    /// request does not set a content type itself.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the path does not resolve,
    /// `DomainError::InvalidBody` if the body is not valid JSON and
    /// `DomainError::InvalidHeader` if a header cannot be sent.
    pub fn resolve(request: &RequestSpec, environment: &Environment) -> DomainResult<Self> {
        let url = environment.resolve(&request.path)?;
        let body = request.body.encode()?;

        let mut headers = request.headers.merged_with(&environment.default_headers);
        if let Some(content_type) = request.body.content_type()
            && !headers.contains("content-type")
        {
            headers.add(Header::new("Content-Type", content_type));
        }
        for header in headers.iter() {
            header.validate()?;
        }

        Ok(Self {
            name: request.name.clone(),
            method: request.method,
            url,
            headers,
            body,
            timeout: environment.timeout,
        })
    }

    /// Returns true if the body is sent as JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.headers
            .get("content-type")
            .is_some_and(|ct| ct.starts_with(JSON_CONTENT_TYPE))
    }
}
