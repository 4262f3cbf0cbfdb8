//! Request specification type

use serde::{Deserialize, Serialize};

use super::{Headers, HttpMethod, RequestBody};
use crate::testing::TestCase;

/// Fully specified request, ready for execution against an environment.
///
/// The path is relative; the executor resolves it against the configured
/// base URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Name of the test case this request belongs to
    pub name: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the base URI (e.g. "/api/v1/loan/calculate")
    pub path: String,
    /// HTTP headers
    #[serde(default)]
    pub headers: Headers,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
}

impl RequestSpec {
    /// Creates a POST request with a body.
    #[must_use]
    pub fn post(name: impl Into<String>, path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            name: name.into(),
            method: HttpMethod::Post,
            path: path.into(),
            headers: Headers::new(),
            body,
        }
    }

    /// Creates a GET request without a body.
    #[must_use]
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: HttpMethod::Get,
            path: path.into(),
            headers: Headers::new(),
            body: RequestBody::empty(),
        }
    }

    /// Builds the request described by a test case.
    #[must_use]
    pub fn from_case(case: &TestCase) -> Self {
        Self {
            name: case.name.clone(),
            method: case.method,
            path: case.path.clone(),
            headers: case.headers.clone(),
            body: case.body.clone(),
        }
    }
}
