//! Declarative test cases.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Assertion, Comparator, StatusExpectation};
use crate::request::{Header, Headers, HttpMethod, RequestBody};

/// One request/expectation pair of a contract suite.
///
/// Built with the chained constructors at suite-authoring time and never
/// mutated afterwards:
///
/// ```
/// use loancheck_domain::testing::TestCase;
/// use serde_json::json;
///
/// let case = TestCase::post("valid loan", "/api/v1/loan/calculate")
///     .json(json!({"loanAmount": 1000, "loanPeriod": 6}))
///     .expect_status(200)
///     .greater_than("monthlyPayment", 0.0);
///
/// assert_eq!(case.assertions.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Test case name, unique within a suite.
    pub name: String,
    /// HTTP method
    #[serde(default)]
    pub method: HttpMethod,
    /// Path relative to the base URI
    pub path: String,
    /// Request headers
    #[serde(default)]
    pub headers: Headers,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
    /// Status the response must carry; checked before anything else.
    #[serde(default)]
    pub expected_status: StatusExpectation,
    /// Body assertions, evaluated in order.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
    /// Fields that must be identical when the request is issued twice.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repeat_check: Vec<String>,
}

impl TestCase {
    /// Creates a POST case with an empty body expecting 200.
    #[must_use]
    pub fn post(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Post, path)
    }

    /// Creates a GET case expecting 200.
    #[must_use]
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Get, path)
    }

    fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            headers: Headers::new(),
            body: RequestBody::empty(),
            expected_status: StatusExpectation::default(),
            assertions: Vec::new(),
            repeat_check: Vec::new(),
        }
    }

    /// Sets a structured JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::json(body);
        self
    }

    /// Sets a literal JSON body.
    #[must_use]
    pub fn raw(mut self, body: impl Into<String>) -> Self {
        self.body = RequestBody::raw(body);
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(Header::new(name, value));
        self
    }

    /// Expects an exact status.
    #[must_use]
    pub fn expect_status(mut self, status: u16) -> Self {
        self.expected_status = StatusExpectation::exact(status);
        self
    }

    /// Expects a status matching `expectation`.
    #[must_use]
    pub fn expect_status_in(mut self, expectation: StatusExpectation) -> Self {
        self.expected_status = expectation;
        self
    }

    /// Adds an assertion.
    #[must_use]
    pub fn assert(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Expects a field to equal `expected`.
    #[must_use]
    pub fn equals(self, path: impl Into<String>, expected: impl Into<Value>) -> Self {
        self.assert(Assertion::field(path, Comparator::Equals, expected.into()))
    }

    /// Expects a numeric field to be strictly above `threshold`.
    #[must_use]
    pub fn greater_than(self, path: impl Into<String>, threshold: impl Into<Value>) -> Self {
        self.assert(Assertion::field(
            path,
            Comparator::GreaterThan,
            threshold.into(),
        ))
    }

    /// Expects a field to be present and not null.
    #[must_use]
    pub fn exists(self, path: impl Into<String>) -> Self {
        self.assert(Assertion::field_exists(path))
    }

    /// Expects the raw body to contain `text`.
    #[must_use]
    pub fn body_contains(self, text: impl Into<String>) -> Self {
        self.assert(Assertion::BodyContains {
            text: text.into(),
            ignore_case: false,
        })
    }

    /// Expects `path` to come back identical when the request is repeated.
    #[must_use]
    pub fn stable(mut self, path: impl Into<String>) -> Self {
        self.repeat_check.push(path.into());
        self
    }
}
