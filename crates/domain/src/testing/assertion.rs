//! Assertions evaluated against a response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A check to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Compare a JSON field against a value.
    Field {
        /// Dotted path into the JSON body (e.g. "monthlyPayment", "data.items[0]").
        path: String,
        /// Comparison to apply.
        comparator: Comparator,
        /// Value to compare against (ignored by `Exists`).
        #[serde(default)]
        expected: Value,
    },
    /// Check the raw body contains text.
    BodyContains {
        /// Text to search for.
        text: String,
        /// Case-insensitive search.
        #[serde(default)]
        ignore_case: bool,
    },
    /// Check the raw body matches a regex pattern.
    BodyMatches {
        /// Regex pattern.
        pattern: String,
    },
    /// Check body is valid JSON.
    IsJson,
    /// Check content type.
    ContentType {
        /// Expected content type (partial match).
        expected: String,
    },
    /// Check response time.
    ResponseTime {
        /// Maximum allowed time in milliseconds.
        max_ms: u64,
    },
}

impl Assertion {
    /// Field comparison.
    #[must_use]
    pub fn field(path: impl Into<String>, comparator: Comparator, expected: Value) -> Self {
        Self::Field {
            path: path.into(),
            comparator,
            expected,
        }
    }

    /// Field is present and not null.
    #[must_use]
    pub fn field_exists(path: impl Into<String>) -> Self {
        Self::field(path, Comparator::Exists, Value::Null)
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::Field {
                path,
                comparator: Comparator::Exists,
                ..
            } => format!("JSON {path} exists"),
            Self::Field {
                path,
                comparator,
                expected,
            } => format!("JSON {path} {} {expected}", comparator.symbol()),
            Self::BodyContains { text, .. } => format!("Body contains '{text}'"),
            Self::BodyMatches { pattern } => format!("Body matches /{pattern}/"),
            Self::IsJson => "Body is valid JSON".to_string(),
            Self::ContentType { expected } => format!("Content-Type contains '{expected}'"),
            Self::ResponseTime { max_ms } => format!("Response time <= {max_ms}ms"),
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => status >= *min && status <= *max,
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }

    /// Create an exact status expectation.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::exact(200)
    }
}

/// Comparison applied by a field assertion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// Equal to; numbers within an absolute tolerance.
    Equals,
    /// Not equal to.
    NotEquals,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal to.
    GreaterThanOrEqual,
    /// Less than.
    LessThan,
    /// Less than or equal to.
    LessThanOrEqual,
    /// Substring (strings) or element (arrays).
    Contains,
    /// Present and not null.
    Exists,
}

impl Comparator {
    /// Get the symbol for this comparator.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Contains => "contains",
            Self::Exists => "exists",
        }
    }
}

/// Outcome of a single assertion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The response satisfied the assertion.
    Passed,
    /// The response did not satisfy the assertion.
    Failed,
    /// Not evaluated because the status check failed.
    Skipped,
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// What happened.
    pub verdict: Verdict,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Failure or skip reason.
    pub message: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            verdict: Verdict::Passed,
            actual: None,
            message: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            assertion,
            verdict: Verdict::Passed,
            actual: Some(actual.into()),
            message: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, message: impl Into<String>) -> Self {
        Self {
            assertion,
            verdict: Verdict::Failed,
            actual: None,
            message: Some(message.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            assertion,
            verdict: Verdict::Failed,
            actual: Some(actual.into()),
            message: Some(message.into()),
        }
    }

    /// Create a skipped result.
    #[must_use]
    pub fn skipped(assertion: Assertion, reason: impl Into<String>) -> Self {
        Self {
            assertion,
            verdict: Verdict::Skipped,
            actual: None,
            message: Some(reason.into()),
        }
    }

    /// Returns true if the assertion passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.verdict, Verdict::Passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_expectation_exact() {
        let exp = StatusExpectation::exact(200);
        assert!(exp.matches(200));
        assert!(!exp.matches(201));
    }

    #[test]
    fn test_status_expectation_range() {
        let exp = StatusExpectation::success();
        assert!(exp.matches(200));
        assert!(exp.matches(299));
        assert!(!exp.matches(300));
        assert!(!exp.matches(199));
    }

    #[test]
    fn test_status_expectation_one_of() {
        let exp = StatusExpectation::OneOf(vec![400, 500]);
        assert!(exp.matches(400));
        assert!(exp.matches(500));
        assert!(!exp.matches(200));
        assert_eq!(exp.description(), "in [400, 500]");
    }

    #[test]
    fn test_assertion_description() {
        let assertion = Assertion::StatusCode {
            expected: StatusExpectation::exact(200),
        };
        assert_eq!(assertion.description(), "Status code = 200");

        let assertion = Assertion::field("monthlyPayment", Comparator::GreaterThan, json!(0.0));
        assert_eq!(assertion.description(), "JSON monthlyPayment > 0.0");

        let assertion = Assertion::field_exists("APRC");
        assert_eq!(assertion.description(), "JSON APRC exists");
    }

    #[test]
    fn test_assertion_serde_shape() {
        let assertion = Assertion::field("apr", Comparator::Equals, json!(21.19));
        let value = serde_json::to_value(&assertion).unwrap_or_default();
        assert_eq!(
            value,
            json!({"type": "field", "path": "apr", "comparator": "equals", "expected": 21.19})
        );
    }
}
