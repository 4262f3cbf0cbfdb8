//! Assertion evaluator.
//!
//! Checks a response against a test case and produces one result per
//! assertion, the status check first.

use loancheck_domain::response::ResponseSpec;
use loancheck_domain::testing::{
    Assertion, AssertionResult, Comparator, FieldPath, StatusExpectation, TestCase,
};
use regex::Regex;
use serde_json::Value;

/// Absolute tolerance for numeric equality.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Characters of body shown in failure messages.
const PREVIEW_CHARS: usize = 100;

/// Evaluates assertions against responses.
#[derive(Debug, Clone, Copy)]
pub struct AssertionEvaluator {
    tolerance: f64,
}

impl Default for AssertionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl AssertionEvaluator {
    /// Creates an evaluator with the default numeric tolerance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Sets the absolute tolerance used by numeric `Equals`/`NotEquals`.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Evaluates a case against its response.
    ///
    /// The status is checked first. If it does not match, every other
    /// assertion is reported as skipped; otherwise all of them are
    /// evaluated, regardless of earlier failures.
    #[must_use]
    pub fn evaluate(&self, case: &TestCase, response: &ResponseSpec) -> Vec<AssertionResult> {
        let mut results = Vec::with_capacity(case.assertions.len() + 1);

        let status = self.check_status(
            &Assertion::StatusCode {
                expected: case.expected_status.clone(),
            },
            response,
            &case.expected_status,
        );
        let status_ok = status.passed();
        let skip_reason = status.message.clone().unwrap_or_default();
        results.push(status);

        for assertion in &case.assertions {
            if status_ok {
                results.push(self.run_assertion(assertion, response));
            } else {
                results.push(AssertionResult::skipped(
                    assertion.clone(),
                    format!("not evaluated: {skip_reason}"),
                ));
            }
        }

        results
    }

    /// Compares the repeat-checked fields of two responses to the same request.
    ///
    /// Each field yields an `Equals` result against the value from `first`.
    #[must_use]
    pub fn compare_repeat(
        &self,
        paths: &[String],
        first: &ResponseSpec,
        second: &ResponseSpec,
    ) -> Vec<AssertionResult> {
        paths
            .iter()
            .map(|path| {
                let expected = match Self::field_value(path, first) {
                    Ok(value) => value.clone(),
                    Err(message) => {
                        return AssertionResult::fail(
                            Assertion::field(path.clone(), Comparator::Equals, Value::Null),
                            format!("first response: {message}"),
                        );
                    }
                };
                let assertion = Assertion::field(path.clone(), Comparator::Equals, expected);
                let result = self.run_assertion(&assertion, second);
                match (result.passed(), result.message.clone()) {
                    (false, Some(message)) => AssertionResult {
                        message: Some(format!("repeated request differs: {message}")),
                        ..result
                    },
                    _ => result,
                }
            })
            .collect()
    }

    /// Runs a single assertion against a response.
    #[must_use]
    pub fn run_assertion(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match assertion {
            Assertion::StatusCode { expected } => self.check_status(assertion, response, expected),
            Assertion::Field {
                path,
                comparator,
                expected,
            } => self.check_field(assertion, response, path, *comparator, expected),
            Assertion::BodyContains { text, ignore_case } => {
                Self::check_body_contains(assertion, response, text, *ignore_case)
            }
            Assertion::BodyMatches { pattern } => {
                Self::check_body_matches(assertion, response, pattern)
            }
            Assertion::IsJson => Self::check_is_json(assertion, response),
            Assertion::ContentType { expected } => {
                Self::check_content_type(assertion, response, expected)
            }
            Assertion::ResponseTime { max_ms } => {
                Self::check_response_time(assertion, response, *max_ms)
            }
        }
    }

    #[allow(clippy::unused_self)]
    fn check_status(
        &self,
        assertion: &Assertion,
        response: &ResponseSpec,
        expected: &StatusExpectation,
    ) -> AssertionResult {
        let actual = response.status;
        if expected.matches(actual) {
            AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                actual.to_string(),
                format!("Expected status {}, got {actual}", expected.description()),
            )
        }
    }

    fn field_value<'a>(path: &str, response: &'a ResponseSpec) -> Result<&'a Value, String> {
        let path = FieldPath::parse(path).map_err(|e| e.to_string())?;
        let json = response
            .json()
            .map_err(|e| format!("Failed to parse body as JSON: {e}"))?;
        path.lookup(json)
            .ok_or_else(|| format!("JSON path '{path}' not found"))
    }

    fn check_field(
        &self,
        assertion: &Assertion,
        response: &ResponseSpec,
        path: &str,
        comparator: Comparator,
        expected: &Value,
    ) -> AssertionResult {
        let value = match Self::field_value(path, response) {
            Ok(value) => value,
            Err(message) => return AssertionResult::fail(assertion.clone(), message),
        };

        if self.compare(value, comparator, expected) {
            AssertionResult::pass_with_value(assertion.clone(), value.to_string())
        } else {
            let message = if comparator == Comparator::Exists {
                format!("JSON path '{path}' is null")
            } else {
                format!(
                    "JSON path '{path}' comparison failed: {value} {} {expected}",
                    comparator.symbol()
                )
            };
            AssertionResult::fail_with_value(assertion.clone(), value.to_string(), message)
        }
    }

    fn compare(&self, actual: &Value, comparator: Comparator, expected: &Value) -> bool {
        match comparator {
            Comparator::Equals => self.values_equal(actual, expected),
            Comparator::NotEquals => !self.values_equal(actual, expected),
            Comparator::GreaterThan => compare_numeric(actual, expected, |a, b| a > b),
            Comparator::GreaterThanOrEqual => compare_numeric(actual, expected, |a, b| a >= b),
            Comparator::LessThan => compare_numeric(actual, expected, |a, b| a < b),
            Comparator::LessThanOrEqual => compare_numeric(actual, expected, |a, b| a <= b),
            Comparator::Contains => match (actual, expected) {
                (Value::String(s), Value::String(needle)) => s.contains(needle.as_str()),
                (Value::Array(items), _) => items.iter().any(|i| self.values_equal(i, expected)),
                _ => false,
            },
            Comparator::Exists => !actual.is_null(),
        }
    }

    fn values_equal(&self, actual: &Value, expected: &Value) -> bool {
        match (actual, expected) {
            (Value::Number(a), Value::Number(b)) if a.is_f64() || b.is_f64() => {
                match (a.as_f64(), b.as_f64()) {
                    (Some(a), Some(b)) => (a - b).abs() <= self.tolerance,
                    _ => false,
                }
            }
            // Integers compare exactly.
            _ => actual == expected,
        }
    }

    fn check_body_contains(
        assertion: &Assertion,
        response: &ResponseSpec,
        text: &str,
        ignore_case: bool,
    ) -> AssertionResult {
        let contains = if ignore_case {
            response.body.to_lowercase().contains(&text.to_lowercase())
        } else {
            response.body.contains(text)
        };

        if contains {
            AssertionResult::pass(assertion.clone())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                response.body_preview(PREVIEW_CHARS),
                format!("Body does not contain '{text}'"),
            )
        }
    }

    fn check_body_matches(
        assertion: &Assertion,
        response: &ResponseSpec,
        pattern: &str,
    ) -> AssertionResult {
        match Regex::new(pattern) {
            Ok(regex) if regex.is_match(&response.body) => AssertionResult::pass(assertion.clone()),
            Ok(_) => AssertionResult::fail_with_value(
                assertion.clone(),
                response.body_preview(PREVIEW_CHARS),
                format!("Body does not match pattern '{pattern}'"),
            ),
            Err(e) => AssertionResult::fail(
                assertion.clone(),
                format!("Invalid regex pattern '{pattern}': {e}"),
            ),
        }
    }

    fn check_is_json(assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match response.json() {
            Ok(_) => AssertionResult::pass(assertion.clone()),
            Err(e) => AssertionResult::fail_with_value(
                assertion.clone(),
                response.body_preview(PREVIEW_CHARS),
                format!("Body is not valid JSON: {e}"),
            ),
        }
    }

    fn check_content_type(
        assertion: &Assertion,
        response: &ResponseSpec,
        expected: &str,
    ) -> AssertionResult {
        match &response.content_type {
            Some(actual) if actual.contains(expected) => {
                AssertionResult::pass_with_value(assertion.clone(), actual.clone())
            }
            Some(actual) => AssertionResult::fail_with_value(
                assertion.clone(),
                actual.clone(),
                format!("Content-Type '{actual}' does not contain '{expected}'"),
            ),
            None => AssertionResult::fail(assertion.clone(), "No Content-Type header present"),
        }
    }

    fn check_response_time(
        assertion: &Assertion,
        response: &ResponseSpec,
        max_ms: u64,
    ) -> AssertionResult {
        let actual_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX);
        if actual_ms <= max_ms {
            AssertionResult::pass_with_value(assertion.clone(), format!("{actual_ms}ms"))
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                format!("{actual_ms}ms"),
                format!("Response took {actual_ms}ms, expected <= {max_ms}ms"),
            )
        }
    }
}

/// Compares numbers; anything non-numeric fails the comparison.
fn compare_numeric<F>(actual: &Value, expected: &Value, cmp: F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use loancheck_domain::testing::Verdict;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    fn create_response(status: u16, body: &str) -> ResponseSpec {
        ResponseSpec::new(
            status,
            HashMap::new(),
            body.as_bytes().to_vec(),
            Duration::from_millis(50),
        )
    }

    fn json_response(status: u16, body: &str) -> ResponseSpec {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        ResponseSpec::new(
            status,
            headers,
            body.as_bytes().to_vec(),
            Duration::from_millis(50),
        )
    }

    fn verdicts(results: &[AssertionResult]) -> Vec<Verdict> {
        results.iter().map(|r| r.verdict).collect()
    }

    #[test]
    fn test_status_checked_first() {
        let evaluator = AssertionEvaluator::new();
        let case = TestCase::post("valid", "/calculate")
            .expect_status(200)
            .greater_than("monthlyPayment", 0.0);

        let response = json_response(200, r#"{"monthlyPayment": 172.5}"#);
        let results = evaluator.evaluate(&case, &response);
        assert!(matches!(results[0].assertion, Assertion::StatusCode { .. }));
        assert_eq!(verdicts(&results), vec![Verdict::Passed, Verdict::Passed]);
    }

    #[test]
    fn test_status_mismatch_skips_body_assertions() {
        let evaluator = AssertionEvaluator::new();
        let case = TestCase::post("valid", "/calculate")
            .expect_status(200)
            .greater_than("monthlyPayment", 0.0)
            .assert(Assertion::IsJson);

        let results = evaluator.evaluate(&case, &json_response(500, r#"{"error": "boom"}"#));
        assert_eq!(
            verdicts(&results),
            vec![Verdict::Failed, Verdict::Skipped, Verdict::Skipped]
        );
        assert_eq!(
            results[0].message.as_deref(),
            Some("Expected status = 200, got 500")
        );
        assert!(results[1].message.as_deref().unwrap().contains("got 500"));
    }

    #[test]
    fn test_all_assertions_evaluated_after_failure() {
        let evaluator = AssertionEvaluator::new();
        let case = TestCase::post("figures", "/calculate")
            .greater_than("monthlyPayment", 0)
            .exists("apr")
            .exists("totalCost");

        let response = json_response(200, r#"{"monthlyPayment": -1, "apr": 21.19}"#);
        let results = evaluator.evaluate(&case, &response);
        assert_eq!(
            verdicts(&results),
            vec![
                Verdict::Passed,
                Verdict::Failed,
                Verdict::Passed,
                Verdict::Failed
            ]
        );
    }

    #[test]
    fn test_non_json_body_fails_each_field_assertion() {
        let evaluator = AssertionEvaluator::new();
        let case = TestCase::post("html", "/calculate")
            .exists("monthlyPayment")
            .exists("apr");

        let results = evaluator.evaluate(&case, &create_response(200, "<html></html>"));
        assert_eq!(
            verdicts(&results),
            vec![Verdict::Passed, Verdict::Failed, Verdict::Failed]
        );
        for result in &results[1..] {
            assert!(result
                .message
                .as_deref()
                .unwrap()
                .starts_with("Failed to parse body as JSON"));
        }
    }

    #[test]
    fn test_equals_uses_tolerance() {
        let evaluator = AssertionEvaluator::new();
        let response = json_response(200, r#"{"monthlyPayment": 136.79, "apr": 21.19}"#);

        let close =
            Assertion::field("monthlyPayment", Comparator::Equals, json!(136.790_000_000_1));
        assert!(evaluator.run_assertion(&close, &response).passed());

        let off = Assertion::field("monthlyPayment", Comparator::Equals, json!(136.8));
        assert!(!evaluator.run_assertion(&off, &response).passed());

        let loose = AssertionEvaluator::new().with_tolerance(0.05);
        assert!(loose.run_assertion(&off, &response).passed());
    }

    #[test]
    fn test_equals_integer_and_float() {
        let evaluator = AssertionEvaluator::new();
        let response = json_response(200, r#"{"amount": 5000}"#);
        let assertion = Assertion::field("amount", Comparator::Equals, json!(5000.0));
        assert!(evaluator.run_assertion(&assertion, &response).passed());
    }

    #[test]
    fn test_equals_large_integers_exactly() {
        let evaluator = AssertionEvaluator::new();
        let response = json_response(200, r#"{"id": 9007199254740993}"#);

        let equals = Assertion::field("id", Comparator::Equals, json!(9_007_199_254_740_992_u64));
        assert!(!evaluator.run_assertion(&equals, &response).passed());

        let not_equals =
            Assertion::field("id", Comparator::NotEquals, json!(9_007_199_254_740_992_u64));
        assert!(evaluator.run_assertion(&not_equals, &response).passed());

        let same = Assertion::field("id", Comparator::Equals, json!(9_007_199_254_740_993_u64));
        assert!(evaluator.run_assertion(&same, &response).passed());
    }

    #[test]
    fn test_equals_string() {
        let evaluator = AssertionEvaluator::new();
        let response = json_response(400, r#"{"error": "Invalid loan amount"}"#);

        let assertion = Assertion::field("error", Comparator::Equals, json!("Invalid loan amount"));
        assert!(evaluator.run_assertion(&assertion, &response).passed());

        let assertion = Assertion::field("error", Comparator::NotEquals, json!("other"));
        assert!(evaluator.run_assertion(&assertion, &response).passed());
    }

    #[test]
    fn test_zero_thresholds_behave_identically() {
        let evaluator = AssertionEvaluator::new();
        let response = json_response(200, r#"{"monthlyPayment": 0.01}"#);

        for threshold in [json!(0), json!(0.0)] {
            let assertion = Assertion::field("monthlyPayment", Comparator::GreaterThan, threshold);
            assert!(evaluator.run_assertion(&assertion, &response).passed());
        }
    }

    #[test]
    fn test_ordering_comparators() {
        let evaluator = AssertionEvaluator::new();
        let response = json_response(200, r#"{"count": 10, "label": "ten"}"#);

        let check = |comparator, expected: Value| {
            evaluator
                .run_assertion(&Assertion::field("count", comparator, expected), &response)
                .passed()
        };
        assert!(check(Comparator::GreaterThanOrEqual, json!(10)));
        assert!(check(Comparator::LessThan, json!(11)));
        assert!(check(Comparator::LessThanOrEqual, json!(10)));
        assert!(!check(Comparator::LessThan, json!(5)));

        let label = Assertion::field("label", Comparator::GreaterThan, json!(0));
        assert!(!evaluator.run_assertion(&label, &response).passed());
    }

    #[test]
    fn test_exists() {
        let evaluator = AssertionEvaluator::new();
        let response = json_response(200, r#"{"APRC": 12.4, "monthlyPayment": null}"#);

        assert!(evaluator
            .run_assertion(&Assertion::field_exists("APRC"), &response)
            .passed());

        let null = evaluator.run_assertion(&Assertion::field_exists("monthlyPayment"), &response);
        assert_eq!(null.message.as_deref(), Some("JSON path 'monthlyPayment' is null"));

        let missing = evaluator.run_assertion(&Assertion::field_exists("apr"), &response);
        assert_eq!(missing.message.as_deref(), Some("JSON path 'apr' not found"));
    }

    #[test]
    fn test_nested_path_and_contains() {
        let evaluator = AssertionEvaluator::new();
        let response = json_response(
            200,
            r#"{"schedule": [{"payment": 172.5}], "tags": ["a", "b"], "note": "small loan"}"#,
        );

        let nested = Assertion::field("$.schedule[0].payment", Comparator::Equals, json!(172.5));
        assert!(evaluator.run_assertion(&nested, &response).passed());

        let in_array = Assertion::field("tags", Comparator::Contains, json!("b"));
        assert!(evaluator.run_assertion(&in_array, &response).passed());

        let substring = Assertion::field("note", Comparator::Contains, json!("loan"));
        assert!(evaluator.run_assertion(&substring, &response).passed());
    }

    #[test]
    fn test_invalid_path_fails() {
        let evaluator = AssertionEvaluator::new();
        let response = json_response(200, r#"{"items": []}"#);
        let result = evaluator.run_assertion(&Assertion::field_exists("items[x]"), &response);
        assert!(!result.passed());
        assert!(result.message.unwrap().contains("invalid field path"));
    }

    #[test]
    fn test_body_contains_on_html() {
        let evaluator = AssertionEvaluator::new();
        let response = create_response(
            200,
            "<noscript><strong>We're sorry but application doesn't work properly without \
             JavaScript enabled. Please enable it to continue.</strong></noscript>",
        );

        let assertion = Assertion::BodyContains {
            text: "without JavaScript enabled".to_string(),
            ignore_case: false,
        };
        assert!(evaluator.run_assertion(&assertion, &response).passed());

        let assertion = Assertion::BodyContains {
            text: "JAVASCRIPT".to_string(),
            ignore_case: true,
        };
        assert!(evaluator.run_assertion(&assertion, &response).passed());

        let assertion = Assertion::BodyContains {
            text: "monthlyPayment".to_string(),
            ignore_case: false,
        };
        assert!(!evaluator.run_assertion(&assertion, &response).passed());
    }

    #[test]
    fn test_body_matches() {
        let evaluator = AssertionEvaluator::new();
        let response = create_response(200, r#"{"monthlyPayment": 172.5}"#);

        let assertion = Assertion::BodyMatches {
            pattern: r#""monthlyPayment":\s*\d+\.\d+"#.to_string(),
        };
        assert!(evaluator.run_assertion(&assertion, &response).passed());

        let assertion = Assertion::BodyMatches {
            pattern: "(".to_string(),
        };
        let result = evaluator.run_assertion(&assertion, &response);
        assert!(result.message.unwrap().starts_with("Invalid regex pattern"));
    }

    #[test]
    fn test_is_json_and_content_type() {
        let evaluator = AssertionEvaluator::new();
        let response = json_response(200, r#"{"valid": true}"#);
        assert!(evaluator.run_assertion(&Assertion::IsJson, &response).passed());

        let content_type = Assertion::ContentType {
            expected: "application/json".to_string(),
        };
        assert!(evaluator.run_assertion(&content_type, &response).passed());

        let html = create_response(200, "not json");
        assert!(!evaluator.run_assertion(&Assertion::IsJson, &html).passed());
        assert!(!evaluator.run_assertion(&content_type, &html).passed());
    }

    #[test]
    fn test_response_time() {
        let evaluator = AssertionEvaluator::new();
        let response = create_response(200, "");

        assert!(evaluator
            .run_assertion(&Assertion::ResponseTime { max_ms: 100 }, &response)
            .passed());
        assert!(!evaluator
            .run_assertion(&Assertion::ResponseTime { max_ms: 10 }, &response)
            .passed());
    }

    #[test]
    fn test_compare_repeat() {
        let evaluator = AssertionEvaluator::new();
        let first = json_response(200, r#"{"monthlyPayment": 136.79, "apr": 21.19}"#);
        let same = json_response(200, r#"{"monthlyPayment": 136.79, "apr": 21.19}"#);
        let drifted = json_response(200, r#"{"monthlyPayment": 136.79, "apr": 21.2}"#);
        let paths = vec!["monthlyPayment".to_string(), "apr".to_string()];

        let results = evaluator.compare_repeat(&paths, &first, &same);
        assert!(results.iter().all(AssertionResult::passed));

        let results = evaluator.compare_repeat(&paths, &first, &drifted);
        assert_eq!(verdicts(&results), vec![Verdict::Passed, Verdict::Failed]);
        assert!(results[1]
            .message
            .as_deref()
            .unwrap()
            .starts_with("repeated request differs"));
    }

    #[test]
    fn test_compare_repeat_missing_in_first() {
        let evaluator = AssertionEvaluator::new();
        let first = json_response(200, "{}");
        let second = json_response(200, r#"{"apr": 1.0}"#);

        let results = evaluator.compare_repeat(&["apr".to_string()], &first, &second);
        assert_eq!(
            results[0].message.as_deref(),
            Some("first response: JSON path 'apr' not found")
        );
    }
}
