//! Per-case and per-run results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AssertionResult, Verdict};
use crate::request::HttpMethod;

/// Logged request/response pair of one execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    /// Test case that issued the request.
    pub case: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Fully resolved request target.
    pub url: String,
    /// Body as sent, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,
    /// Response status; `None` if the request never completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Raw response body; `None` if the request never completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    /// Wall time of the call in milliseconds.
    pub duration_ms: u64,
}

/// Final state of a test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Every assertion passed.
    Passed,
    /// A response arrived but did not meet the expectations.
    Failed,
    /// The case could not complete (transport failure, unbuildable request).
    Errored {
        /// What went wrong.
        error: String,
    },
}

/// Report for one test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    /// Test case name.
    pub name: String,
    /// Final state.
    pub outcome: CaseOutcome,
    /// Assertion results in evaluation order, status first.
    #[serde(default)]
    pub results: Vec<AssertionResult>,
    /// Request/response pair, attached when the case did not pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<Exchange>,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl CaseReport {
    /// Builds the report of a case that got a response.
    ///
    /// The case passes only if every result passed; the exchange is dropped
    /// for passing cases.
    #[must_use]
    pub fn completed(
        name: impl Into<String>,
        results: Vec<AssertionResult>,
        exchange: Exchange,
        duration_ms: u64,
    ) -> Self {
        let passed = results.iter().all(AssertionResult::passed);
        Self {
            name: name.into(),
            outcome: if passed {
                CaseOutcome::Passed
            } else {
                CaseOutcome::Failed
            },
            results,
            exchange: (!passed).then_some(exchange),
            duration_ms,
        }
    }

    /// Builds the report of a case that could not complete.
    #[must_use]
    pub fn errored(
        name: impl Into<String>,
        error: impl Into<String>,
        exchange: Option<Exchange>,
        duration_ms: u64,
    ) -> Self {
        Self {
            name: name.into(),
            outcome: CaseOutcome::Errored {
                error: error.into(),
            },
            results: Vec::new(),
            exchange,
            duration_ms,
        }
    }

    /// Returns true if the case passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Passed)
    }

    /// Returns the results that failed.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results
            .iter()
            .filter(|r| r.verdict == Verdict::Failed)
    }
}

/// Results from running a suite against one environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier, also attached to log output.
    pub run_id: Uuid,
    /// Environment the suite ran against.
    pub environment: String,
    /// Start of the run.
    pub started_at: DateTime<Utc>,
    /// Case reports in registration order.
    pub cases: Vec<CaseReport>,
    /// Number of cases.
    pub total: usize,
    /// Number of passed cases.
    pub passed: usize,
    /// Number of failed cases.
    pub failed: usize,
    /// Number of errored cases.
    pub errored: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl RunReport {
    /// Create a new run report.
    #[must_use]
    pub fn new(
        run_id: Uuid,
        environment: impl Into<String>,
        started_at: DateTime<Utc>,
        cases: Vec<CaseReport>,
        duration_ms: u64,
    ) -> Self {
        let total = cases.len();
        let passed = cases.iter().filter(|c| c.passed()).count();
        let errored = cases
            .iter()
            .filter(|c| matches!(c.outcome, CaseOutcome::Errored { .. }))
            .count();

        Self {
            run_id,
            environment: environment.into(),
            started_at,
            cases,
            total,
            passed,
            failed: total - passed - errored,
            errored,
            duration_ms,
        }
    }

    /// Check if all cases passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Looks up a case report by name.
    #[must_use]
    pub fn case(&self, name: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|c| c.name == name)
    }
}
