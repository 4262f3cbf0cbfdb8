//! Reporter that writes to `tracing`.

use loancheck_application::ports::Reporter;
use loancheck_domain::{CaseOutcome, CaseReport, Exchange, RunReport};
use tracing::{error, info, warn};

/// Logs every exchange and the outcome of every case.
///
/// Exchanges are logged at `info` with the full raw response body, failed
/// cases at `warn` and errored cases at `error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl TracingReporter {
    /// Creates a new tracing reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reporter for TracingReporter {
    fn exchange(&self, exchange: &Exchange) {
        match (exchange.status, &exchange.response_body) {
            (Some(status), Some(body)) => info!(
                case = %exchange.case,
                method = %exchange.method,
                url = %exchange.url,
                status,
                duration_ms = exchange.duration_ms,
                "Response body: {body}"
            ),
            _ => info!(
                case = %exchange.case,
                method = %exchange.method,
                url = %exchange.url,
                duration_ms = exchange.duration_ms,
                "No response received"
            ),
        }
    }

    fn case_finished(&self, report: &CaseReport) {
        match &report.outcome {
            CaseOutcome::Passed => {
                info!(case = %report.name, duration_ms = report.duration_ms, "passed");
            }
            CaseOutcome::Failed => {
                for failure in report.failures() {
                    warn!(
                        case = %report.name,
                        assertion = %failure.assertion.description(),
                        actual = failure.actual.as_deref().unwrap_or("-"),
                        "{}",
                        failure.message.as_deref().unwrap_or("assertion failed")
                    );
                }
                warn!(case = %report.name, duration_ms = report.duration_ms, "failed");
            }
            CaseOutcome::Errored { error: cause } => {
                let url = report.exchange.as_ref().map_or("-", |e| e.url.as_str());
                error!(case = %report.name, url, "errored: {cause}");
            }
        }
    }

    fn run_finished(&self, report: &RunReport) {
        let summary = format!(
            "{} passed, {} failed, {} errored of {} ({:.1}%)",
            report.passed,
            report.failed,
            report.errored,
            report.total,
            report.pass_rate()
        );
        if report.all_passed() {
            info!(
                run_id = %report.run_id,
                environment = %report.environment,
                duration_ms = report.duration_ms,
                "{summary}"
            );
        } else {
            warn!(
                run_id = %report.run_id,
                environment = %report.environment,
                duration_ms = report.duration_ms,
                "{summary}"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use loancheck_domain::{Assertion, AssertionResult, HttpMethod};
    use std::io;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || Capture(Arc::clone(&sink)))
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buf.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn exchange(body: Option<&str>) -> Exchange {
        Exchange {
            case: "valid".to_string(),
            method: HttpMethod::Post,
            url: "https://api.bigbank.com/api/v1/loan/calculate".to_string(),
            request_body: Some(r#"{"loanAmount":5000,"loanPeriod":60}"#.to_string()),
            status: body.map(|_| 200),
            response_body: body.map(str::to_string),
            duration_ms: 12,
        }
    }

    fn line_with<'a>(output: &'a str, needle: &str) -> &'a str {
        output.lines().find(|l| l.contains(needle)).unwrap()
    }

    #[test]
    fn test_exchange_logs_url_and_full_body() {
        let body = format!(r#"{{"schedule":"{}"}}"#, "7".repeat(5000));
        let output = capture(|| TracingReporter::new().exchange(&exchange(Some(&body))));

        let line = line_with(&output, "Response body");
        assert!(line.contains("INFO"));
        assert!(line.contains("url=https://api.bigbank.com/api/v1/loan/calculate"));
        assert!(line.contains("status=200"));
        assert!(line.contains(&body));
    }

    #[test]
    fn test_exchange_without_response() {
        let output = capture(|| TracingReporter::new().exchange(&exchange(None)));
        let line = line_with(&output, "No response received");
        assert!(line.contains("url=https://api.bigbank.com/api/v1/loan/calculate"));
    }

    #[test]
    fn test_failed_case_logs_at_warn() {
        let failure =
            AssertionResult::fail(Assertion::field_exists("apr"), "JSON path 'apr' not found");
        let report = CaseReport::completed("valid", vec![failure], exchange(Some("{}")), 4);
        let output = capture(|| TracingReporter::new().case_finished(&report));

        let line = line_with(&output, "JSON path 'apr' not found");
        assert!(line.contains("WARN"));
        assert!(line.contains("case=valid"));
        assert!(line_with(&output, "failed").contains("WARN"));
    }

    #[test]
    fn test_errored_case_logs_at_error() {
        let report = CaseReport::errored("valid", "connection refused", Some(exchange(None)), 1);
        let output = capture(|| TracingReporter::new().case_finished(&report));

        let line = line_with(&output, "errored: connection refused");
        assert!(line.contains("ERROR"));
        assert!(line.contains("https://api.bigbank.com/api/v1/loan/calculate"));
    }

    #[test]
    fn test_run_summary_level() {
        let passing = RunReport::new(Uuid::now_v7(), "api", Utc::now(), Vec::new(), 0);
        let output = capture(|| TracingReporter::new().run_finished(&passing));
        assert!(line_with(&output, "0 passed").contains("INFO"));

        let errored = CaseReport::errored("valid", "timeout", None, 1);
        let failing = RunReport::new(Uuid::now_v7(), "api", Utc::now(), vec![errored], 1);
        let output = capture(|| TracingReporter::new().run_finished(&failing));
        assert!(line_with(&output, "1 errored").contains("WARN"));
    }
}
