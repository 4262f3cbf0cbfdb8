//! Suite runner.
//!
//! Runs registered test cases against the configured environment, each case
//! as its own task, and collects one report per case in registration order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use loancheck_application::ports::{Clock, HttpClient, Reporter};
use loancheck_application::{EnvironmentSlot, ExecuteRequest, ExecuteRequestError, RunError};
use loancheck_domain::response::ResponseSpec;
use loancheck_domain::{
    CaseReport, Environment, Exchange, PreparedRequest, RequestSpec, RunReport, TestCase,
};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use super::AssertionEvaluator;
use crate::adapters::SystemClock;

/// Cases in flight at once unless configured otherwise.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// State shared by all case tasks of a run.
struct CaseContext<C: HttpClient> {
    executor: ExecuteRequest<C>,
    evaluator: AssertionEvaluator,
    reporters: Vec<Arc<dyn Reporter>>,
}

impl<C: HttpClient> CaseContext<C> {
    fn report_exchange(&self, exchange: &Exchange) {
        for reporter in &self.reporters {
            reporter.exchange(exchange);
        }
    }

    fn report_case(&self, report: &CaseReport) {
        for reporter in &self.reporters {
            reporter.case_finished(report);
        }
    }

    /// Sends once and reports the exchange, whatever the result.
    async fn send(
        &self,
        prepared: &PreparedRequest,
    ) -> (Result<ResponseSpec, ExecuteRequestError>, Exchange) {
        let start = Instant::now();
        let result = self.executor.send(prepared).await;
        let exchange = Exchange {
            case: prepared.name.clone(),
            method: prepared.method,
            url: prepared.url.to_string(),
            request_body: prepared.body.clone(),
            status: result.as_ref().ok().map(|r| r.status),
            response_body: result.as_ref().ok().map(|r| r.body.clone()),
            duration_ms: millis(start.elapsed()),
        };
        self.report_exchange(&exchange);
        (result, exchange)
    }

    async fn run_case(&self, environment: &Environment, case: &TestCase) -> CaseReport {
        let start = Instant::now();
        let request = RequestSpec::from_case(case);

        let prepared = match self.executor.prepare(environment, &request) {
            Ok(prepared) => prepared,
            Err(e) => return CaseReport::errored(&case.name, e.to_string(), None, 0),
        };

        let (result, exchange) = self.send(&prepared).await;
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                return CaseReport::errored(
                    &case.name,
                    e.to_string(),
                    Some(exchange),
                    millis(start.elapsed()),
                );
            }
        };

        let mut results = self.evaluator.evaluate(case, &response);
        let mut last_exchange = exchange;

        let status_ok = results.first().is_some_and(|r| r.passed());
        if status_ok && !case.repeat_check.is_empty() {
            debug!(fields = ?case.repeat_check, "repeating request");
            let (repeat, exchange) = self.send(&prepared).await;
            last_exchange = exchange;
            match repeat {
                Ok(second) => results.extend(self.evaluator.compare_repeat(
                    &case.repeat_check,
                    &response,
                    &second,
                )),
                Err(e) => {
                    return CaseReport::errored(
                        &case.name,
                        format!("repeated request: {e}"),
                        Some(last_exchange),
                        millis(start.elapsed()),
                    );
                }
            }
        }

        CaseReport::completed(&case.name, results, last_exchange, millis(start.elapsed()))
    }
}

/// Runs a suite of test cases against one environment.
///
/// # Example
///
/// ```ignore
/// let mut runner = SuiteRunner::new(Arc::new(ReqwestHttpClient::new()?))
///     .with_reporter(Arc::new(TracingReporter::new()));
/// runner.register_all(scenarios(&contract));
/// let report = runner.run(&slot).await?;
/// ```
pub struct SuiteRunner<C: HttpClient> {
    client: Arc<C>,
    evaluator: AssertionEvaluator,
    reporters: Vec<Arc<dyn Reporter>>,
    clock: Arc<dyn Clock>,
    max_concurrency: usize,
    cases: Vec<TestCase>,
}

impl<C: HttpClient + 'static> SuiteRunner<C> {
    /// Creates a runner with no cases and no reporters.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            evaluator: AssertionEvaluator::new(),
            reporters: Vec::new(),
            clock: Arc::new(SystemClock::new()),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            cases: Vec::new(),
        }
    }

    /// Adds a reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    /// Replaces the clock used for run timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the assertion evaluator.
    #[must_use]
    pub const fn with_evaluator(mut self, evaluator: AssertionEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Limits the number of cases in flight; at least one.
    #[must_use]
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    /// Registers a case.
    pub fn register(&mut self, case: TestCase) {
        if self.cases.iter().any(|c| c.name == case.name) {
            warn!(case = %case.name, "duplicate case name registered");
        }
        self.cases.push(case);
    }

    /// Registers several cases, keeping their order.
    pub fn register_all(&mut self, cases: impl IntoIterator<Item = TestCase>) {
        for case in cases {
            self.register(case);
        }
    }

    /// Registered cases.
    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Runs every registered case.
    ///
    /// A case whose request fails is reported as errored and does not stop
    /// the others.
    ///
    /// # Errors
    ///
    /// Returns `RunError::Configuration` if no environment is set; no
    /// request is sent in that case.
    pub async fn run(&self, slot: &EnvironmentSlot) -> Result<RunReport, RunError> {
        let environment = slot.get()?;
        let run_id = Uuid::now_v7();
        let started_at = self.clock.now();
        let start = Instant::now();

        let span = info_span!("suite", %run_id, environment = %environment.name);
        let cases = self.run_cases(&environment).instrument(span.clone()).await;

        let report = RunReport::new(
            run_id,
            environment.name.clone(),
            started_at,
            cases,
            millis(start.elapsed()),
        );
        span.in_scope(|| {
            info!(
                total = report.total,
                passed = report.passed,
                failed = report.failed,
                errored = report.errored,
                "suite finished"
            );
        });
        for reporter in &self.reporters {
            reporter.run_finished(&report);
        }
        Ok(report)
    }

    async fn run_cases(&self, environment: &Arc<Environment>) -> Vec<CaseReport> {
        info!(
            cases = self.cases.len(),
            max_concurrency = self.max_concurrency,
            base_uri = %environment.base_uri,
            "running suite"
        );

        let context = Arc::new(CaseContext {
            executor: ExecuteRequest::new(Arc::clone(&self.client)),
            evaluator: self.evaluator,
            reporters: self.reporters.clone(),
        });
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, case) in self.cases.iter().cloned().enumerate() {
            let context = Arc::clone(&context);
            let semaphore = Arc::clone(&semaphore);
            let environment = Arc::clone(environment);
            let span = info_span!("case", name = %case.name);

            tasks.spawn(
                async move {
                    let _permit = semaphore.acquire_owned().await;
                    let report = context.run_case(&environment, &case).await;
                    context.report_case(&report);
                    (index, report)
                }
                .instrument(span),
            );
        }

        let mut reports: Vec<Option<CaseReport>> = vec![None; self.cases.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => reports[index] = Some(report),
                Err(e) => warn!(error = %e, "case task did not complete"),
            }
        }

        reports
            .into_iter()
            .zip(&self.cases)
            .map(|(report, case)| {
                report.unwrap_or_else(|| {
                    let report =
                        CaseReport::errored(&case.name, "case task did not complete", None, 0);
                    context.report_case(&report);
                    report
                })
            })
            .collect()
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
