//! Reporter that keeps everything in memory.

use std::sync::{Mutex, MutexGuard, PoisonError};

use loancheck_application::ports::Reporter;
use loancheck_domain::{CaseReport, Exchange, RunReport};

#[derive(Debug, Default)]
struct Recorded {
    exchanges: Vec<Exchange>,
    cases: Vec<CaseReport>,
    runs: Vec<RunReport>,
}

/// Collects exchanges and reports for later inspection.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    recorded: Mutex<Recorded>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exchanges in the order they were reported.
    #[must_use]
    pub fn exchanges(&self) -> Vec<Exchange> {
        self.lock().exchanges.clone()
    }

    /// Exchanges of one case.
    #[must_use]
    pub fn exchanges_of(&self, case: &str) -> Vec<Exchange> {
        self.lock()
            .exchanges
            .iter()
            .filter(|e| e.case == case)
            .cloned()
            .collect()
    }

    /// Case reports in completion order.
    #[must_use]
    pub fn cases(&self) -> Vec<CaseReport> {
        self.lock().cases.clone()
    }

    /// The last finished run, if any.
    #[must_use]
    pub fn last_run(&self) -> Option<RunReport> {
        self.lock().runs.last().cloned()
    }
}

impl Reporter for MemoryReporter {
    fn exchange(&self, exchange: &Exchange) {
        self.lock().exchanges.push(exchange.clone());
    }

    fn case_finished(&self, report: &CaseReport) {
        self.lock().cases.push(report.clone());
    }

    fn run_finished(&self, report: &RunReport) {
        self.lock().runs.push(report.clone());
    }
}
