//! Reporter port

use loancheck_domain::{CaseReport, Exchange, RunReport};

/// Observer of a suite run.
///
/// Reporters only record; nothing they do affects pass/fail. Every method
/// has an empty default so implementations pick what they care about.
pub trait Reporter: Send + Sync {
    /// Called once per executed request, successful or not.
    fn exchange(&self, _exchange: &Exchange) {}

    /// Called when a case reaches its final state.
    fn case_finished(&self, _report: &CaseReport) {}

    /// Called once the whole run is done.
    fn run_finished(&self, _report: &RunReport) {}
}
