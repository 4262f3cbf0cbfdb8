//! Contract test execution.
//!
//! The evaluator checks a response against a case; the suite runner drives
//! whole suites against the configured environment.

mod evaluator;
mod suite;

pub use evaluator::{AssertionEvaluator, DEFAULT_TOLERANCE};
pub use suite::{DEFAULT_MAX_CONCURRENCY, SuiteRunner};
