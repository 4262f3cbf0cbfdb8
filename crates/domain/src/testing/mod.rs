//! Contract tests: cases, assertions and their results.

mod assertion;
mod case;
mod field_path;
mod report;

pub use assertion::{Assertion, AssertionResult, Comparator, StatusExpectation, Verdict};
pub use case::TestCase;
pub use field_path::{FieldPath, Segment};
pub use report::{CaseOutcome, CaseReport, Exchange, RunReport};
