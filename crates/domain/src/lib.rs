//! Loancheck Domain - Core contract-test types
//!
//! This crate defines the domain model for the loancheck harness: requests,
//! responses, target environments with their per-deployment contracts, and
//! declarative test cases with their results.
//! All types here are pure Rust with no I/O dependencies.

mod duration_millis;
pub mod environment;
pub mod error;
pub mod request;
pub mod response;
pub mod testing;

pub use environment::{Environment, EnvironmentContract};
pub use error::{DomainError, DomainResult};
pub use request::{HttpMethod, PreparedRequest, RequestBody, RequestSpec};
pub use response::ResponseSpec;
pub use testing::{
    Assertion, AssertionResult, CaseOutcome, CaseReport, Comparator, Exchange, FieldPath, RunReport,
    StatusExpectation, TestCase, Verdict,
};
