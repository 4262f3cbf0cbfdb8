//! Loancheck Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in the
//! application layer, the assertion evaluator and suite runner, and the
//! loading of contract files.

pub mod adapters;
pub mod config;
pub mod reporting;
pub mod testing;

pub use adapters::{FixedClock, ReqwestHttpClient, SystemClock};
pub use config::{ContractCatalog, ContractFile, ContractFileError};
pub use reporting::{MemoryReporter, TracingReporter};
pub use testing::{AssertionEvaluator, SuiteRunner};
