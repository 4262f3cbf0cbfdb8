//! Loancheck Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (HTTP client, reporter, clock)
//! - The set-once environment slot
//! - Request execution
//! - The loan-calculation scenario set
//! - Application-level error handling

pub mod environment_slot;
pub mod error;
pub mod execute_request;
pub mod loan;
pub mod ports;

pub use environment_slot::EnvironmentSlot;
pub use error::{ApplicationError, ApplicationResult, ConfigurationError, RunError};
pub use execute_request::{ExecuteRequest, ExecuteRequestError, ExecuteResult};
pub use ports::{Clock, HttpClient, Reporter, TransportError};
