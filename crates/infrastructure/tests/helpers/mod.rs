//! Shared helpers for infrastructure integration tests.

pub mod loan_stub;
