//! Loan-calculation contract suite

mod scenarios;

pub use scenarios::{INVALID_ROUTE, names, scenarios};
