//! Environment and per-deployment contract types

mod contract;
mod target;

pub use contract::{
    BoundaryContract, EnvironmentContract, InvalidAmountContract, InvalidRouteContract,
    JS_DISABLED_FALLBACK, LoanTerms, ReferenceCalculation, RequestFields, ResponseFields,
};
pub use target::{DEFAULT_TIMEOUT, Environment};
