//! Contract configuration loaded from disk.

mod contract_file;

pub use contract_file::{ContractCatalog, ContractFile, ContractFileError};
