//! YAML contract files.
//!
//! A contract file lists environment contracts under `environments:`.
//! Entries replace built-in contracts of the same name and add new ones:
//!
//! ```yaml
//! environments:
//!   - name: ee-calculator
//!     base_uri: https://calculator.example.ee
//!     calculate_path: /calculate
//!     # ...
//! ```

use std::path::{Path, PathBuf};

use loancheck_application::ConfigurationError;
use loancheck_domain::{DomainError, DomainResult, EnvironmentContract};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors reading a contract file.
#[derive(Debug, Error)]
pub enum ContractFileError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid contract file.
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Two entries in the same file share a name.
    #[error("environment '{0}' is defined more than once")]
    Duplicate(String),
}

impl From<ContractFileError> for ConfigurationError {
    fn from(error: ContractFileError) -> Self {
        Self::Load(error.to_string())
    }
}

/// Contents of a contract file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractFile {
    /// Contracts defined in the file.
    #[serde(default)]
    pub environments: Vec<EnvironmentContract>,
}

impl ContractFile {
    /// Parses a contract file from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed YAML and `Duplicate` for repeated names.
    pub fn from_yaml(path: impl Into<PathBuf>, text: &str) -> Result<Self, ContractFileError> {
        let file: Self = serde_yaml::from_str(text).map_err(|e| ContractFileError::Parse {
            path: path.into(),
            message: e.to_string(),
        })?;

        let mut seen = std::collections::HashSet::new();
        for contract in &file.environments {
            if !seen.insert(contract.name.as_str()) {
                return Err(ContractFileError::Duplicate(contract.name.clone()));
            }
        }
        Ok(file)
    }

    /// Reads and parses a contract file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as [`Self::from_yaml`].
    pub async fn load(path: &Path) -> Result<Self, ContractFileError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ContractFileError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file = Self::from_yaml(path, &text)?;
        debug!(
            path = %path.display(),
            environments = file.environments.len(),
            "contract file loaded"
        );
        Ok(file)
    }

    /// Serializes the file back to YAML.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if a value cannot be represented in YAML.
    pub fn to_yaml(&self) -> Result<String, ContractFileError> {
        serde_yaml::to_string(self).map_err(|e| ContractFileError::Parse {
            path: PathBuf::new(),
            message: e.to_string(),
        })
    }
}

/// The contracts available to a run: the built-ins plus any loaded files.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCatalog {
    contracts: Vec<EnvironmentContract>,
}

impl Default for ContractCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ContractCatalog {
    /// Catalog of the built-in contracts.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            contracts: EnvironmentContract::builtin(),
        }
    }

    /// Adds the contracts of a file; same-named contracts are replaced.
    pub fn merge(&mut self, file: ContractFile) {
        for contract in file.environments {
            if let Some(existing) = self.contracts.iter_mut().find(|c| c.name == contract.name) {
                info!(environment = %contract.name, "contract overridden from file");
                *existing = contract;
            } else {
                info!(environment = %contract.name, "contract added from file");
                self.contracts.push(contract);
            }
        }
    }

    /// Built-ins merged with the file at `path`, if one is given.
    ///
    /// # Errors
    ///
    /// Returns `ContractFileError` if the file cannot be loaded.
    pub async fn load(path: Option<&Path>) -> Result<Self, ContractFileError> {
        let mut catalog = Self::builtin();
        if let Some(path) = path {
            catalog.merge(ContractFile::load(path).await?);
        }
        Ok(catalog)
    }

    /// Looks up a contract by name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownEnvironment` if no contract has this name.
    pub fn get(&self, name: &str) -> DomainResult<&EnvironmentContract> {
        self.contracts
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DomainError::UnknownEnvironment(name.to_string()))
    }

    /// Names of all contracts, built-ins first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contracts.iter().map(|c| c.name.as_str())
    }
}
