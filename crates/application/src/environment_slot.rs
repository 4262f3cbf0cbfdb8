//! Process-wide environment, set once during suite setup.

use std::sync::{Arc, OnceLock};

use loancheck_domain::Environment;
use tracing::{debug, info};

use crate::error::ConfigurationError;

/// Holds the environment of a run.
///
/// The first `set` wins. Setting the same environment again is harmless;
/// setting a different one is refused, so the target cannot change mid-run.
/// Reads after setup are lock-free.
#[derive(Debug, Default)]
pub struct EnvironmentSlot {
    inner: OnceLock<Arc<Environment>>,
}

impl EnvironmentSlot {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Creates a slot that is already configured.
    #[must_use]
    pub fn configured(environment: Environment) -> Self {
        let slot = Self::new();
        let _ = slot.inner.set(Arc::new(environment));
        slot
    }

    /// Sets the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::AlreadyConfigured` if a different
    /// environment is already set.
    pub fn set(&self, environment: Environment) -> Result<Arc<Environment>, ConfigurationError> {
        let mut stored_now = false;
        let current = self.inner.get_or_init(|| {
            stored_now = true;
            Arc::new(environment.clone())
        });

        if stored_now {
            info!(
                environment = %current.name,
                base_uri = %current.base_uri,
                "Set up base URI"
            );
            return Ok(Arc::clone(current));
        }

        if **current == environment {
            debug!(environment = %current.name, "environment already set, ignoring identical set");
            Ok(Arc::clone(current))
        } else {
            Err(ConfigurationError::AlreadyConfigured {
                current: format!("{} ({})", current.name, current.base_uri),
                attempted: format!("{} ({})", environment.name, environment.base_uri),
            })
        }
    }

    /// Returns the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::NotConfigured` if nothing was set.
    pub fn get(&self) -> Result<Arc<Environment>, ConfigurationError> {
        self.inner
            .get()
            .cloned()
            .ok_or(ConfigurationError::NotConfigured)
    }
}
