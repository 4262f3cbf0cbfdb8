//! Runner settings read from the process environment.

use std::path::PathBuf;
use std::time::Duration;

use loancheck_application::ConfigurationError;
use loancheck_infrastructure::testing::{DEFAULT_MAX_CONCURRENCY, DEFAULT_TOLERANCE};
use thiserror::Error;

/// Environment selected when `LOANCHECK_ENV` is unset.
pub const DEFAULT_ENVIRONMENT: &str = "lt-staging";

/// A variable is set to something unusable.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{var} must be {expected}, got '{value}'")]
pub struct SettingsError {
    var: &'static str,
    expected: &'static str,
    value: String,
}

impl From<SettingsError> for ConfigurationError {
    fn from(error: SettingsError) -> Self {
        Self::Load(error.to_string())
    }
}

/// Settings of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Contract to run (`LOANCHECK_ENV`).
    pub environment: String,
    /// Extra contract file (`LOANCHECK_CONFIG`).
    pub config_path: Option<PathBuf>,
    /// Base URI override (`LOANCHECK_BASE_URI`).
    pub base_uri: Option<String>,
    /// Per-request timeout (`LOANCHECK_TIMEOUT_MS`).
    pub timeout: Option<Duration>,
    /// Cases in flight (`LOANCHECK_CONCURRENCY`).
    pub concurrency: usize,
    /// Absolute tolerance for numeric equality (`LOANCHECK_TOLERANCE`).
    pub tolerance: f64,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout = get("LOANCHECK_TIMEOUT_MS")
            .map(|raw| match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
                _ => Err(SettingsError {
                    var: "LOANCHECK_TIMEOUT_MS",
                    expected: "a positive number of milliseconds",
                    value: raw,
                }),
            })
            .transpose()?;

        let concurrency = get("LOANCHECK_CONCURRENCY")
            .map(|raw| match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(SettingsError {
                    var: "LOANCHECK_CONCURRENCY",
                    expected: "a positive integer",
                    value: raw,
                }),
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_CONCURRENCY);

        let tolerance = get("LOANCHECK_TOLERANCE")
            .map(|raw| match raw.trim().parse::<f64>() {
                Ok(t) if t.is_finite() && t >= 0.0 => Ok(t),
                _ => Err(SettingsError {
                    var: "LOANCHECK_TOLERANCE",
                    expected: "a non-negative number",
                    value: raw,
                }),
            })
            .transpose()?
            .unwrap_or(DEFAULT_TOLERANCE);

        Ok(Self {
            environment: get("LOANCHECK_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            config_path: get("LOANCHECK_CONFIG").map(PathBuf::from),
            base_uri: get("LOANCHECK_BASE_URI"),
            timeout,
            concurrency,
            tolerance,
        })
    }
}
