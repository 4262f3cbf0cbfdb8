//! Target environment of a suite run

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};
use crate::request::{Header, Headers};

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A deployment the suite runs against.
///
/// Built once during suite setup and shared read-only by every test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment name (e.g. "lt-staging").
    pub name: String,
    /// Root address all request paths are resolved against.
    pub base_uri: Url,
    /// Headers added to every request unless the request sets them itself.
    #[serde(default)]
    pub default_headers: Headers,
    /// Upper bound for a single request, connection included.
    #[serde(default = "default_timeout", with = "crate::duration_millis")]
    pub timeout: Duration,
}

const fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Environment {
    /// Creates an environment with no default headers and the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if `base_uri` is not an absolute
    /// http(s) URL.
    pub fn new(name: impl Into<String>, base_uri: &str) -> DomainResult<Self> {
        let parsed =
            Url::parse(base_uri).map_err(|e| DomainError::InvalidUrl(format!("{e}: {base_uri}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "base URI must use http or https: {base_uri}"
            )));
        }
        Ok(Self {
            name: name.into(),
            base_uri: parsed,
            default_headers: Headers::new(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Adds a default header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.add(Header::new(name, value));
        self
    }

    /// Sets the request timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolves a request path against the base URI.
    ///
    /// The base URI's own path is kept as a prefix, so a base of
    /// `https://host/loans` and a path of `/calculate` give
    /// `https://host/loans/calculate`. A query string in `path` is carried
    /// over.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the result is not a valid URL.
    pub fn resolve(&self, path: &str) -> DomainResult<Url> {
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };

        let mut url = self.base_uri.clone();
        let joined = format!(
            "{}/{}",
            self.base_uri.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_query(query);

        if url.cannot_be_a_base() {
            return Err(DomainError::InvalidUrl(url.to_string()));
        }
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_against_host_root() {
        let env =
            Environment::new("lt", "https://web-loan-application-staging.bigbank.lt").unwrap();
        let url = env.resolve("/api/v1/loan/calculate").unwrap();
        assert_eq!(
            url.as_str(),
            "https://web-loan-application-staging.bigbank.lt/api/v1/loan/calculate"
        );
    }

    #[test]
    fn test_resolve_keeps_base_path_prefix() {
        let env = Environment::new("ee", "http://127.0.0.1:8080/loans/").unwrap();
        assert_eq!(
            env.resolve("calculate").unwrap().as_str(),
            "http://127.0.0.1:8080/loans/calculate"
        );
        assert_eq!(
            env.resolve("/calculate?lang=et").unwrap().as_str(),
            "http://127.0.0.1:8080/loans/calculate?lang=et"
        );
    }

    #[test]
    fn test_rejects_non_http_base() {
        assert!(matches!(
            Environment::new("bad", "ftp://example.com"),
            Err(DomainError::InvalidUrl(_))
        ));
        assert!(matches!(
            Environment::new("bad", "not a url"),
            Err(DomainError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_builder() {
        let env = Environment::new("api", "https://api.bigbank.com")
            .unwrap()
            .with_header("Accept", "application/json")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(env.default_headers.get("accept"), Some("application/json"));
        assert_eq!(env.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_timeout_serialized_as_millis() {
        let env = Environment::new("api", "https://api.bigbank.com")
            .unwrap()
            .with_timeout(Duration::from_millis(2500));
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["timeout"], serde_json::json!(2500));

        let back: Environment = serde_json::from_value(value).unwrap();
        assert_eq!(back, env);

        let defaulted: Environment =
            serde_json::from_str(r#"{"name": "api", "base_uri": "https://api.bigbank.com"}"#)
                .unwrap();
        assert_eq!(defaulted.timeout, DEFAULT_TIMEOUT);
    }
}
