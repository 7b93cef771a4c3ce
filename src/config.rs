//! Configuration for the content-understanding service and the poll loop.
//!
//! Everything is resolved once at process entry and passed by reference to
//! the client. Credentials come from the environment (after `.env` loading),
//! or from an injected lookup function so tests never touch process state.
//! Optional tuning (API version, poll policy) is applied by the caller.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Base URL of the content-understanding resource.
pub const ENDPOINT_VAR: &str = "CONTENT_UNDERSTANDING_ENDPOINT";
/// Subscription key sent as `Ocp-Apim-Subscription-Key`.
pub const KEY_VAR: &str = "CONTENT_UNDERSTANDING_KEY";
/// Optional per-request HTTP timeout in seconds.
pub const REQUEST_TIMEOUT_VAR: &str = "CU_REQUEST_TIMEOUT_SECS";

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2024-12-01-preview";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Errors raised while resolving configuration. Always fatal, and always
/// raised before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{} must be set in the environment or a .env file", .0.join(" and "))]
    Missing(Vec<&'static str>),

    #[error("invalid endpoint {value:?}: {reason}")]
    InvalidEndpoint { value: String, reason: String },

    #[error("invalid value for {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Connection settings for the analysis service.
#[derive(Clone)]
pub struct ServiceConfig {
    endpoint: Url,
    key: String,
    api_version: String,
    request_timeout: Duration,
}

impl ServiceConfig {
    /// Create a configuration from an endpoint and subscription key.
    pub fn new(endpoint: &str, key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::Missing(vec![KEY_VAR]));
        }

        Ok(Self {
            endpoint: parse_endpoint(endpoint)?,
            key,
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }

    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// Both required variables are checked before returning, so a single
    /// error names every missing one. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let endpoint = get(ENDPOINT_VAR);
        let key = get(KEY_VAR);

        let (endpoint, key) = match (endpoint, key) {
            (Some(endpoint), Some(key)) => (endpoint, key),
            (endpoint, key) => {
                let mut missing = Vec::new();
                if endpoint.is_none() {
                    missing.push(ENDPOINT_VAR);
                }
                if key.is_none() {
                    missing.push(KEY_VAR);
                }
                return Err(ConfigError::Missing(missing));
            }
        };

        let mut config = Self::new(&endpoint, key)?;

        if let Some(secs) = parse_number::<u64>(&get, REQUEST_TIMEOUT_VAR)? {
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// `{endpoint}contentunderstanding/analyzers/{analyzer}:analyze?api-version=...`
    pub fn analyze_url(&self, analyzer_name: &str) -> Url {
        self.service_url(&[
            "contentunderstanding",
            "analyzers",
            &format!("{}:analyze", analyzer_name),
        ])
    }

    /// `{endpoint}contentunderstanding/analyzers/{analyzer}/results/{id}?api-version=...`
    pub fn result_url(&self, analyzer_name: &str, operation_id: &str) -> Url {
        self.service_url(&[
            "contentunderstanding",
            "analyzers",
            analyzer_name,
            "results",
            operation_id,
        ])
    }

    fn service_url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        // parse_endpoint only accepts http(s) URLs, which can always be a base
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        url
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn parse_endpoint(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("endpoint must not carry a query or fragment".into()));
    }

    Ok(url)
}

fn parse_number<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match get(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
    }
}

/// How long to keep polling an operation that reports `Running`.
///
/// The default has an interval but no bound on attempts or time: the loop
/// ends only when the service reports a terminal status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Delay between consecutive polls.
    pub interval: Duration,
    /// Give up after this many polls.
    pub max_attempts: Option<u32>,
    /// Give up after this much time spent polling.
    pub timeout: Option<Duration>,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_attempts: None,
            timeout: None,
        }
    }
}

impl WaitPolicy {
    /// Poll back-to-back with no bound.
    pub fn immediate() -> Self {
        Self {
            interval: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether another poll is allowed after `attempts` polls over `elapsed`.
    pub fn allows_another(&self, attempts: u32, elapsed: Duration) -> bool {
        if self.max_attempts.is_some_and(|max| attempts >= max) {
            return false;
        }
        if self.timeout.is_some_and(|timeout| elapsed >= timeout) {
            return false;
        }
        true
    }
}
