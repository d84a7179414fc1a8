//! Client configuration.
//!
//! The service endpoint is derived from the API key: keys end in a
//! datacenter suffix (`...-us6`) and the API lives at
//! `https://us6.api.mailchimp.com/3.0`. An explicit endpoint overrides the
//! derivation, which is how tests point the client at a local server.

use std::time::Duration;

use crate::error::ApiError;

pub const API_VERSION_PATH: &str = "/3.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("chimp-core/", env!("CARGO_PKG_VERSION"));

pub const ENV_API_KEY: &str = "MAILCHIMP_API_KEY";
pub const ENV_ENDPOINT: &str = "MAILCHIMP_ENDPOINT";
pub const ENV_DEBUG: &str = "MAILCHIMP_DEBUG";
pub const ENV_TIMEOUT_SECS: &str = "MAILCHIMP_TIMEOUT_SECS";

#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    /// Base URL without a trailing slash. `None` derives it from the key.
    pub endpoint: Option<String>,
    pub debug: bool,
    pub timeout: Duration,
    pub user_agent: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("debug", &self.debug)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: None,
            debug: false,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Read configuration from `MAILCHIMP_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{ENV_API_KEY} is not set")))?;
        let mut config = Self::new(api_key.trim());

        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|e| !e.trim().is_empty()) {
            config = config.with_endpoint(endpoint.trim());
        }
        if let Some(debug) = lookup(ENV_DEBUG) {
            config.debug = matches!(debug.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| ApiError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds")))?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// The base URL requests are issued against.
    pub fn resolve_endpoint(&self) -> Result<String, ApiError> {
        match &self.endpoint {
            Some(endpoint) => Ok(endpoint.trim_end_matches('/').to_string()),
            None => {
                let dc = datacenter(&self.api_key).ok_or_else(|| {
                    ApiError::Config("API key has no datacenter suffix (expected `<key>-<dc>`)".to_string())
                })?;
                Ok(format!("https://{dc}.api.mailchimp.com{API_VERSION_PATH}"))
            }
        }
    }
}

/// The datacenter suffix of an API key: everything after the last `-`.
pub fn datacenter(api_key: &str) -> Option<&str> {
    let (_, dc) = api_key.rsplit_once('-')?;
    if dc.is_empty() || !dc.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(dc)
}
