//! Client configuration: credential loading and env-overridable defaults.
//!
//! The credential is read exactly once, at startup, and then passed by value
//! into clients. Nothing below the config layer touches the process
//! environment.

use crate::{Error, ErrorContext, Result};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Environment variable holding the bearer token.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Optional base URL override (mock servers, proxies).
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
/// Optional request timeout in seconds.
pub const TIMEOUT_ENV: &str = "GRADER_HTTP_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Immutable client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: Url,
    timeout: Duration,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Fails with a configuration error naming [`API_KEY_ENV`] when the key is
    /// absent or empty. There is no fallback value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            Error::configuration_with_context(
                format!("{} is required but not set", API_KEY_ENV),
                ErrorContext::new()
                    .with_field_path(API_KEY_ENV)
                    .with_source("config"),
            )
        })?;

        let mut builder = ClientConfigBuilder::new().api_key(api_key);
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            builder = builder.base_url(url);
        }
        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|t| !t.trim().is_empty()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|&s| s > 0)
                .ok_or_else(|| {
                    Error::configuration_with_context(
                        "timeout must be a positive whole number of seconds",
                        ErrorContext::new()
                            .with_field_path(TIMEOUT_ENV)
                            .with_details(raw.clone()),
                    )
                })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Join a path onto the base URL, keeping any path prefix of the base.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for [`ClientConfig`], primarily for tests and programmatic use.
pub struct ClientConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Duration,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the base URL (mock servers in tests).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let api_key = self.api_key.ok_or_else(|| {
            Error::configuration_with_context(
                "API key must be specified",
                ErrorContext::new().with_field_path(API_KEY_ENV),
            )
        })?;
        let raw = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path(BASE_URL_ENV)
                    .with_details(raw.clone()),
            )
        })?;
        Ok(ClientConfig {
            api_key,
            base_url,
            timeout: self.timeout,
        })
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
