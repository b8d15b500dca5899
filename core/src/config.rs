//! Client configuration.
//!
//! Plain serde data with defaults for every field, so a host can load it
//! from whatever format it already uses. Nothing here reads the process
//! environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "http://api.walkscore.com";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TIMEOUT_MS: u64 = 80_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub proxy: Option<String>,
    /// Total attempts for timed-out requests; `0` disables retrying.
    pub max_retries: u32,
    /// Per-attempt timeout.
    pub timeout_ms: u64,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub max_elapsed_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy: None,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            initial_backoff_ms: retry.initial_delay.as_millis() as u64,
            max_backoff_ms: retry.max_delay.as_millis() as u64,
            max_elapsed_ms: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::default().with_api_key(api_key)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff_ms = initial.as_millis() as u64;
        self.max_backoff_ms = max.as_millis() as u64;
        self
    }

    pub fn with_max_elapsed(mut self, ceiling: Duration) -> Self {
        self.max_elapsed_ms = Some(ceiling.as_millis() as u64);
        self
    }

    /// The configured key, treating an empty string as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Retry policy for a call, with an optional per-call attempt override.
    pub fn retry_policy(&self, max_retries: Option<u32>) -> RetryPolicy {
        RetryPolicy {
            max_attempts: max_retries.unwrap_or(self.max_retries).max(1),
            initial_delay: Duration::from_millis(self.initial_backoff_ms),
            max_delay: Duration::from_millis(self.max_backoff_ms),
            max_elapsed: self.max_elapsed_ms.map(Duration::from_millis),
        }
    }
}
