//! Client configuration.
//!
//! `ClientConfig` is plain data: it can be built in code with the `with_*`
//! setters or deserialized from any serde format. Validation happens once,
//! in `Client::new`.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::Error;

/// Production API origin. Every resource path is relative to it.
pub const BASE_URL: &str = "https://slimsurveys.com/api/";

pub const DEFAULT_FORMAT: &str = "json";
pub const DEFAULT_USER_AGENT: &str = "SlimSurveys-API-Client";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub key: String,
    pub token: Option<String>,
    /// Response format. Anything but `json` is requested via `?format=`.
    pub format: String,
    pub base_url: String,
    pub user_agent: String,
    #[serde(rename = "connect_timeout_secs", with = "secs")]
    pub connect_timeout: Duration,
    #[serde(rename = "timeout_secs", with = "secs")]
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            token: None,
            format: DEFAULT_FORMAT.to_string(),
            base_url: BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the configuration and return it with `base_url` normalized to
    /// end in exactly one `/` and an empty token dropped.
    pub(crate) fn validated(mut self) -> Result<Self, Error> {
        if self.key.trim().is_empty() {
            return Err(Error::Configuration("API key must not be empty".to_string()));
        }
        if self.format.trim().is_empty() {
            return Err(Error::Configuration("response format must not be empty".to_string()));
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::Configuration(format!("invalid base URL {:?}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "base URL must be http or https, got {}",
                url.scheme()
            )));
        }
        self.base_url = format!("{}/", self.base_url.trim_end_matches('/'));

        if self.token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            self.token = None;
        }
        Ok(self)
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
