//! Client configuration.

use crate::error::{ApiError, ApiResult};
use purlhub_types::text::{sanitize, trim_slashes};
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Environment variable holding the API root URI.
pub const ENV_API_ROOT: &str = "PURLHUB_API_ROOT";
/// Environment variable holding the login.
pub const ENV_API_LOGIN: &str = "PURLHUB_API_LOGIN";
/// Environment variable holding the password.
pub const ENV_API_PASSWORD: &str = "PURLHUB_API_PASSWORD";

static PURLHUB_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"api(-dvlp)?\.purlhub\.(com|local)").expect("host pattern is valid")
});

/// Outbound request pacing shared by every store of one [`crate::Api`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// How many requests may start per `rate_per_ms` window.
    pub rate: u32,
    /// Window length in milliseconds.
    pub rate_per_ms: u64,
    /// How many requests may be in flight at once.
    pub concurrent: usize,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            rate: 10,
            rate_per_ms: 1000,
            concurrent: 10,
        }
    }
}

/// Connection settings for the purlHub API.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root URI (e.g. `https://api.purlhub.com`).
    pub base_url: String,
    /// HTTP Basic login.
    pub login: String,
    /// HTTP Basic password.
    pub password: String,
    #[serde(default)]
    pub throttle: ThrottleConfig,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.purlhub.com".to_string(),
            login: String::new(),
            password: String::new(),
            throttle: ThrottleConfig::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("throttle", &self.throttle)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ApiConfig {
    /// Builds a validated configuration for a purlHub endpoint.
    ///
    /// Credentials are sanitized, the root must be a purlHub API host and is
    /// always rewritten to `https`.
    pub fn new(base_url: &str, login: &str, password: &str) -> ApiResult<Self> {
        let config = Self {
            base_url: normalize_base_url(base_url)?,
            login: sanitize(login),
            password: sanitize(password),
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads [`ENV_API_ROOT`], [`ENV_API_LOGIN`] and [`ENV_API_PASSWORD`].
    pub fn from_env() -> ApiResult<Self> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| ApiError::Config(format!("{name} is not set")))
        };
        Self::new(&var(ENV_API_ROOT)?, &var(ENV_API_LOGIN)?, &var(ENV_API_PASSWORD)?)
    }

    /// Checks credentials, the base URL and throttle settings.
    pub fn validate(&self) -> ApiResult<()> {
        if self.login.chars().count() < 2 {
            return Err(ApiError::Config("A login is required!".to_string()));
        }
        if self.password.chars().count() < 2 {
            return Err(ApiError::Config("A password is required!".to_string()));
        }
        Url::parse(&self.base_url)
            .map_err(|e| ApiError::Config(format!("A baseURI is required! ({e})")))?;
        if self.throttle.rate == 0 || self.throttle.rate_per_ms == 0 || self.throttle.concurrent == 0
        {
            return Err(ApiError::Config(
                "throttle rate, window and concurrency must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Validates a purlHub API root, forces `https` and drops trailing slashes.
pub fn normalize_base_url(base_url: &str) -> ApiResult<String> {
    let base_url = sanitize(base_url);
    if !PURLHUB_HOST.is_match(&base_url) {
        return Err(ApiError::Config(format!(
            "A baseURI is required! {base_url:?} is not a purlHub API host"
        )));
    }

    let mut url = Url::parse(&base_url)
        .map_err(|e| ApiError::Config(format!("A baseURI is required! ({e})")))?;
    if url.scheme() != "https" {
        url.set_scheme("https")
            .map_err(|()| ApiError::Config(format!("cannot use https for {base_url}")))?;
    }
    Ok(trim_slashes(url.as_str()))
}
