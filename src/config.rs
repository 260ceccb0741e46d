//! Client configuration: credential, base URL and request timeout.

use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable holding the Genius API access token.
pub const ACCESS_TOKEN_ENV: &str = "ACCESS_TOKEN";

pub const DEFAULT_BASE_URL: &str = "https://api.genius.com";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings owned by one `GeniusClient`.
#[derive(Clone, Debug)]
pub struct GeniusConfig {
    pub access_token: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeniusConfig {
    /// Build a config from an explicit token with default base URL and timeout.
    pub fn new(access_token: impl Into<String>) -> Result<Self, ConfigError> {
        let access_token = access_token.into();
        if access_token.is_empty() {
            return Err(ConfigError::MissingAccessToken);
        }
        Ok(Self {
            access_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Prefer a non-empty explicit token, else `ACCESS_TOKEN` (a `.env` file is loaded first).
    pub fn from_env(explicit: Option<String>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let token = pick_token(explicit, std::env::var(ACCESS_TOKEN_ENV).ok())
            .ok_or(ConfigError::MissingAccessToken)?;
        Self::new(token)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    /// Zero is not accepted: every request must be bounded.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.timeout = timeout;
        }
        self
    }
}

/// Empty strings count as "not provided" on both sides.
fn pick_token(explicit: Option<String>, env: Option<String>) -> Option<String> {
    explicit
        .filter(|t| !t.is_empty())
        .or_else(|| env.filter(|t| !t.is_empty()))
}
