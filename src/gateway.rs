//! Authorized GET requests against the Genius API.
//!
//! `JsonFetch` is the seam the resolver works against; `GeniusClient` is the
//! `ureq`-backed implementation. One attempt per request, no retries.

use log::debug;
use serde_json::Value;

use crate::config::GeniusConfig;
use crate::error::{ConfigError, TransportError};

/// Fetch one JSON document from a path relative to the API base URL.
pub trait JsonFetch {
    fn fetch(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, TransportError>;
}

impl<T: JsonFetch + ?Sized> JsonFetch for &T {
    fn fetch(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, TransportError> {
        (**self).fetch(path, query)
    }
}

/// Genius API client. Owns its own connection agent and credential.
pub struct GeniusClient {
    config: GeniusConfig,
    agent: ureq::Agent,
}

impl GeniusClient {
    pub fn new(config: GeniusConfig) -> Result<Self, ConfigError> {
        if config.access_token.is_empty() {
            return Err(ConfigError::MissingAccessToken);
        }
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Ok(Self { config, agent })
    }

    /// Client with default settings; token from `explicit`, else the environment.
    pub fn from_env(explicit: Option<String>) -> Result<Self, ConfigError> {
        Self::new(GeniusConfig::from_env(explicit)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

impl JsonFetch for GeniusClient {
    fn fetch(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, TransportError> {
        debug!("GET {} {:?}", path, query);

        let mut request = self
            .agent
            .get(&self.url(path))
            .set("Authorization", &format!("Bearer {}", self.config.access_token));
        for &(key, value) in query {
            request = request.query(key, value);
        }

        let response = request
            .call()
            .map_err(|err| TransportError::new(path, err))?;
        response
            .into_json::<Value>()
            .map_err(|err| TransportError::new(path, err))
    }
}
