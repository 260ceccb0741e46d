//! Error taxonomy for the Genius client.
//!
//! Construction problems are `ConfigError`, single-request failures are
//! `TransportError`. "No match" is never an error: the resolver returns
//! `Ok(None)` for it.

use thiserror::Error;

use crate::config::ACCESS_TOKEN_ENV;

/// Raised while building a client, before any request is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no access token provided and {} not found in environment", ACCESS_TOKEN_ENV)]
    MissingAccessToken,

    #[error("invalid base URL '{0}': expected an http(s) URL")]
    InvalidBaseUrl(String),
}

/// Underlying reason a request failed.
#[derive(Debug, Error)]
pub enum TransportCause {
    /// The server answered with a non-success status.
    #[error("HTTP status {code}")]
    Status { code: u16 },

    /// Connection, DNS, TLS or timeout failure.
    #[error(transparent)]
    Network(#[from] ureq::Transport),

    /// The body could not be read or was not valid JSON.
    #[error("invalid JSON body: {0}")]
    Decode(#[from] std::io::Error),
}

impl From<ureq::Error> for TransportCause {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => TransportCause::Status { code },
            ureq::Error::Transport(transport) => TransportCause::Network(transport),
        }
    }
}

/// One authorized GET did not produce a JSON body.
#[derive(Debug, Error)]
#[error("Genius API request failed ({path}): {cause}")]
pub struct TransportError {
    pub path: String,
    #[source]
    pub cause: TransportCause,
}

impl TransportError {
    pub fn new(path: impl Into<String>, cause: impl Into<TransportCause>) -> Self {
        Self {
            path: path.into(),
            cause: cause.into(),
        }
    }

    /// HTTP status code, when the failure was a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self.cause {
            TransportCause::Status { code } => Some(code),
            _ => None,
        }
    }
}
