//! Error types returned by the IBPT client.

use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A request that is not well-formed. Never retried.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("request is required")]
    MissingPayload,
    #[error("token is required")]
    MissingToken,
    #[error("CNPJ is required")]
    MissingRegistrationId,
    #[error("code is required")]
    MissingCode,
    /// UF is only required for codes longer than two characters.
    #[error("UF is required for codes longer than 2 characters")]
    MissingJurisdiction,
    #[error("description is required")]
    MissingDescription,
    #[error("unit of measurement is required")]
    MissingUnitMeasurement,
}

/// Failures below the HTTP status line: network errors, cancellation and deadlines.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("error when sending request to the server: {0}")]
    Request(#[source] reqwest::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Rejected construction-time options.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid endpoint {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("invalid timeout {0:?}: must be greater than zero")]
    InvalidTimeout(Duration),

    #[error("unknown lookup kind {0:?}: expected product or service")]
    UnknownKind(String),
}

/// Top-level error for every client operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{}", describe_status(.status, .status_text))]
    Server { status: u16, status_text: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

fn describe_status(status: &u16, status_text: &str) -> String {
    if *status >= 500 {
        format!("server error {}: {}", status, status_text)
    } else {
        format!("unexpected status {}: {}", status, status_text)
    }
}

impl Error {
    /// HTTP status carried by a [`Error::Server`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// True for a 5xx [`Error::Server`].
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| s >= 500)
    }

    /// True when the failure came from the context being cancelled or timing out.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Error::Transport(TransportError::Cancelled | TransportError::DeadlineExceeded)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Transport(TransportError::Request(error))
    }
}
