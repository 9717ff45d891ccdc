//! Error types for teamsync-remote.

use thiserror::Error;

use teamsync_sync::PlatformError;

/// A failed HTTP exchange with either remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// Non-2xx response; `body` is the raw response text.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<HttpError> for PlatformError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Status { status, body } => PlatformError::Http { status, body },
            HttpError::Transport(msg) => PlatformError::Transport(msg),
            HttpError::Decode(msg) => PlatformError::Decode(msg),
        }
    }
}

/// Errors from the record source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to fetch table '{table}': {source}")]
    Fetch {
        table: String,
        #[source]
        source: HttpError,
    },
}

/// Required configuration is absent. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),
}
