//! Error types for teamsync-sync.

use thiserror::Error;

use teamsync_core::StoreError;

/// Failure of a single call against the remote platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The platform answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// All errors that abort a commit run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading remote state failed; nothing was written for this org.
    #[error("failed to read remote state for org '{org}': {source}")]
    RemoteRead {
        org: String,
        #[source]
        source: PlatformError,
    },

    /// An artifact could not be read or rendered.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience constructor for [`SyncError::RemoteRead`].
pub(crate) fn read_err(org: &str, source: PlatformError) -> SyncError {
    SyncError::RemoteRead {
        org: org.to_string(),
        source,
    }
}
