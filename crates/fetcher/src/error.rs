use std::time::Duration;

use common::UserId;
use thiserror::Error;

/// Errors that can occur while fetching a user from a remote source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be built (for example, a malformed base URL).
    #[error("Failed to create request for user {id}: {reason}")]
    RequestConstruction { id: UserId, reason: String },

    /// The transport failed before a complete response arrived.
    #[error("Failed to fetch user {id}: {source}")]
    Transport { id: UserId, source: reqwest::Error },

    /// The time bound expired before the response body was fully read.
    #[error("Fetching user {id} timed out after {elapsed:?}")]
    Timeout { id: UserId, elapsed: Duration },

    /// The caller aborted the fetch.
    #[error("Fetching user {id} was cancelled")]
    Cancelled { id: UserId },

    /// The source answered with a non-success status.
    #[error("Fetching user {id} returned HTTP {status}")]
    Status { id: UserId, status: u16 },

    /// The response body did not decode into a user.
    #[error("Failed to decode user {id}: {source}")]
    Decode {
        id: UserId,
        source: serde_json::Error,
    },

    /// The source has no record for this id.
    #[error("User {0} not present at source")]
    Missing(UserId),
}

impl FetchError {
    /// Returns the id of the user the failed fetch was for.
    pub fn id(&self) -> UserId {
        match self {
            FetchError::RequestConstruction { id, .. }
            | FetchError::Transport { id, .. }
            | FetchError::Timeout { id, .. }
            | FetchError::Cancelled { id }
            | FetchError::Status { id, .. }
            | FetchError::Decode { id, .. } => *id,
            FetchError::Missing(id) => *id,
        }
    }

    /// True for failures of the transport itself: network errors, expired
    /// bounds, cancellation and error statuses. These are the ones a caller
    /// may reasonably retry.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FetchError::Transport { .. }
                | FetchError::Timeout { .. }
                | FetchError::Cancelled { .. }
                | FetchError::Status { .. }
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::RequestConstruction { .. } => "request",
            FetchError::Transport { .. } => "transport",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Cancelled { .. } => "cancelled",
            FetchError::Status { .. } => "status",
            FetchError::Decode { .. } => "decode",
            FetchError::Missing(_) => "missing",
        }
    }
}

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
