//! Pipeline error types.

use common::UserId;
use directory::DirectoryError;
use fetcher::FetchError;
use thiserror::Error;

/// A unit of work panicked and was stopped at the recovery boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Recovered from panic: {cause}")]
pub struct RecoveredFailure {
    /// The panic message, or `"unknown panic"` for non-string payloads.
    pub cause: String,
}

/// Why a single batch item produced no value.
#[derive(Debug, Error)]
pub enum ItemFailure<E> {
    /// The transform returned an error.
    #[error("{0}")]
    Failed(E),

    /// The transform panicked.
    #[error(transparent)]
    Recovered(RecoveredFailure),

    /// The batch was aborted before the item started.
    #[error("Cancelled before processing")]
    Cancelled,
}

/// Errors that can occur while resolving a user.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The local directory failed.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// The remote fetch failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The remote fetch panicked.
    #[error(transparent)]
    Recovered(#[from] RecoveredFailure),

    /// The source answered with a different user than the one asked for.
    #[error("Requested user {requested} but source returned {received}")]
    IdMismatch { requested: UserId, received: UserId },
}
