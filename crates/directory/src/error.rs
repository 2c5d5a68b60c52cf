use thiserror::Error;

use crate::UserId;

/// Errors that can occur when interacting with the user directory.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// No user with the given id exists in the store.
    #[error("User not found: {0}")]
    NotFound(UserId),

    /// A user with the same id is already stored.
    #[error("User already exists: {0}")]
    DuplicateId(UserId),

    /// The user failed validation before being stored.
    #[error("Invalid user {id}: {reason}")]
    InvalidUser { id: UserId, reason: String },
}

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;
