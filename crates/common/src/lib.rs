//! Shared types for the user directory service.

pub mod types;

pub use types::UserId;
