//! User records and the repository they live in.
//!
//! - [`User`] and [`Role`]: the record type and its open set of role tags
//! - [`UserRepository`]: the store contract, with [`InMemoryUserRepository`]
//!   as the lock-guarded in-process implementation
//! - [`search`]: first-match position lookup over any slice
//! - [`Value`]: closed sum type for describing heterogeneous values

pub mod error;
pub mod memory;
pub mod search;
pub mod store;
pub mod user;
pub mod value;

pub use common::UserId;
pub use error::{DirectoryError, Result};
pub use memory::InMemoryUserRepository;
pub use store::{UserRepository, UserRepositoryExt};
pub use user::{Role, User};
pub use value::Value;
