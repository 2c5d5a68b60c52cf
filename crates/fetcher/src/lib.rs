//! Remote user retrieval.
//!
//! One request per fetch, bounded by the smaller of the configured timeout
//! and the caller's deadline, and abortable from the outside. Every failure
//! comes back as a [`FetchError`] carrying the requested id.

pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod source;

pub use config::FetchConfig;
pub use decode::{ApiResponse, decode_user};
pub use error::{FetchError, Result};
pub use http::HttpUserFetcher;
pub use source::{InMemoryUserSource, UserSource};
