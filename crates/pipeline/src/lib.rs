//! Concurrent work over user records.
//!
//! - [`guard`]: turns a panicking unit of work into a [`RecoveredFailure`]
//! - [`BatchProcessor`]: fans a transform out over a bounded worker pool and
//!   hands back every outcome on a channel that closes when the batch is done
//! - [`Resolver`]: looks a user up locally, fetching and caching it on a miss
//! - [`retry`]: opt-in caller-side retry around a single-shot fetch

pub mod batch;
pub mod error;
pub mod guard;
pub mod resolve;
pub mod retry;

pub use batch::{BatchConfig, BatchOutcome, BatchProcessor, label_processed};
pub use error::{ItemFailure, RecoveredFailure, ResolveError};
pub use guard::{guarded, guarded_async};
pub use resolve::Resolver;
pub use retry::{RetryingSource, fetch_with_retry};
