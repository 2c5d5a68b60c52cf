//! User source trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::UserId;
use directory::User;
use tokio::time::Instant;

use crate::error::{FetchError, Result};

/// A remote place users can be fetched from, one at a time.
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Fetches one user, giving up once `deadline` (if any) has passed.
    async fn fetch_user(&self, id: UserId, deadline: Option<Instant>) -> Result<User>;
}

/// Time a fetch may take: the configured timeout, cut short by the caller's
/// deadline when that comes first. Zero once the deadline has passed.
pub fn effective_bound(timeout: Duration, deadline: Option<Instant>) -> Duration {
    match deadline {
        Some(deadline) => deadline.saturating_duration_since(Instant::now()).min(timeout),
        None => timeout,
    }
}

#[derive(Debug, Default)]
struct InMemorySourceState {
    users: HashMap<UserId, User>,
    latency: Duration,
    fetch_count: usize,
    fail_on_fetch: bool,
    panic_on_fetch: bool,
}

/// In-memory user source for testing.
///
/// Simulates latency, transport failures and collaborators that panic.
#[derive(Debug, Clone)]
pub struct InMemoryUserSource {
    state: Arc<RwLock<InMemorySourceState>>,
    timeout: Duration,
}

impl Default for InMemoryUserSource {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            timeout: crate::config::DEFAULT_TIMEOUT,
        }
    }
}

impl InMemoryUserSource {
    /// Creates a new empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source holding `users`.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let source = Self::new();
        for user in users {
            source.insert(user);
        }
        source
    }

    /// Adds or replaces a user.
    pub fn insert(&self, user: User) {
        self.write_state().users.insert(user.id(), user);
    }

    /// Delays every fetch by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.write_state().latency = latency;
    }

    /// Configures the source to fail every fetch with a transport-class error.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.write_state().fail_on_fetch = fail;
    }

    /// Configures the source to panic inside every fetch.
    pub fn set_panic_on_fetch(&self, panic: bool) {
        self.write_state().panic_on_fetch = panic;
    }

    /// Returns how many fetches have been attempted.
    pub fn fetch_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .fetch_count
    }

    // A panicking fetch may poison the lock; the state itself stays valid.
    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, InMemorySourceState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UserSource for InMemoryUserSource {
    async fn fetch_user(&self, id: UserId, deadline: Option<Instant>) -> Result<User> {
        let (latency, fail, panic, found) = {
            let mut state = self.write_state();
            state.fetch_count += 1;
            (
                state.latency,
                state.fail_on_fetch,
                state.panic_on_fetch,
                state.users.get(&id).cloned(),
            )
        };

        let bound = effective_bound(self.timeout, deadline);
        if tokio::time::timeout(bound, tokio::time::sleep(latency))
            .await
            .is_err()
        {
            return Err(FetchError::Timeout { id, elapsed: bound });
        }

        if panic {
            panic!("user source crashed while fetching {id}");
        }
        if fail {
            return Err(FetchError::Status { id, status: 503 });
        }

        found.ok_or(FetchError::Missing(id))
    }
}
