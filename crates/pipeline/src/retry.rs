//! Caller-side retry for single-shot fetches.

use std::time::Duration;

use async_trait::async_trait;
use common::UserId;
use directory::User;
use fetcher::{FetchError, UserSource};
use tokio::time::Instant;

/// Delay before the first retry; doubles for each one after.
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(50);

/// Fetches a user, retrying transport failures up to `max_retries` times.
///
/// Decode errors, missing users and cancellation are returned at once. No
/// retry is started that could not begin before `deadline`.
#[tracing::instrument(skip(source, id), fields(user_id = %id))]
pub async fn fetch_with_retry<S>(
    source: &S,
    id: UserId,
    deadline: Option<Instant>,
    max_retries: u32,
) -> Result<User, FetchError>
where
    S: UserSource + ?Sized,
{
    let mut attempt: u32 = 0;
    loop {
        let error = match source.fetch_user(id, deadline).await {
            Ok(user) => return Ok(user),
            Err(e) => e,
        };

        let retryable = error.is_transport() && !matches!(error, FetchError::Cancelled { .. });
        if !retryable || attempt >= max_retries {
            return Err(error);
        }

        let delay = RETRY_BASE_DELAY.saturating_mul(2u32.saturating_pow(attempt));
        if deadline.is_some_and(|d| Instant::now() + delay >= d) {
            tracing::debug!("no time left for another attempt");
            return Err(error);
        }

        attempt += 1;
        tracing::info!(attempt, error = %error, ?delay, "retrying user fetch");
        tokio::time::sleep(delay).await;
    }
}

/// A [`UserSource`] that retries its inner source with [`fetch_with_retry`].
pub struct RetryingSource<S> {
    inner: S,
    max_retries: u32,
}

impl<S: UserSource> RetryingSource<S> {
    pub fn new(inner: S, max_retries: u32) -> Self {
        Self { inner, max_retries }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: UserSource> UserSource for RetryingSource<S> {
    async fn fetch_user(&self, id: UserId, deadline: Option<Instant>) -> fetcher::Result<User> {
        fetch_with_retry(&self.inner, id, deadline, self.max_retries).await
    }
}
