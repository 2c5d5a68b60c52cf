//! Reqwest-backed user source.
//!
//! This adapter owns transport details only: URL construction, the time
//! bound, HTTP status mapping and decoding the body into a user.

use std::time::Duration;

use async_trait::async_trait;
use common::UserId;
use directory::User;
use futures_util::future::{AbortRegistration, Abortable};
use reqwest::{Client, StatusCode};
use tokio::time::Instant;

use crate::config::FetchConfig;
use crate::decode::decode_user;
use crate::error::{FetchError, Result};
use crate::source::{UserSource, effective_bound};

/// Fetches one user per call from `{base_url}/users/{id}`.
pub struct HttpUserFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpUserFetcher {
    /// Builds a fetcher whose client enforces the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: FetchConfig) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetches a single user.
    ///
    /// The request, including reading the whole body, runs under the smaller
    /// of the configured timeout and the time left until `deadline`. Exactly
    /// one request is sent; a deadline that has already passed sends none.
    #[tracing::instrument(skip(self, id), fields(user_id = %id))]
    pub async fn fetch(&self, id: UserId, deadline: Option<Instant>) -> Result<User> {
        metrics::counter!("fetch_requests_total").increment(1);
        let started = Instant::now();
        let bound = effective_bound(self.config.timeout, deadline);

        let result = if bound.is_zero() {
            Err(FetchError::Timeout {
                id,
                elapsed: Duration::ZERO,
            })
        } else {
            match tokio::time::timeout(bound, self.request(id, started)).await {
                Ok(result) => result,
                // The request future is dropped here, which releases the
                // connection and any partially read body.
                Err(_) => Err(FetchError::Timeout {
                    id,
                    elapsed: started.elapsed(),
                }),
            }
        };

        metrics::histogram!("fetch_duration_seconds").record(started.elapsed().as_secs_f64());
        match &result {
            Ok(_) => tracing::debug!("user fetched"),
            Err(e) => {
                metrics::counter!("fetch_failures_total", "kind" => e.kind()).increment(1);
                tracing::warn!(error = %e, kind = e.kind(), "user fetch failed");
            }
        }
        result
    }

    /// Like [`fetch`](Self::fetch), but also stops as soon as the matching
    /// `AbortHandle` is aborted.
    pub async fn fetch_abortable(
        &self,
        id: UserId,
        deadline: Option<Instant>,
        registration: AbortRegistration,
    ) -> Result<User> {
        match Abortable::new(self.fetch(id, deadline), registration).await {
            Ok(result) => result,
            Err(_aborted) => {
                metrics::counter!("fetch_failures_total", "kind" => "cancelled").increment(1);
                tracing::info!(user_id = %id, "user fetch cancelled");
                Err(FetchError::Cancelled { id })
            }
        }
    }

    async fn request(&self, id: UserId, started: Instant) -> Result<User> {
        let url = self
            .config
            .user_url(id)
            .map_err(|e| FetchError::RequestConstruction {
                id,
                reason: e.to_string(),
            })?;

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| map_transport_error(id, started, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::Missing(id));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                id,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| map_transport_error(id, started, e))?;

        decode_user(&body).map_err(|source| FetchError::Decode { id, source })
    }
}

fn map_transport_error(id: UserId, started: Instant, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            id,
            elapsed: started.elapsed(),
        }
    } else {
        FetchError::Transport { id, source: error }
    }
}

#[async_trait]
impl UserSource for HttpUserFetcher {
    async fn fetch_user(&self, id: UserId, deadline: Option<Instant>) -> Result<User> {
        self.fetch(id, deadline).await
    }
}
