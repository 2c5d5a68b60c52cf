//! Bounded fan-out of a transform over user records.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use common::UserId;
use directory::User;
use futures_util::future::AbortHandle;
use tokio::sync::{Mutex, mpsc};
use tracing::Instrument;

use crate::error::ItemFailure;
use crate::guard::guarded_async;

pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Worker pool sizing.
///
/// Reads from environment variables:
/// - `DIRECTORY_WORKERS` — number of concurrent workers (default: `4`)
/// - `DIRECTORY_QUEUE_CAPACITY` — work and result queue depth (default: `64`)
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub workers: usize,
    pub queue_capacity: usize,
}

impl BatchConfig {
    pub fn new(workers: usize, queue_capacity: usize) -> Self {
        Self {
            workers: workers.max(1),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("DIRECTORY_WORKERS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(DEFAULT_WORKERS),
            std::env::var("DIRECTORY_QUEUE_CAPACITY")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),
        )
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS, DEFAULT_QUEUE_CAPACITY)
    }
}

/// Outcome of one batch item, tagged with the id of the record it came from.
#[derive(Debug)]
pub struct BatchOutcome<T, E> {
    pub id: UserId,
    pub result: Result<T, ItemFailure<E>>,
}

impl<T, E> BatchOutcome<T, E> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs a transform over many records on a fixed pool of workers.
///
/// Records are fed through a bounded queue, so a large batch never has more
/// than `workers` transforms running or `queue_capacity` records waiting.
/// Outcomes arrive in completion order.
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    config: BatchConfig,
}

impl BatchProcessor {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Starts processing `records` and returns the outcome channel.
    ///
    /// The channel yields exactly one outcome per record and then closes.
    /// Must be called from within a tokio runtime.
    pub fn process<T, E, F, Fut>(
        &self,
        records: Vec<User>,
        transform: F,
    ) -> mpsc::Receiver<BatchOutcome<T, E>>
    where
        F: Fn(User) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (never_aborted, _registration) = AbortHandle::new_pair();
        self.process_with_abort(records, transform, never_aborted)
    }

    /// Like [`process`](Self::process), but stops starting new items once
    /// `abort` is aborted.
    ///
    /// Items already running finish normally. Every item that never started
    /// is still reported, as [`ItemFailure::Cancelled`].
    #[tracing::instrument(skip_all, fields(records = records.len(), workers = self.config.workers))]
    pub fn process_with_abort<T, E, F, Fut>(
        &self,
        records: Vec<User>,
        transform: F,
        abort: AbortHandle,
    ) -> mpsc::Receiver<BatchOutcome<T, E>>
    where
        F: Fn(User) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let workers = self.config.workers.min(records.len()).max(1);
        let (work_tx, work_rx) = mpsc::channel::<User>(self.config.queue_capacity);
        let (result_tx, result_rx) = mpsc::channel(self.config.queue_capacity);
        let work_rx = Arc::new(Mutex::new(work_rx));
        let transform = Arc::new(transform);

        metrics::counter!("batch_items_total").increment(records.len() as u64);

        for worker in 0..workers {
            let work_rx = Arc::clone(&work_rx);
            let result_tx = result_tx.clone();
            let transform = Arc::clone(&transform);
            let abort = abort.clone();

            tokio::spawn(
                async move {
                    loop {
                        let next = work_rx.lock().await.recv().await;
                        let Some(user) = next else {
                            break;
                        };
                        let outcome = if abort.is_aborted() {
                            cancelled(user.id())
                        } else {
                            run_item(Arc::clone(&transform), user).await
                        };
                        if result_tx.send(outcome).await.is_err() {
                            tracing::debug!("outcome receiver dropped, worker stopping");
                            break;
                        }
                    }
                }
                .instrument(tracing::debug_span!("batch_worker", worker)),
            );
        }

        tokio::spawn(
            async move {
                let mut pending = records.into_iter();
                while let Some(user) = pending.next() {
                    if abort.is_aborted() {
                        let skipped = std::iter::once(user).chain(pending.by_ref());
                        for user in skipped {
                            if result_tx.send(cancelled(user.id())).await.is_err() {
                                break;
                            }
                        }
                        tracing::info!("batch aborted, remaining records cancelled");
                        break;
                    }
                    // Blocks while the queue is full.
                    if work_tx.send(user).await.is_err() {
                        break;
                    }
                }
            }
            .instrument(tracing::debug_span!("batch_feeder")),
        );

        result_rx
    }

    /// Processes `records` and collects every outcome.
    pub async fn process_all<T, E, F, Fut>(
        &self,
        records: Vec<User>,
        transform: F,
    ) -> Vec<BatchOutcome<T, E>>
    where
        F: Fn(User) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let expected = records.len();
        let mut outcomes = Vec::with_capacity(expected);
        let mut rx = self.process(records, transform);
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }
        tracing::debug!(outcomes = outcomes.len(), expected, "batch drained");
        outcomes
    }
}

async fn run_item<T, E, F, Fut>(transform: Arc<F>, user: User) -> BatchOutcome<T, E>
where
    F: Fn(User) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let id = user.id();
    // Calling the transform happens inside the guard too, so a panic before
    // the first await is caught the same way as one after it.
    let result = match guarded_async(async move { transform(user).await }).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ItemFailure::Failed(e)),
        Err(recovered) => {
            metrics::counter!("batch_items_recovered_total").increment(1);
            Err(ItemFailure::Recovered(recovered))
        }
    };
    BatchOutcome { id, result }
}

fn cancelled<T, E>(id: UserId) -> BatchOutcome<T, E> {
    metrics::counter!("batch_items_cancelled_total").increment(1);
    BatchOutcome {
        id,
        result: Err(ItemFailure::Cancelled),
    }
}

/// Transform that labels a record as processed.
pub async fn label_processed(user: User) -> Result<String, Infallible> {
    Ok(format!("Processed: {}", user.name()))
}
