//! Recovery boundary for work that may panic.
//!
//! Work units are expected to report failure through `Result`. These
//! wrappers exist for collaborators that still abort abruptly: the panic is
//! caught once, logged once, and handed back as a [`RecoveredFailure`].

use std::any::Any;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};

use futures_util::FutureExt;

use crate::error::RecoveredFailure;

/// Runs `work`, converting a panic into a [`RecoveredFailure`].
pub fn guarded<T, F>(work: F) -> Result<T, RecoveredFailure>
where
    F: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(work)).map_err(recovered)
}

/// Awaits `work`, converting a panic at any poll into a [`RecoveredFailure`].
pub async fn guarded_async<F>(work: F) -> Result<F::Output, RecoveredFailure>
where
    F: Future,
{
    AssertUnwindSafe(work).catch_unwind().await.map_err(recovered)
}

fn recovered(payload: Box<dyn Any + Send>) -> RecoveredFailure {
    let cause = panic_payload_to_string(&payload);
    metrics::counter!("pipeline_panics_recovered_total").increment(1);
    tracing::warn!(%cause, "recovered from panic");
    RecoveredFailure { cause }
}

fn panic_payload_to_string(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
