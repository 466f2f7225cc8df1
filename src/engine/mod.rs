pub mod availability;
pub mod booking;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod payment;
pub mod queries;
pub mod sweeper;

use std::future::Future;
use std::time::Instant;

use crate::error::AppError;
use crate::state::AppState;

/// Runs one lifecycle stage and records its outcome and latency.
pub(crate) async fn observe<T, F>(state: &AppState, stage: &str, operation: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    let start = Instant::now();
    let result = operation.await;
    state
        .metrics
        .record_transition(stage, result.is_ok(), start.elapsed().as_secs_f64());
    result
}
