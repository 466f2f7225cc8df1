use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tracing::{error, info};

use crate::engine::booking::sweep_abandoned_orders;
use crate::state::AppState;

/// Periodically drops unpaid temporary orders older than `ttl`.
pub async fn run_order_sweeper(state: Arc<AppState>, every: StdDuration, ttl: Duration) {
    let mut interval = tokio::time::interval(every);
    // The first tick completes immediately; skip it so startup stays quiet.
    interval.tick().await;

    loop {
        interval.tick().await;
        match sweep_abandoned_orders(&state, ttl, Utc::now()).await {
            Ok(removed) if removed.is_empty() => {}
            Ok(removed) => info!(count = removed.len(), "swept abandoned temporary orders"),
            Err(err) => error!(error = %err, "temporary order sweep failed"),
        }
    }
}
