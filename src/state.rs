use std::sync::Arc;

use tokio::sync::broadcast;

use crate::catalog::Catalog;
use crate::engine::ids::OrderIdGenerator;
use crate::models::event::BookingEvent;
use crate::observability::metrics::Metrics;
use crate::store::{CollectionLocks, RecordStore};

/// Everything a request needs, constructed once at process start.
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub catalog: Catalog,
    pub locks: CollectionLocks,
    pub ids: OrderIdGenerator,
    pub booking_events_tx: broadcast::Sender<BookingEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, catalog: Catalog, event_buffer_size: usize) -> Self {
        let (booking_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            store,
            catalog,
            locks: CollectionLocks::new(),
            ids: OrderIdGenerator::new(),
            booking_events_tx,
            metrics: Metrics::new(),
        }
    }

    pub fn publish(&self, event: BookingEvent) {
        // No subscribers is the normal case outside of websocket sessions.
        let _ = self.booking_events_tx.send(event);
    }
}
