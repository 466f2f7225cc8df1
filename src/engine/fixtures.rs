use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::models::date_range::DateRange;
use crate::models::order::PaymentStatus;
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::state::AppState;
use crate::store::{write_records, MemoryStore, RecordStore, RESERVATIONS};

pub const CAMRY_VIN: &str = "1HGBH41JXMN109186";
pub const DEMO_USER: &str = "user-1";

pub fn test_state() -> AppState {
    state_with_store(Arc::new(MemoryStore::new()))
}

pub fn range(start: &str, end: &str) -> DateRange {
    DateRange::parse(start, end).unwrap()
}

pub fn reservation(id: &str, vin: &str, start: &str, end: &str) -> Reservation {
    let range = range(start, end);
    Reservation {
        id: id.to_string(),
        car_vin: vin.to_string(),
        user_id: DEMO_USER.to_string(),
        start_date: range.start_date,
        end_date: range.end_date,
        pickup_location_id: "loc-1".to_string(),
        return_location_id: "loc-1".to_string(),
        total_price: 240.0,
        status: ReservationStatus::Confirmed,
        created_at: Utc::now(),
        payment_status: PaymentStatus::Paid,
        payment_details: None,
    }
}

pub async fn seed_reservations(state: &AppState, reservations: &[Reservation]) {
    write_records(state.store.as_ref(), &RESERVATIONS, reservations)
        .await
        .unwrap();
}

/// Memory store whose writes to one collection can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: std::sync::Mutex<Option<&'static str>>,
}

impl FlakyStore {
    pub fn fail_writes_to(&self, collection: &'static str) {
        *self.failing.lock().unwrap() = Some(collection);
    }

    pub fn heal(&self) {
        *self.failing.lock().unwrap() = None;
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn read_raw(&self, name: &str) -> Result<Option<Vec<u8>>, AppError> {
        self.inner.read_raw(name).await
    }

    async fn write_raw(&self, name: &str, bytes: &[u8]) -> Result<(), AppError> {
        if *self.failing.lock().unwrap() == Some(name) {
            return Err(AppError::Storage(format!("disk full writing {name}")));
        }
        self.inner.write_raw(name, bytes).await
    }
}

pub fn state_with_store(store: Arc<dyn RecordStore>) -> AppState {
    AppState::new(store, Catalog::seeded().unwrap(), 64)
}
