use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::reservation::ReservationStatus;

/// Lifecycle notifications pushed to websocket subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BookingEvent {
    OrderCreated {
        order_id: String,
        car_vin: String,
        user_id: String,
        total_price: f64,
        at: DateTime<Utc>,
    },
    PaymentRecorded {
        order_id: String,
        at: DateTime<Utc>,
    },
    ReservationConfirmed {
        reservation_id: String,
        car_vin: String,
        at: DateTime<Utc>,
    },
    OrderCancelled {
        order_id: String,
        at: DateTime<Utc>,
    },
    ReservationStatusChanged {
        reservation_id: String,
        status: ReservationStatus,
        at: DateTime<Utc>,
    },
}
