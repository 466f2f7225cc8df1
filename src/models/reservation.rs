use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::date_range::DateRange;
use crate::models::order::{stored_payment_details, PaymentDetails, PaymentStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Confirmed")]
    Confirmed,
    #[serde(alias = "Completed")]
    Completed,
    #[serde(alias = "Cancelled")]
    Cancelled,
}

impl ReservationStatus {
    /// Cancelled reservations no longer hold the vehicle.
    pub fn blocks_vehicle(self) -> bool {
        self != ReservationStatus::Cancelled
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Completed => "Completed",
            ReservationStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// Durable booking of record, created once when a paid order is confirmed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Same id as the temporary order it was promoted from.
    pub id: String,
    pub car_vin: String,
    pub user_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pickup_location_id: String,
    pub return_location_id: String,
    pub total_price: f64,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    #[serde(
        default,
        deserialize_with = "stored_payment_details",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_details: Option<PaymentDetails>,
}

impl Reservation {
    pub fn range(&self) -> DateRange {
        DateRange {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}
