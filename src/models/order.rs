use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::date_range::DateRange;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Credit,
    Debit,
    Paypal,
}

/// What is kept of a simulated payment. Card numbers and CVVs are never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    pub last_four: String,
    pub processed_at: DateTime<Utc>,
}

/// Payment details as found on disk. Unpaid orders written by the old
/// storefront carry `{"method": "", "lastFour": "", "processedAt": ""}`, and
/// its paid orders kept the submitted form fields instead of `lastFour`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPaymentDetails {
    #[serde(default)]
    method: String,
    #[serde(default)]
    payment_method: String,
    #[serde(default)]
    last_four: String,
    #[serde(default)]
    card_number: String,
    #[serde(default)]
    processed_at: String,
}

/// Reads `paymentDetails`, mapping the empty placeholder to `None`.
pub(crate) fn stored_payment_details<'de, D>(deserializer: D) -> Result<Option<PaymentDetails>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(stored) = Option::<StoredPaymentDetails>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let method = if stored.method.trim().is_empty() {
        stored.payment_method.trim()
    } else {
        stored.method.trim()
    };
    if method.is_empty() {
        return Ok(None);
    }

    let method = match method.to_ascii_lowercase().as_str() {
        "credit" => PaymentMethod::Credit,
        "debit" => PaymentMethod::Debit,
        "paypal" => PaymentMethod::Paypal,
        other => return Err(D::Error::custom(format!("unknown payment method {other:?}"))),
    };

    let last_four = if stored.last_four.is_empty() {
        let digits: Vec<char> = stored.card_number.chars().filter(char::is_ascii_digit).collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    } else {
        stored.last_four
    };

    let processed_at = DateTime::parse_from_rfc3339(stored.processed_at.trim())
        .map_err(|err| D::Error::custom(format!("invalid processedAt: {err}")))?
        .with_timezone(&Utc);

    Ok(Some(PaymentDetails {
        method,
        last_four,
        processed_at,
    }))
}

/// Provisional booking awaiting payment and confirmation.
///
/// Booking fields are optional because the record is re-read from storage
/// before confirmation and every one of them is checked again there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryOrder {
    pub id: String,
    pub user_id: Option<String>,
    pub car_vin: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub pickup_location_id: Option<String>,
    pub return_location_id: Option<String>,
    pub total_price: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(
        default,
        deserialize_with = "stored_payment_details",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_details: Option<PaymentDetails>,
    pub created_at: DateTime<Utc>,
}

impl TemporaryOrder {
    pub fn range(&self) -> Option<DateRange> {
        match (self.start_date, self.end_date) {
            (Some(start_date), Some(end_date)) => Some(DateRange {
                start_date,
                end_date,
            }),
            _ => None,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}
