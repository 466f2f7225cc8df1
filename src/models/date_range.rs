use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Rental interval. Both ends are inclusive when checking for overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Result<Self, AppError> {
        if end_date < start_date {
            return Err(AppError::validation(
                "endDate",
                "must not be earlier than startDate",
            ));
        }

        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Parses a pair of request dates. Accepts RFC 3339 instants or plain
    /// `YYYY-MM-DD` dates, which are taken as midnight UTC.
    pub fn parse(start: &str, end: &str) -> Result<Self, AppError> {
        let start_date = parse_instant("startDate", start)?;
        let end_date = parse_instant("endDate", end)?;
        Self::new(start_date, end_date)
    }

    /// Same-day requests are widened to a one-day span.
    pub fn normalized(self) -> Result<Self, AppError> {
        if self.start_date != self.end_date {
            return Ok(self);
        }

        let end_date = self
            .start_date
            .checked_add_signed(Duration::days(1))
            .ok_or_else(|| AppError::validation("endDate", "is outside the supported date range"))?;

        Ok(Self {
            start_date: self.start_date,
            end_date,
        })
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start_date <= other.end_date && self.end_date >= other.start_date
    }

    /// Billable days: partial days round up, never less than one.
    pub fn rental_days(&self) -> i64 {
        let seconds = (self.end_date - self.start_date).num_seconds();
        let days = (seconds + SECONDS_PER_DAY - 1).div_euclid(SECONDS_PER_DAY);
        days.max(1)
    }
}

pub fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::missing(field));
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            AppError::validation(field, format!("expected YYYY-MM-DD or RFC 3339, got {raw:?}"))
        })
}
