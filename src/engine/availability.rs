use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::AppError;
use crate::models::date_range::DateRange;
use crate::models::reservation::Reservation;
use crate::models::vehicle::VehicleAvailability;
use crate::state::AppState;
use crate::store::{read_records, RESERVATIONS};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_reservation: Option<Reservation>,
}

/// First reservation, in stored order, that holds `vin` during `range`.
pub fn first_conflict<'a>(
    reservations: &'a [Reservation],
    vin: &str,
    range: &DateRange,
) -> Option<&'a Reservation> {
    reservations.iter().find(|reservation| {
        reservation.car_vin == vin
            && reservation.status.blocks_vehicle()
            && reservation.range().overlaps(range)
    })
}

pub fn blocked_ranges(reservations: &[Reservation], vin: &str) -> Vec<DateRange> {
    reservations
        .iter()
        .filter(|reservation| reservation.car_vin == vin && reservation.status.blocks_vehicle())
        .map(Reservation::range)
        .collect()
}

pub async fn find_conflict(
    state: &AppState,
    vin: &str,
    range: &DateRange,
) -> Result<Option<Reservation>, AppError> {
    let reservations = read_records(state.store.as_ref(), &RESERVATIONS).await?;
    Ok(first_conflict(&reservations, vin, range).cloned())
}

pub async fn is_available(state: &AppState, vin: &str, range: &DateRange) -> Result<bool, AppError> {
    Ok(find_conflict(state, vin, range).await?.is_none())
}

pub async fn unavailable_ranges(state: &AppState, vin: &str) -> Result<Vec<DateRange>, AppError> {
    let reservations = read_records(state.store.as_ref(), &RESERVATIONS).await?;
    Ok(blocked_ranges(&reservations, vin))
}

/// Availability for a requested rental. Same-day requests are widened to one
/// day before the lookup.
pub async fn check_availability(
    state: &AppState,
    vin: &str,
    range: DateRange,
) -> Result<AvailabilityReport, AppError> {
    if vin.trim().is_empty() {
        return Err(AppError::missing("vin"));
    }

    let range = range.normalized()?;
    let conflict = find_conflict(state, vin, &range).await?;
    let result = if conflict.is_some() { "unavailable" } else { "available" };
    state
        .metrics
        .availability_checks_total
        .with_label_values(&[result])
        .inc();

    debug!(vin = %vin, result, "availability checked");

    Ok(AvailabilityReport {
        available: conflict.is_none(),
        conflicting_reservation: conflict,
    })
}

/// Every catalog vehicle with its availability for `range`, which defaults
/// to the next 24 hours.
pub async fn vehicles_with_availability(
    state: &AppState,
    range: Option<DateRange>,
) -> Result<Vec<VehicleAvailability>, AppError> {
    let range = match range {
        Some(range) => range.normalized()?,
        None => {
            let now = Utc::now();
            DateRange {
                start_date: now,
                end_date: now + Duration::days(1),
            }
        }
    };

    let reservations = read_records(state.store.as_ref(), &RESERVATIONS).await?;

    Ok(state
        .catalog
        .list_vehicles()
        .iter()
        .map(|vehicle| VehicleAvailability {
            vehicle: vehicle.clone(),
            is_available: first_conflict(&reservations, &vehicle.vin, &range).is_none(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{check_availability, first_conflict, is_available, unavailable_ranges, vehicles_with_availability};
    use crate::engine::fixtures::{range, reservation, seed_reservations, test_state, CAMRY_VIN};
    use crate::error::AppError;
    use crate::models::reservation::ReservationStatus;

    #[tokio::test]
    async fn overlapping_request_reports_the_conflict() {
        let state = test_state();
        let booked = reservation("r-1", "VIN1", "2025-06-01", "2025-06-05");
        seed_reservations(&state, &[booked.clone()]).await;

        let report = check_availability(&state, "VIN1", range("2025-06-03", "2025-06-04"))
            .await
            .unwrap();

        assert!(!report.available);
        assert_eq!(report.conflicting_reservation, Some(booked));
    }

    #[tokio::test]
    async fn request_after_the_booking_is_available() {
        let state = test_state();
        seed_reservations(&state, &[reservation("r-1", "VIN1", "2025-06-01", "2025-06-05")]).await;

        let report = check_availability(&state, "VIN1", range("2025-06-06", "2025-06-08"))
            .await
            .unwrap();

        assert!(report.available);
        assert!(report.conflicting_reservation.is_none());
    }

    #[tokio::test]
    async fn stored_range_is_never_reported_free() {
        let state = test_state();
        let stored = [
            reservation("r-1", "VIN1", "2025-06-01", "2025-06-05"),
            reservation("r-2", "VIN1", "2025-07-10T09:00:00Z", "2025-07-12T18:00:00Z"),
        ];
        seed_reservations(&state, &stored).await;

        for booked in &stored {
            assert!(!is_available(&state, "VIN1", &booked.range()).await.unwrap());
        }
    }

    #[tokio::test]
    async fn inside_outside_and_partial_overlaps_all_conflict() {
        let state = test_state();
        seed_reservations(&state, &[reservation("r-1", "VIN1", "2025-06-10", "2025-06-20")]).await;

        for (start, end) in [
            ("2025-06-12", "2025-06-15"),
            ("2025-06-01", "2025-06-30"),
            ("2025-06-05", "2025-06-11"),
            ("2025-06-19", "2025-06-25"),
            ("2025-06-20", "2025-06-22"),
        ] {
            assert!(
                !is_available(&state, "VIN1", &range(start, end)).await.unwrap(),
                "[{start}, {end}] should conflict"
            );
        }

        assert!(is_available(&state, "VIN1", &range("2025-06-21", "2025-06-25")).await.unwrap());
        assert!(is_available(&state, "VIN1", &range("2025-06-01", "2025-06-09")).await.unwrap());
    }

    #[tokio::test]
    async fn other_vehicles_do_not_conflict() {
        let state = test_state();
        seed_reservations(&state, &[reservation("r-1", "VIN1", "2025-06-01", "2025-06-05")]).await;

        assert!(is_available(&state, "VIN2", &range("2025-06-01", "2025-06-05")).await.unwrap());
    }

    #[tokio::test]
    async fn cancelled_reservations_release_the_vehicle() {
        let state = test_state();
        let mut cancelled = reservation("r-1", "VIN1", "2025-06-01", "2025-06-05");
        cancelled.status = ReservationStatus::Cancelled;
        seed_reservations(&state, &[cancelled]).await;

        assert!(is_available(&state, "VIN1", &range("2025-06-02", "2025-06-03")).await.unwrap());
        assert!(unavailable_ranges(&state, "VIN1").await.unwrap().is_empty());
    }

    #[test]
    fn first_conflict_follows_stored_order() {
        let stored = vec![
            reservation("r-2", "VIN1", "2025-06-04", "2025-06-06"),
            reservation("r-1", "VIN1", "2025-06-01", "2025-06-03"),
        ];

        let conflict = first_conflict(&stored, "VIN1", &range("2025-06-01", "2025-06-10")).unwrap();
        assert_eq!(conflict.id, "r-2");
    }

    #[tokio::test]
    async fn unavailable_ranges_lists_every_booking_for_the_vehicle() {
        let state = test_state();
        seed_reservations(
            &state,
            &[
                reservation("r-1", "VIN1", "2025-06-01", "2025-06-05"),
                reservation("r-2", "VIN2", "2025-06-01", "2025-06-05"),
                reservation("r-3", "VIN1", "2025-07-01", "2025-07-02"),
            ],
        )
        .await;

        let ranges = unavailable_ranges(&state, "VIN1").await.unwrap();
        assert_eq!(
            ranges,
            vec![range("2025-06-01", "2025-06-05"), range("2025-07-01", "2025-07-02")]
        );
    }

    #[tokio::test]
    async fn same_day_request_is_checked_as_one_day() {
        let state = test_state();
        seed_reservations(&state, &[reservation("r-1", "VIN1", "2025-06-02", "2025-06-04")]).await;

        // 06-01 widened to [06-01, 06-02] touches the booking's first day.
        let report = check_availability(&state, "VIN1", range("2025-06-01", "2025-06-01"))
            .await
            .unwrap();
        assert!(!report.available);
    }

    #[tokio::test]
    async fn same_day_request_on_the_last_representable_day_is_a_validation_error() {
        let state = test_state();
        let edge = range("+262142-12-31", "+262142-12-31");

        match check_availability(&state, "VIN1", edge).await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "endDate"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(matches!(
            vehicles_with_availability(&state, Some(edge)).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn vehicle_listing_marks_booked_cars() {
        let state = test_state();
        seed_reservations(&state, &[reservation("r-1", CAMRY_VIN, "2025-06-01", "2025-06-05")]).await;

        let listing = vehicles_with_availability(&state, Some(range("2025-06-02", "2025-06-03")))
            .await
            .unwrap();

        assert_eq!(listing.len(), state.catalog.list_vehicles().len());
        for entry in listing {
            assert_eq!(entry.is_available, entry.vehicle.vin != CAMRY_VIN);
        }
    }
}
