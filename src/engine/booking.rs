//! Booking lifecycle: temporary order, payment, confirmed reservation.
//!
//! A booking id lives in exactly one of the two collections at a time. The
//! move from temp-orders to reservations is two writes, not a transaction:
//! the reservation is appended first and the order removed second. If the
//! second write fails the order is left behind as an orphan, which
//! [`reconcile`] removes. Confirming an id that is already a reservation
//! finishes that cleanup instead of failing.

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

use crate::engine::availability::{find_conflict, first_conflict};
use crate::engine::observe;
use crate::engine::payment::PaymentForm;
use crate::error::AppError;
use crate::models::date_range::DateRange;
use crate::models::event::BookingEvent;
use crate::models::order::{OrderStatus, PaymentDetails, PaymentStatus, TemporaryOrder};
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::state::AppState;
use crate::store::{read_records, write_records, RESERVATIONS, TEMP_ORDERS};

/// Input for starting a booking. Dates are already parsed; everything else
/// is checked here.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: String,
    pub car_vin: String,
    pub range: DateRange,
    pub pickup_location_id: String,
    pub return_location_id: String,
}

pub async fn create_temporary_order(
    state: &AppState,
    request: NewOrder,
) -> Result<TemporaryOrder, AppError> {
    observe(state, "create_order", create_order_inner(state, request)).await
}

async fn create_order_inner(state: &AppState, request: NewOrder) -> Result<TemporaryOrder, AppError> {
    let user_id = required("userId", &request.user_id)?;
    let car_vin = required("carVin", &request.car_vin)?;
    let pickup_location_id = known_location(state, "pickupLocationId", &request.pickup_location_id)?;
    let return_location_id = known_location(state, "returnLocationId", &request.return_location_id)?;

    if state.catalog.user_by_id(&user_id).is_none() {
        return Err(AppError::NotFound(format!("user {user_id} not found")));
    }
    let vehicle = state
        .catalog
        .vehicle_by_vin(&car_vin)
        .ok_or_else(|| AppError::NotFound(format!("vehicle {car_vin} not found")))?;

    let range = request.range.normalized()?;
    if let Some(conflict) = find_conflict(state, &car_vin, &range).await? {
        info!(vin = %car_vin, conflicting = %conflict.id, "booking request conflicts");
        return Err(AppError::Conflict(Box::new(conflict)));
    }

    // Quoted once here and carried unchanged into the reservation.
    let total_price = range.rental_days() as f64 * vehicle.price_per_day;

    let _orders_guard = state.locks.lock(TEMP_ORDERS.name).await;
    let mut orders = read_records(state.store.as_ref(), &TEMP_ORDERS).await?;
    let reservations = read_records(state.store.as_ref(), &RESERVATIONS).await?;

    let id = loop {
        let candidate = state.ids.next_id();
        let taken = orders.iter().any(|order| order.id == candidate)
            || reservations.iter().any(|reservation| reservation.id == candidate);
        if !taken {
            break candidate;
        }
    };

    let order = TemporaryOrder {
        id,
        user_id: Some(user_id),
        car_vin: Some(car_vin),
        start_date: Some(range.start_date),
        end_date: Some(range.end_date),
        pickup_location_id: Some(pickup_location_id),
        return_location_id: Some(return_location_id),
        total_price,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        payment_details: None,
        created_at: Utc::now(),
    };

    orders.push(order.clone());
    write_records(state.store.as_ref(), &TEMP_ORDERS, &orders).await?;

    info!(
        order_id = %order.id,
        vin = %vehicle.vin,
        total_price = order.total_price,
        "temporary order created"
    );
    state.publish(BookingEvent::OrderCreated {
        order_id: order.id.clone(),
        car_vin: vehicle.vin.clone(),
        user_id: request.user_id.trim().to_string(),
        total_price: order.total_price,
        at: order.created_at,
    });

    Ok(order)
}

/// Records a simulated payment on a temporary order. Paying twice is a no-op.
pub async fn submit_payment(
    state: &AppState,
    order_id: &str,
    form: &PaymentForm,
) -> Result<TemporaryOrder, AppError> {
    observe(state, "submit_payment", submit_payment_inner(state, order_id, form)).await
}

async fn submit_payment_inner(
    state: &AppState,
    order_id: &str,
    form: &PaymentForm,
) -> Result<TemporaryOrder, AppError> {
    let _orders_guard = state.locks.lock(TEMP_ORDERS.name).await;
    let mut orders = read_records(state.store.as_ref(), &TEMP_ORDERS).await?;

    let order = orders
        .iter_mut()
        .find(|order| order.id == order_id)
        .ok_or_else(|| order_not_found(order_id))?;

    if order.is_paid() {
        info!(order_id = %order_id, "payment already recorded");
        return Ok(order.clone());
    }

    let accepted = form.validate()?;
    let processed_at = Utc::now();

    order.payment_status = PaymentStatus::Paid;
    order.status = OrderStatus::Confirmed;
    order.payment_details = Some(PaymentDetails {
        method: accepted.method,
        last_four: accepted.last_four,
        processed_at,
    });
    let paid = order.clone();

    write_records(state.store.as_ref(), &TEMP_ORDERS, &orders).await?;

    info!(order_id = %order_id, "payment recorded");
    state.publish(BookingEvent::PaymentRecorded {
        order_id: order_id.to_string(),
        at: processed_at,
    });

    Ok(paid)
}

/// Promotes a paid temporary order into a reservation.
pub async fn confirm_reservation(state: &AppState, order_id: &str) -> Result<Reservation, AppError> {
    observe(state, "confirm_reservation", confirm_inner(state, order_id)).await
}

async fn confirm_inner(state: &AppState, order_id: &str) -> Result<Reservation, AppError> {
    let _orders_guard = state.locks.lock(TEMP_ORDERS.name).await;
    let mut orders = read_records(state.store.as_ref(), &TEMP_ORDERS).await?;

    let Some(index) = orders.iter().position(|order| order.id == order_id) else {
        let reservations = read_records(state.store.as_ref(), &RESERVATIONS).await?;
        return reservations
            .into_iter()
            .find(|reservation| reservation.id == order_id)
            .ok_or_else(|| order_not_found(order_id));
    };

    let order = &orders[index];
    if !order.is_paid() {
        return Err(AppError::validation("paymentStatus", "order has not been paid"));
    }
    let candidate = reservation_from_order(order)?;

    let reservation = {
        let _reservations_guard = state.locks.lock(RESERVATIONS.name).await;
        let mut reservations = read_records(state.store.as_ref(), &RESERVATIONS).await?;

        match reservations.iter().find(|existing| existing.id == order_id) {
            Some(existing) => {
                warn!(order_id = %order_id, "reservation already recorded; finishing cleanup");
                existing.clone()
            }
            None => {
                // Re-checked under the lock so two paid orders cannot both land.
                if let Some(conflict) =
                    first_conflict(&reservations, &candidate.car_vin, &candidate.range())
                {
                    warn!(
                        order_id = %order_id,
                        conflicting = %conflict.id,
                        "paid order conflicts with a newer reservation"
                    );
                    return Err(AppError::Conflict(Box::new(conflict.clone())));
                }

                reservations.push(candidate.clone());
                write_records(state.store.as_ref(), &RESERVATIONS, &reservations).await?;
                candidate
            }
        }
    };

    orders.remove(index);
    if let Err(err) = write_records(state.store.as_ref(), &TEMP_ORDERS, &orders).await {
        error!(
            order_id = %order_id,
            error = %err,
            "reservation persisted but temporary order removal failed"
        );
    }

    info!(
        reservation_id = %reservation.id,
        vin = %reservation.car_vin,
        user_id = %reservation.user_id,
        "reservation confirmed; confirmation notice queued for customer"
    );
    state.publish(BookingEvent::ReservationConfirmed {
        reservation_id: reservation.id.clone(),
        car_vin: reservation.car_vin.clone(),
        at: Utc::now(),
    });

    Ok(reservation)
}

/// Builds the durable record from a paid order, naming the first missing
/// required field.
pub fn reservation_from_order(order: &TemporaryOrder) -> Result<Reservation, AppError> {
    let car_vin = present("carVin", order.car_vin.as_deref())?;
    let user_id = present("userId", order.user_id.as_deref())?;
    let start_date = order.start_date.ok_or_else(|| AppError::missing("startDate"))?;
    let end_date = order.end_date.ok_or_else(|| AppError::missing("endDate"))?;
    let pickup_location_id = present("pickupLocationId", order.pickup_location_id.as_deref())?;
    let return_location_id = present("returnLocationId", order.return_location_id.as_deref())?;

    Ok(Reservation {
        id: order.id.clone(),
        car_vin,
        user_id,
        start_date,
        end_date,
        pickup_location_id,
        return_location_id,
        total_price: order.total_price,
        status: ReservationStatus::Confirmed,
        created_at: order.created_at,
        payment_status: order.payment_status,
        payment_details: order.payment_details.clone(),
    })
}

/// Abandons an unpaid temporary order. Returns whether anything was removed.
pub async fn cancel_order(state: &AppState, order_id: &str) -> Result<bool, AppError> {
    observe(state, "cancel_order", cancel_order_inner(state, order_id)).await
}

async fn cancel_order_inner(state: &AppState, order_id: &str) -> Result<bool, AppError> {
    let _orders_guard = state.locks.lock(TEMP_ORDERS.name).await;
    let mut orders = read_records(state.store.as_ref(), &TEMP_ORDERS).await?;

    let Some(index) = orders.iter().position(|order| order.id == order_id) else {
        return Ok(false);
    };
    if orders[index].is_paid() {
        return Err(AppError::validation(
            "paymentStatus",
            "paid orders cannot be cancelled; confirm them instead",
        ));
    }

    orders.remove(index);
    write_records(state.store.as_ref(), &TEMP_ORDERS, &orders).await?;

    info!(order_id = %order_id, "temporary order cancelled");
    state.publish(BookingEvent::OrderCancelled {
        order_id: order_id.to_string(),
        at: Utc::now(),
    });

    Ok(true)
}

pub async fn complete_reservation(state: &AppState, reservation_id: &str) -> Result<Reservation, AppError> {
    observe(
        state,
        "complete_reservation",
        transition_reservation(state, reservation_id, ReservationStatus::Completed),
    )
    .await
}

pub async fn cancel_reservation(state: &AppState, reservation_id: &str) -> Result<Reservation, AppError> {
    observe(
        state,
        "cancel_reservation",
        transition_reservation(state, reservation_id, ReservationStatus::Cancelled),
    )
    .await
}

async fn transition_reservation(
    state: &AppState,
    reservation_id: &str,
    target: ReservationStatus,
) -> Result<Reservation, AppError> {
    let _reservations_guard = state.locks.lock(RESERVATIONS.name).await;
    let mut reservations = read_records(state.store.as_ref(), &RESERVATIONS).await?;

    let reservation = reservations
        .iter_mut()
        .find(|reservation| reservation.id == reservation_id)
        .ok_or_else(|| AppError::NotFound(format!("reservation {reservation_id} not found")))?;

    let allowed = match target {
        ReservationStatus::Completed => reservation.status == ReservationStatus::Confirmed,
        ReservationStatus::Cancelled => matches!(
            reservation.status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        ),
        ReservationStatus::Pending | ReservationStatus::Confirmed => false,
    };
    if !allowed {
        return Err(AppError::validation(
            "status",
            format!("cannot move a {} reservation to {target}", reservation.status),
        ));
    }

    reservation.status = target;
    let updated = reservation.clone();
    write_records(state.store.as_ref(), &RESERVATIONS, &reservations).await?;

    info!(reservation_id = %reservation_id, status = %target, "reservation status changed");
    state.publish(BookingEvent::ReservationStatusChanged {
        reservation_id: reservation_id.to_string(),
        status: target,
        at: Utc::now(),
    });

    Ok(updated)
}

/// Removes temporary orders whose id is already a reservation, the leftover
/// of a confirmation whose second write failed. Safe to run at any time.
pub async fn reconcile(state: &AppState) -> Result<Vec<String>, AppError> {
    let _orders_guard = state.locks.lock(TEMP_ORDERS.name).await;
    let _reservations_guard = state.locks.lock(RESERVATIONS.name).await;

    let mut orders = read_records(state.store.as_ref(), &TEMP_ORDERS).await?;
    let reservations = read_records(state.store.as_ref(), &RESERVATIONS).await?;

    let mut removed = Vec::new();
    orders.retain(|order| {
        let promoted = reservations
            .iter()
            .any(|reservation| reservation.id == order.id);
        if promoted {
            warn!(order_id = %order.id, "removing temporary order already promoted to a reservation");
            removed.push(order.id.clone());
        }
        !promoted
    });

    if !removed.is_empty() {
        write_records(state.store.as_ref(), &TEMP_ORDERS, &orders).await?;
    }

    Ok(removed)
}

/// Removes unpaid temporary orders created at or before `now - ttl`.
pub async fn sweep_abandoned_orders(
    state: &AppState,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<Vec<String>, AppError> {
    let Some(cutoff) = now.checked_sub_signed(ttl) else {
        return Ok(Vec::new());
    };

    let _orders_guard = state.locks.lock(TEMP_ORDERS.name).await;
    let mut orders = read_records(state.store.as_ref(), &TEMP_ORDERS).await?;

    let mut removed = Vec::new();
    orders.retain(|order| {
        let abandoned = !order.is_paid() && order.created_at <= cutoff;
        if abandoned {
            removed.push(order.id.clone());
        }
        !abandoned
    });

    if !removed.is_empty() {
        write_records(state.store.as_ref(), &TEMP_ORDERS, &orders).await?;
        state
            .metrics
            .temporary_orders_swept_total
            .inc_by(removed.len() as u64);
        for order_id in &removed {
            state.publish(BookingEvent::OrderCancelled {
                order_id: order_id.clone(),
                at: now,
            });
        }
    }

    Ok(removed)
}

fn order_not_found(order_id: &str) -> AppError {
    AppError::NotFound(format!("temporary order {order_id} not found"))
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    present(field, Some(value))
}

fn present(field: &str, value: Option<&str>) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(AppError::missing(field)),
    }
}

fn known_location(state: &AppState, field: &str, id: &str) -> Result<String, AppError> {
    let id = required(field, id)?;
    match state.catalog.location_by_id(&id) {
        Some(location) if location.is_active => Ok(id),
        _ => Err(AppError::validation(field, format!("unknown location {id}"))),
    }
}
