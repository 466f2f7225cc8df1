//! Read-only lookups over the two booking collections.

use crate::error::AppError;
use crate::models::order::TemporaryOrder;
use crate::models::reservation::Reservation;
use crate::state::AppState;
use crate::store::{read_records, RESERVATIONS, TEMP_ORDERS};

pub async fn reservations_by_user(state: &AppState, user_id: &str) -> Result<Vec<Reservation>, AppError> {
    let reservations = read_records(state.store.as_ref(), &RESERVATIONS).await?;
    Ok(reservations
        .into_iter()
        .filter(|reservation| reservation.user_id == user_id)
        .collect())
}

pub async fn reservations_by_vehicle(state: &AppState, vin: &str) -> Result<Vec<Reservation>, AppError> {
    let reservations = read_records(state.store.as_ref(), &RESERVATIONS).await?;
    Ok(reservations
        .into_iter()
        .filter(|reservation| reservation.car_vin == vin)
        .collect())
}

pub async fn reservation_by_id(state: &AppState, id: &str) -> Result<Option<Reservation>, AppError> {
    let reservations = read_records(state.store.as_ref(), &RESERVATIONS).await?;
    Ok(reservations.into_iter().find(|reservation| reservation.id == id))
}

pub async fn temporary_order_by_id(state: &AppState, id: &str) -> Result<Option<TemporaryOrder>, AppError> {
    let orders = read_records(state.store.as_ref(), &TEMP_ORDERS).await?;
    Ok(orders.into_iter().find(|order| order.id == id))
}

pub async fn temporary_orders_by_user(
    state: &AppState,
    user_id: &str,
) -> Result<Vec<TemporaryOrder>, AppError> {
    let orders = read_records(state.store.as_ref(), &TEMP_ORDERS).await?;
    Ok(orders
        .into_iter()
        .filter(|order| order.user_id.as_deref() == Some(user_id))
        .collect())
}
