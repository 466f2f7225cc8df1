use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;

use crate::engine::booking::{cancel_reservation, complete_reservation};
use crate::engine::queries::{reservation_by_id, reservations_by_vehicle};
use crate::error::AppError;
use crate::models::reservation::Reservation;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reservations/:id", get(get_reservation))
        .route("/reservations/:id/complete", post(complete))
        .route("/reservations/:id/cancel", post(cancel))
        .route("/vehicles/:vin/reservations", get(list_for_vehicle))
}

async fn get_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Reservation>, AppError> {
    reservation_by_id(&state, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("reservation {id} not found")))
}

async fn complete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Reservation>, AppError> {
    Ok(Json(complete_reservation(&state, &id).await?))
}

async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Reservation>, AppError> {
    Ok(Json(cancel_reservation(&state, &id).await?))
}

async fn list_for_vehicle(
    State(state): State<Arc<AppState>>,
    Path(vin): Path<String>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    Ok(Json(reservations_by_vehicle(&state, &vin).await?))
}
