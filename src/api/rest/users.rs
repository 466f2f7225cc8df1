use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Json;
use axum::Router;

use crate::engine::queries::{reservations_by_user, temporary_orders_by_user};
use crate::error::AppError;
use crate::models::order::TemporaryOrder;
use crate::models::reservation::Reservation;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/:id/reservations", get(list_reservations))
        .route("/users/:id/orders", get(list_orders))
}

async fn list_reservations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    Ok(Json(reservations_by_user(&state, &id).await?))
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TemporaryOrder>>, AppError> {
    Ok(Json(temporary_orders_by_user(&state, &id).await?))
}
