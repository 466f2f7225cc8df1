use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::engine::booking::{
    cancel_order, confirm_reservation, create_temporary_order, submit_payment, NewOrder,
};
use crate::engine::payment::PaymentForm;
use crate::engine::queries::temporary_order_by_id;
use crate::error::AppError;
use crate::models::date_range::DateRange;
use crate::models::order::TemporaryOrder;
use crate::models::reservation::Reservation;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/:id", get(get_order).delete(delete_order))
        .route("/orders/:id/payment", post(pay_order))
        .route("/orders/:id/confirm", post(confirm_order))
}

/// Fields default to empty so a missing one is reported by name instead of
/// failing body extraction.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub car_vin: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub pickup_location_id: String,
    #[serde(default)]
    pub return_location_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub total_price: f64,
}

#[derive(Serialize)]
pub struct PaymentResponse {
    pub ok: bool,
    pub order: TemporaryOrder,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub reservation_id: String,
    pub reservation: Reservation,
}

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    let range = DateRange::parse(&payload.start_date, &payload.end_date)?;

    let order = create_temporary_order(
        &state,
        NewOrder {
            user_id: payload.user_id,
            car_vin: payload.car_vin,
            range,
            pickup_location_id: payload.pickup_location_id,
            return_location_id: payload.return_location_id,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order_id: order.id,
            total_price: order.total_price,
        }),
    ))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TemporaryOrder>, AppError> {
    temporary_order_by_id(&state, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("temporary order {id} not found")))
}

async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, AppError> {
    if !cancel_order(&state, &id).await? {
        return Err(AppError::NotFound(format!("temporary order {id} not found")));
    }
    Ok(Json(OkResponse { ok: true }))
}

async fn pay_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(form): Json<PaymentForm>,
) -> Result<Json<PaymentResponse>, AppError> {
    let order = submit_payment(&state, &id, &form).await?;
    Ok(Json(PaymentResponse { ok: true, order }))
}

async fn confirm_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ConfirmResponse>, AppError> {
    let reservation = confirm_reservation(&state, &id).await?;
    Ok(Json(ConfirmResponse {
        reservation_id: reservation.id.clone(),
        reservation,
    }))
}
