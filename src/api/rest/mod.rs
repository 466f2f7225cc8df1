pub mod admin;
pub mod cars;
pub mod orders;
pub mod reservations;
pub mod users;
pub mod ws;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;
use crate::store::{read_records, RESERVATIONS, TEMP_ORDERS};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(cars::router())
        .merge(orders::router())
        .merge(reservations::router())
        .merge(users::router())
        .merge(admin::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    vehicles: usize,
    temporary_orders: usize,
    reservations: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, AppError> {
    let temporary_orders = read_records(state.store.as_ref(), &TEMP_ORDERS).await?.len();
    let reservations = read_records(state.store.as_ref(), &RESERVATIONS).await?.len();

    Ok(Json(HealthResponse {
        status: "ok",
        vehicles: state.catalog.list_vehicles().len(),
        temporary_orders,
        reservations,
    }))
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
