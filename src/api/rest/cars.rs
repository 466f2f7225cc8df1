use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::engine::availability::{
    check_availability, unavailable_ranges, vehicles_with_availability, AvailabilityReport,
};
use crate::error::AppError;
use crate::models::date_range::DateRange;
use crate::models::location::Location;
use crate::models::vehicle::{Vehicle, VehicleAvailability};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cars", get(list_cars))
        .route("/cars/availability", get(availability))
        .route("/cars/:vin", get(get_car))
        .route("/cars/:vin/unavailable-dates", get(unavailable_dates))
        .route("/locations", get(list_locations))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCarsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    #[serde(default)]
    pub vin: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

async fn list_cars(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCarsQuery>,
) -> Result<Json<Vec<VehicleAvailability>>, AppError> {
    let range = match (query.start_date.as_deref(), query.end_date.as_deref()) {
        (Some(start), Some(end)) => Some(DateRange::parse(start, end)?),
        (None, None) => None,
        (None, Some(_)) => return Err(AppError::missing("startDate")),
        (Some(_), None) => return Err(AppError::missing("endDate")),
    };

    Ok(Json(vehicles_with_availability(&state, range).await?))
}

async fn availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityReport>, AppError> {
    let start = query.start.ok_or_else(|| AppError::missing("startDate"))?;
    let end = query.end.ok_or_else(|| AppError::missing("endDate"))?;
    let range = DateRange::parse(&start, &end)?;

    Ok(Json(check_availability(&state, &query.vin, range).await?))
}

async fn get_car(
    State(state): State<Arc<AppState>>,
    Path(vin): Path<String>,
) -> Result<Json<Vehicle>, AppError> {
    state
        .catalog
        .vehicle_by_vin(&vin)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("vehicle {vin} not found")))
}

async fn unavailable_dates(
    State(state): State<Arc<AppState>>,
    Path(vin): Path<String>,
) -> Result<Json<Vec<DateRange>>, AppError> {
    Ok(Json(unavailable_ranges(&state, &vin).await?))
}

async fn list_locations(State(state): State<Arc<AppState>>) -> Json<Vec<Location>> {
    Json(state.catalog.active_locations())
}
