use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::Serialize;

use crate::engine::booking::reconcile;
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/admin/reconcile", post(run_reconcile))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResponse {
    pub removed_order_ids: Vec<String>,
}

async fn run_reconcile(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReconcileResponse>, AppError> {
    let removed_order_ids = reconcile(&state).await?;
    Ok(Json(ReconcileResponse { removed_order_ids }))
}
