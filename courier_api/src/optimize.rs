use std::sync::Arc;

use axum::{Json, extract::State};
use courier_optimizer::json::{
    optimize::optimize,
    types::{OptimizationRequest, OptimizationResponse},
};
use serde::Serialize;
use tracing::info;

use crate::{error::ApiError, state::AppState};

pub async fn optimize_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OptimizationRequest>,
) -> Result<Json<OptimizationResponse>, ApiError> {
    let response = optimize(body, &state.matrix_client, &state.defaults).await?;

    info!(
        objective = response.objective,
        distance = response.total_distance_meters,
        "Request solved"
    );

    Ok(Json(response))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
