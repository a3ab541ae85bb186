//! Dashboard demo simulation endpoints

use crate::error::{ApiError, triage_error};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use cityfix_core::types::ApiResponse;
use cityfix_triage::{SimulationSnapshot, TriageError};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Start a demo run
///
/// Answers 202 with the initial snapshot; poll `GET /api/simulations/:id`
/// for progress.
pub async fn start_simulation(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<SimulationSnapshot>>), ApiError> {
    let id = state.simulations.start();
    let snapshot = state
        .simulations
        .get(id)
        .ok_or_else(|| triage_error(&TriageError::SimulationNotFound(id)))?;

    info!(%id, "Demo simulation requested");
    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::success_with_message(
            snapshot,
            "Processing 100 complaints",
        )),
    ))
}

/// Progress, and results once complete
pub async fn get_simulation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SimulationSnapshot>>, ApiError> {
    state
        .simulations
        .get(id)
        .map(|snapshot| Json(ApiResponse::success(snapshot)))
        .ok_or_else(|| triage_error(&TriageError::SimulationNotFound(id)))
}

/// Close the results panel of a completed run
pub async fn dismiss_simulation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SimulationSnapshot>>, ApiError> {
    let snapshot = state
        .simulations
        .dismiss(id)
        .map_err(|e| triage_error(&e))?;
    Ok(Json(ApiResponse::success_with_message(
        snapshot,
        "Simulation dismissed",
    )))
}
