//! Deployment status and data reset endpoints

use api_types::system::{ResetResponse, StatusResponse};
use axum::{Json, extract::State};
use chrono::Utc;

use crate::{ServerError, server::ServerState};

pub async fn status(State(state): State<ServerState>) -> Result<Json<StatusResponse>, ServerError> {
    let status = state.engine.status().await?;
    Ok(Json(StatusResponse {
        last_reset: status
            .last_reset
            .map(|at| at.timestamp_millis().to_string()),
    }))
}

/// Handle the scheduled wipe of every profile. Guarded by the bearer secret.
pub async fn reset(State(state): State<ServerState>) -> Result<Json<ResetResponse>, ServerError> {
    state.engine.reset(Utc::now()).await?;
    Ok(Json(ResetResponse {
        success: true,
        message: "Database reset successfully".to_string(),
    }))
}
