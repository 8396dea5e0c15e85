//! Currency, backup and clear-data endpoints

use api_types::user::{CurrencyUpdate, UserView};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use engine::EngineError;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, users::user_view};

pub async fn update_currency(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<CurrencyUpdate>, ServerError>,
) -> Result<Json<UserView>, ServerError> {
    let user = state
        .engine
        .update_currency(user_id, &payload.currency)
        .await?;
    Ok(Json(user_view(&user)))
}

/// Handle requests for downloading the backup document of a profile
pub async fn export(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<impl IntoResponse, ServerError> {
    let Some(user) = state.engine.get_user(user_id).await? else {
        return Err(EngineError::KeyNotFound("user not exists".to_string()).into());
    };
    let document = state.engine.export_data(user_id).await?;
    let file_name = state
        .engine
        .export_file_name(&user, Utc::now().date_naive());
    let disposition = format!("attachment; filename=\"{}\"", file_name.replace('"', ""));

    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(document)))
}

/// Handle requests for importing a backup document.
///
/// The body is read as raw text so that malformed JSON is reported as an
/// import failure rather than a generic rejection.
pub async fn import(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
    body: String,
) -> Result<StatusCode, ServerError> {
    state.engine.import_data(user_id, &body).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.clear_data(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
