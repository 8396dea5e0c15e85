//! Profile API endpoints

use api_types::{
    Theme,
    user::{UserNew, UserView, UsersResponse},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{EngineError, User};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub(crate) fn user_view(user: &User) -> UserView {
    UserView {
        id: user.id,
        name: user.name.clone(),
        currency: user.currency.code().to_string(),
        theme: match user.theme {
            engine::Theme::Light => Theme::Light,
            engine::Theme::Dark => Theme::Dark,
            engine::Theme::System => Theme::System,
        },
        income_minor: user.income.cents(),
        created_at: user.created_at,
    }
}

/// Handle requests for listing profiles, newest first
pub async fn list(State(state): State<ServerState>) -> Result<Json<UsersResponse>, ServerError> {
    let users = state.engine.get_users().await?;
    Ok(Json(UsersResponse {
        users: users.iter().map(user_view).collect(),
    }))
}

/// Handle requests for creating a profile
pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<UserNew>, ServerError>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .create_user(
            &payload.name,
            payload.currency.as_deref(),
            payload.theme.map(Theme::as_str),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user_view(&user))))
}

pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<UserView>, ServerError> {
    match state.engine.get_user(user_id).await? {
        Some(user) => Ok(Json(user_view(&user))),
        None => Err(EngineError::KeyNotFound("user not exists".to_string()).into()),
    }
}

pub async fn remove(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle requests for making a profile the active one
pub async fn switch(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.switch_user(user_id).await?;
    Ok(Json(user_view(&user)))
}
