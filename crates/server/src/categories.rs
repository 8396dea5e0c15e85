//! Category API endpoints

use api_types::category::{
    CategoriesResponse, CategoryNew, CategoryOptionKind, CategoryOptionView,
    CategoryOptionsResponse, CategoryView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{Category, CategoryKind};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn category_view(category: &Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name.clone(),
    }
}

/// Handle requests for the custom categories of a profile
pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let categories = state.engine.get_categories(user_id).await?;
    Ok(Json(CategoriesResponse {
        categories: categories.iter().map(category_view).collect(),
    }))
}

/// Handle requests for built-in plus custom categories
pub async fn options(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<CategoryOptionsResponse>, ServerError> {
    let options = state.engine.category_options(user_id).await?;
    Ok(Json(CategoryOptionsResponse {
        options: options
            .into_iter()
            .map(|option| CategoryOptionView {
                name: option.name,
                id: option.id,
                custom: option.kind == CategoryKind::Custom,
                kind: match option.kind {
                    CategoryKind::Default => CategoryOptionKind::Default,
                    CategoryKind::Custom => CategoryOptionKind::Custom,
                    CategoryKind::Historical => CategoryOptionKind::Historical,
                },
            })
            .collect(),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryNew>, ServerError>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state.engine.create_category(user_id, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(category_view(&category))))
}

pub async fn remove(
    State(state): State<ServerState>,
    WithRejection(Path(category_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
