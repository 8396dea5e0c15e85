//! Chart, summary and printable report endpoints

use api_types::stats::{BreakdownView, SliceView, SummaryView};
use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use engine::EngineError;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

async fn currency_of(state: &ServerState, user_id: Uuid) -> Result<String, ServerError> {
    match state.engine.get_user(user_id).await? {
        Some(user) => Ok(user.currency.code().to_string()),
        None => Err(EngineError::KeyNotFound("user not exists".to_string()).into()),
    }
}

pub async fn breakdown(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<BreakdownView>, ServerError> {
    let currency = currency_of(&state, user_id).await?;
    let chart = state.engine.breakdown(user_id).await?;
    let is_empty = chart.is_empty();
    Ok(Json(BreakdownView {
        currency,
        slices: chart
            .slices
            .into_iter()
            .map(|slice| SliceView {
                name: slice.name,
                value_minor: slice.value.cents(),
                percentage: slice.percentage,
                unallocated: slice.unallocated,
            })
            .collect(),
        total_value_minor: chart.total_value.cents(),
        total_spent_minor: chart.total_spent.cents(),
        is_empty,
    }))
}

pub async fn summary(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<SummaryView>, ServerError> {
    let currency = currency_of(&state, user_id).await?;
    let summary = state.engine.summary(user_id).await?;
    Ok(Json(SummaryView {
        currency,
        total_income_minor: summary.total_income.cents(),
        total_expenses_minor: summary.total_expenses.cents(),
        left_to_spend_minor: summary.left_to_spend.cents(),
        percent_spent: summary.percent_spent,
        over_budget: summary.over_budget,
    }))
}

/// Handle requests for the printable report (plain text)
pub async fn report(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<String, ServerError> {
    Ok(state
        .engine
        .report(user_id, Utc::now().date_naive())
        .await?)
}
