//! Income and expense API endpoints

use api_types::{
    expense::{
        BudgetView, ExpenseListQuery, ExpenseNew, ExpenseView, ExpensesResponse, SortKey,
        SortOrder,
    },
    user::{IncomeUpdate, UserView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{Expense, ExpenseQuery, Money};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, users::user_view};

fn expense_view(expense: &Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        name: expense.name.clone(),
        amount_minor: expense.amount.cents(),
        category: expense.category.clone(),
    }
}

fn expense_query(query: ExpenseListQuery) -> ExpenseQuery {
    ExpenseQuery {
        category: query.category,
        search: query.search,
        sort: match query.sort {
            Some(SortKey::Name) => engine::SortKey::Name,
            Some(SortKey::Category) => engine::SortKey::Category,
            Some(SortKey::Amount) | None => engine::SortKey::Amount,
        },
        order: match query.order {
            Some(SortOrder::Asc) => engine::SortOrder::Asc,
            Some(SortOrder::Desc) | None => engine::SortOrder::Desc,
        },
    }
}

/// Handle requests for a profile with all of its expenses
pub async fn get_budget(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state.engine.get_user_budget(user_id).await?;
    Ok(Json(BudgetView {
        user: user_view(&budget.user),
        expenses: budget.expenses.iter().map(expense_view).collect(),
    }))
}

pub async fn update_income(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<IncomeUpdate>, ServerError>,
) -> Result<Json<UserView>, ServerError> {
    let user = state
        .engine
        .update_income(user_id, Money::new(payload.income_minor))
        .await?;
    Ok(Json(user_view(&user)))
}

/// Handle requests for adding an expense
pub async fn expense_new(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<ExpenseNew>, ServerError>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = state
        .engine
        .create_expense(
            user_id,
            &payload.name,
            Money::new(payload.amount_minor),
            &payload.category,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(expense_view(&expense))))
}

/// Handle requests for the filtered expense list
pub async fn list_expenses(
    State(state): State<ServerState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ServerError>,
    WithRejection(Query(query), _): WithRejection<Query<ExpenseListQuery>, ServerError>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(user_id, &expense_query(query))
        .await?;
    Ok(Json(ExpensesResponse {
        expenses: expenses.iter().map(expense_view).collect(),
    }))
}

pub async fn remove_expense(
    State(state): State<ServerState>,
    WithRejection(Path(expense_id), _): WithRejection<Path<Uuid>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
