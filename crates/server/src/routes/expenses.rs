use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use tracing::info;
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::expense::{self, ExpensePatch, NewExpense};
use service::expense_service::{self, ExpenseFilter};

use crate::{errors::JsonApiError, state::ServerState};

#[utoipa::path(get, path = "/api/expenses", tag = "expenses", security(("bearer" = [])),
    params(Pagination, ExpenseFilter),
    responses((status = 200, description = "List OK")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(p): Query<Pagination>,
    Query(filter): Query<ExpenseFilter>,
) -> Result<Json<Page<expense::Model>>, JsonApiError> {
    Ok(Json(expense_service::list_expenses(&state.db, filter, p).await?))
}

#[utoipa::path(post, path = "/api/expenses", tag = "expenses", security(("bearer" = [])),
    request_body = crate::openapi::ExpenseDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewExpense>,
) -> Result<(StatusCode, Json<expense::Model>), JsonApiError> {
    let m = expense_service::create_expense(&state.db, input).await?;
    info!(id = %m.id, category = %m.category, amount_cents = m.amount_cents, "recorded expense");
    Ok((StatusCode::CREATED, Json(m)))
}

#[utoipa::path(get, path = "/api/expenses/{id}", tag = "expenses", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Expense ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<expense::Model>, JsonApiError> {
    Ok(Json(expense_service::get_expense(&state.db, id).await?))
}

#[utoipa::path(put, path = "/api/expenses/{id}", tag = "expenses", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Expense ID")), request_body = crate::openapi::ExpenseDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ExpensePatch>,
) -> Result<Json<expense::Model>, JsonApiError> {
    Ok(Json(expense_service::update_expense(&state.db, id, patch).await?))
}

#[utoipa::path(delete, path = "/api/expenses/{id}", tag = "expenses", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Expense ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    expense_service::delete_expense(&state.db, id).await?;
    info!(%id, "deleted expense");
    Ok(StatusCode::NO_CONTENT)
}
