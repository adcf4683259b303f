use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use tracing::info;
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::customer::{self, CustomerPatch, NewCustomer};
use service::customer_service::{self, CustomerFilter};

use crate::{errors::JsonApiError, state::ServerState};

#[utoipa::path(get, path = "/api/customers", tag = "customers", security(("bearer" = [])),
    params(Pagination, CustomerFilter),
    responses((status = 200, description = "List OK")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(p): Query<Pagination>,
    Query(filter): Query<CustomerFilter>,
) -> Result<Json<Page<customer::Model>>, JsonApiError> {
    let page = customer_service::list_customers(&state.db, filter, p).await?;
    info!(count = page.items.len(), total = page.total, "list customers");
    Ok(Json(page))
}

#[utoipa::path(post, path = "/api/customers", tag = "customers", security(("bearer" = [])),
    request_body = crate::openapi::CustomerDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewCustomer>,
) -> Result<(StatusCode, Json<customer::Model>), JsonApiError> {
    let m = customer_service::create_customer(&state.db, input).await?;
    info!(id = %m.id, "created customer");
    Ok((StatusCode::CREATED, Json(m)))
}

#[utoipa::path(get, path = "/api/customers/{id}", tag = "customers", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<customer::Model>, JsonApiError> {
    Ok(Json(customer_service::get_customer(&state.db, id).await?))
}

#[utoipa::path(put, path = "/api/customers/{id}", tag = "customers", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")), request_body = crate::openapi::CustomerDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<CustomerPatch>,
) -> Result<Json<customer::Model>, JsonApiError> {
    let m = customer_service::update_customer(&state.db, id, patch).await?;
    info!(id = %m.id, "updated customer");
    Ok(Json(m))
}

#[utoipa::path(delete, path = "/api/customers/{id}", tag = "customers", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"), (status = 409, description = "Still referenced")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    customer_service::delete_customer(&state.db, id).await?;
    info!(%id, "deleted customer");
    Ok(StatusCode::NO_CONTENT)
}
