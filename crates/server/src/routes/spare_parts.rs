use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::spare_part::{self, NewSparePart, SparePartPatch};
use service::spare_part_service::{self, SparePartFilter};

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Deserialize)]
pub struct StockAdjustment {
    /// Positive to receive stock, negative to take it out.
    pub delta: i32,
}

#[utoipa::path(get, path = "/api/spare-parts", tag = "spare-parts", security(("bearer" = [])),
    params(Pagination, SparePartFilter),
    responses((status = 200, description = "List OK")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(p): Query<Pagination>,
    Query(filter): Query<SparePartFilter>,
) -> Result<Json<Page<spare_part::Model>>, JsonApiError> {
    Ok(Json(spare_part_service::list_spare_parts(&state.db, filter, p).await?))
}

#[utoipa::path(get, path = "/api/spare-parts/low-stock", tag = "spare-parts", security(("bearer" = [])),
    responses((status = 200, description = "Parts at or below their reorder level")))]
pub async fn low_stock(State(state): State<ServerState>) -> Result<Json<Vec<spare_part::Model>>, JsonApiError> {
    let parts = spare_part_service::low_stock(&state.db).await?;
    info!(count = parts.len(), "low stock report");
    Ok(Json(parts))
}

#[utoipa::path(post, path = "/api/spare-parts", tag = "spare-parts", security(("bearer" = [])),
    request_body = crate::openapi::SparePartDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 409, description = "Duplicate part number")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewSparePart>,
) -> Result<(StatusCode, Json<spare_part::Model>), JsonApiError> {
    let m = spare_part_service::create_spare_part(&state.db, input).await?;
    info!(id = %m.id, part_number = %m.part_number, "created spare part");
    Ok((StatusCode::CREATED, Json(m)))
}

#[utoipa::path(get, path = "/api/spare-parts/{id}", tag = "spare-parts", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Spare part ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<spare_part::Model>, JsonApiError> {
    Ok(Json(spare_part_service::get_spare_part(&state.db, id).await?))
}

#[utoipa::path(put, path = "/api/spare-parts/{id}", tag = "spare-parts", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Spare part ID")), request_body = crate::openapi::SparePartDoc,
    responses((status = 200, description = "Updated"), (status = 404, description = "Not Found"), (status = 409, description = "Duplicate part number")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<SparePartPatch>,
) -> Result<Json<spare_part::Model>, JsonApiError> {
    Ok(Json(spare_part_service::update_spare_part(&state.db, id, patch).await?))
}

#[utoipa::path(post, path = "/api/spare-parts/{id}/stock", tag = "spare-parts", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Spare part ID")), request_body = crate::openapi::StockAdjustmentDoc,
    responses((status = 200, description = "Adjusted"), (status = 400, description = "Stock would go negative"), (status = 404, description = "Not Found")))]
pub async fn adjust_stock(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StockAdjustment>,
) -> Result<Json<spare_part::Model>, JsonApiError> {
    let m = spare_part_service::adjust_stock(&state.db, id, body.delta).await?;
    info!(id = %m.id, delta = body.delta, quantity = m.quantity, "adjusted stock");
    Ok(Json(m))
}

#[utoipa::path(delete, path = "/api/spare-parts/{id}", tag = "spare-parts", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Spare part ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"), (status = 409, description = "Still referenced")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    spare_part_service::delete_spare_part(&state.db, id).await?;
    info!(%id, "deleted spare part");
    Ok(StatusCode::NO_CONTENT)
}
