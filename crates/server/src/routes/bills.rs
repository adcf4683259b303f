use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use tracing::info;
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::bill;
use service::bill_service::{self, BillFilter, BillWithItems, CreateBill, PaidBill};

use crate::{errors::JsonApiError, metrics, state::ServerState};

#[utoipa::path(get, path = "/api/bills", tag = "bills", security(("bearer" = [])),
    params(Pagination, BillFilter),
    responses((status = 200, description = "List OK")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(p): Query<Pagination>,
    Query(filter): Query<BillFilter>,
) -> Result<Json<Page<bill::Model>>, JsonApiError> {
    Ok(Json(bill_service::list_bills(&state.db, filter, p).await?))
}

#[utoipa::path(post, path = "/api/bills", tag = "bills", security(("bearer" = [])),
    request_body = crate::openapi::CreateBillDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error or insufficient stock"),
        (status = 404, description = "Referenced record not found")))]
pub async fn create(State(state): State<ServerState>, Json(input): Json<CreateBill>) -> Result<(StatusCode, Json<BillWithItems>), JsonApiError> {
    let created = bill_service::create_bill(&state.db, input).await?;
    info!(id = %created.bill.id, number = %created.bill.bill_number, total_cents = created.bill.total_cents, "created bill");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/bills/{id}", tag = "bills", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Bill ID")),
    responses((status = 200, description = "Bill with items"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<BillWithItems>, JsonApiError> {
    Ok(Json(bill_service::get_bill(&state.db, id).await?))
}

#[utoipa::path(post, path = "/api/bills/{id}/pay", tag = "bills", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Bill ID")),
    responses((status = 200, description = "Paid, loyalty credited"), (status = 404, description = "Not Found"), (status = 409, description = "Already paid")))]
pub async fn pay(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<PaidBill>, JsonApiError> {
    let paid = bill_service::pay_bill(&state.db, id).await?;
    metrics::BILLS_PAID_TOTAL.inc();
    info!(%id, points = paid.points_earned, "bill paid");
    Ok(Json(paid))
}

#[utoipa::path(delete, path = "/api/bills/{id}", tag = "bills", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Bill ID")),
    responses((status = 204, description = "Deleted"), (status = 400, description = "Paid bills are kept"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    bill_service::delete_bill(&state.db, id).await?;
    info!(%id, "deleted bill");
    Ok(StatusCode::NO_CONTENT)
}
