use axum::{extract::{Path, Query, State}, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use service::loyalty_service::{self, LoyaltyView};

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Deserialize)]
pub struct Redeem {
    pub points: i64,
}

#[utoipa::path(get, path = "/api/loyalty", tag = "loyalty", security(("bearer" = [])),
    params(Pagination),
    responses((status = 200, description = "Accounts with tier")))]
pub async fn list(State(state): State<ServerState>, Query(p): Query<Pagination>) -> Result<Json<Page<LoyaltyView>>, JsonApiError> {
    Ok(Json(loyalty_service::list_accounts(&state.db, p).await?))
}

#[utoipa::path(get, path = "/api/loyalty/customer/{customer_id}", tag = "loyalty", security(("bearer" = [])),
    params(("customer_id" = Uuid, Path, description = "Customer ID")),
    responses((status = 200, description = "Account, created on first access"), (status = 404, description = "Unknown customer")))]
pub async fn for_customer(State(state): State<ServerState>, Path(customer_id): Path<Uuid>) -> Result<Json<LoyaltyView>, JsonApiError> {
    Ok(Json(loyalty_service::account_for_customer(&state.db, customer_id).await?))
}

#[utoipa::path(post, path = "/api/loyalty/customer/{customer_id}/redeem", tag = "loyalty", security(("bearer" = [])),
    params(("customer_id" = Uuid, Path, description = "Customer ID")), request_body = crate::openapi::RedeemDoc,
    responses((status = 200, description = "Redeemed"), (status = 400, description = "Invalid or insufficient points"), (status = 404, description = "Unknown customer")))]
pub async fn redeem(
    State(state): State<ServerState>,
    Path(customer_id): Path<Uuid>,
    Json(body): Json<Redeem>,
) -> Result<Json<LoyaltyView>, JsonApiError> {
    let view = loyalty_service::redeem_points(&state.db, customer_id, body.points).await?;
    info!(%customer_id, points = body.points, balance = view.account.points, "redeemed loyalty points");
    Ok(Json(view))
}
