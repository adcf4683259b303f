use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::insurance_policy::{self, InsurancePolicyPatch, NewInsurancePolicy};
use service::insurance_service::{self, InsuranceFilter, DEFAULT_EXPIRY_WINDOW_DAYS};

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpiringQuery {
    /// Window in days (default 30)
    pub days: Option<i64>,
}

#[utoipa::path(get, path = "/api/insurance", tag = "insurance", security(("bearer" = [])),
    params(Pagination, InsuranceFilter),
    responses((status = 200, description = "List OK")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(p): Query<Pagination>,
    Query(filter): Query<InsuranceFilter>,
) -> Result<Json<Page<insurance_policy::Model>>, JsonApiError> {
    Ok(Json(insurance_service::list_policies(&state.db, filter, p).await?))
}

#[utoipa::path(get, path = "/api/insurance/expiring", tag = "insurance", security(("bearer" = [])),
    params(ExpiringQuery),
    responses((status = 200, description = "Policies ending within the window"), (status = 400, description = "Negative window")))]
pub async fn expiring(
    State(state): State<ServerState>,
    Query(q): Query<ExpiringQuery>,
) -> Result<Json<Vec<insurance_policy::Model>>, JsonApiError> {
    let days = q.days.unwrap_or(DEFAULT_EXPIRY_WINDOW_DAYS);
    let policies = insurance_service::expiring_policies(&state.db, Utc::now().date_naive(), days).await?;
    info!(days, count = policies.len(), "expiring policies");
    Ok(Json(policies))
}

#[utoipa::path(post, path = "/api/insurance", tag = "insurance", security(("bearer" = [])),
    request_body = crate::openapi::InsuranceDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 409, description = "Duplicate policy number")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewInsurancePolicy>,
) -> Result<(StatusCode, Json<insurance_policy::Model>), JsonApiError> {
    let m = insurance_service::create_policy(&state.db, input).await?;
    info!(id = %m.id, policy_number = %m.policy_number, end_date = %m.end_date, "created insurance policy");
    Ok((StatusCode::CREATED, Json(m)))
}

#[utoipa::path(get, path = "/api/insurance/{id}", tag = "insurance", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Policy ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<insurance_policy::Model>, JsonApiError> {
    Ok(Json(insurance_service::get_policy(&state.db, id).await?))
}

#[utoipa::path(put, path = "/api/insurance/{id}", tag = "insurance", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Policy ID")), request_body = crate::openapi::InsuranceDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<InsurancePolicyPatch>,
) -> Result<Json<insurance_policy::Model>, JsonApiError> {
    Ok(Json(insurance_service::update_policy(&state.db, id, patch).await?))
}

#[utoipa::path(delete, path = "/api/insurance/{id}", tag = "insurance", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Policy ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    insurance_service::delete_policy(&state.db, id).await?;
    info!(%id, "deleted insurance policy");
    Ok(StatusCode::NO_CONTENT)
}
