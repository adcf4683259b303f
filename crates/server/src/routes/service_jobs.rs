use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::service_job::{self, JobStatus, NewServiceJob, ServiceJobPatch};
use service::service_job_service::{self, ServiceJobFilter};

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: JobStatus,
}

#[utoipa::path(get, path = "/api/service-jobs", tag = "service-jobs", security(("bearer" = [])),
    params(Pagination, ServiceJobFilter),
    responses((status = 200, description = "List OK")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(p): Query<Pagination>,
    Query(filter): Query<ServiceJobFilter>,
) -> Result<Json<Page<service_job::Model>>, JsonApiError> {
    Ok(Json(service_job_service::list_service_jobs(&state.db, filter, p).await?))
}

#[utoipa::path(post, path = "/api/service-jobs", tag = "service-jobs", security(("bearer" = [])),
    request_body = crate::openapi::ServiceJobDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewServiceJob>,
) -> Result<(StatusCode, Json<service_job::Model>), JsonApiError> {
    let m = service_job_service::create_service_job(&state.db, input).await?;
    info!(id = %m.id, customer_id = %m.customer_id, vehicle = %m.vehicle_number, "opened service job");
    Ok((StatusCode::CREATED, Json(m)))
}

#[utoipa::path(get, path = "/api/service-jobs/{id}", tag = "service-jobs", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Service job ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<service_job::Model>, JsonApiError> {
    Ok(Json(service_job_service::get_service_job(&state.db, id).await?))
}

#[utoipa::path(put, path = "/api/service-jobs/{id}", tag = "service-jobs", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Service job ID")), request_body = crate::openapi::ServiceJobDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ServiceJobPatch>,
) -> Result<Json<service_job::Model>, JsonApiError> {
    Ok(Json(service_job_service::update_service_job(&state.db, id, patch).await?))
}

#[utoipa::path(put, path = "/api/service-jobs/{id}/status", tag = "service-jobs", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Service job ID")), request_body = crate::openapi::StatusChangeDoc,
    responses((status = 200, description = "Status changed"), (status = 400, description = "Transition not allowed"), (status = 404, description = "Not Found")))]
pub async fn change_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusChange>,
) -> Result<Json<service_job::Model>, JsonApiError> {
    Ok(Json(service_job_service::change_status(&state.db, id, body.status).await?))
}

#[utoipa::path(delete, path = "/api/service-jobs/{id}", tag = "service-jobs", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Service job ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"), (status = 409, description = "Still referenced")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    service_job_service::delete_service_job(&state.db, id).await?;
    info!(%id, "deleted service job");
    Ok(StatusCode::NO_CONTENT)
}
