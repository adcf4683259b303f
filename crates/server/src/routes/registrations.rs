use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use tracing::info;
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::vehicle_registration::{self, NewRegistration, RegistrationPatch};
use service::registration_service::{self, RegistrationFilter};

use crate::{errors::JsonApiError, state::ServerState};

#[utoipa::path(get, path = "/api/registrations", tag = "registrations", security(("bearer" = [])),
    params(Pagination, RegistrationFilter),
    responses((status = 200, description = "List OK")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(p): Query<Pagination>,
    Query(filter): Query<RegistrationFilter>,
) -> Result<Json<Page<vehicle_registration::Model>>, JsonApiError> {
    Ok(Json(registration_service::list_registrations(&state.db, filter, p).await?))
}

#[utoipa::path(post, path = "/api/registrations", tag = "registrations", security(("bearer" = [])),
    request_body = crate::openapi::RegistrationDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 409, description = "Vehicle number taken")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NewRegistration>,
) -> Result<(StatusCode, Json<vehicle_registration::Model>), JsonApiError> {
    let m = registration_service::create_registration(&state.db, input).await?;
    info!(id = %m.id, vehicle_number = %m.vehicle_number, "created registration");
    Ok((StatusCode::CREATED, Json(m)))
}

#[utoipa::path(get, path = "/api/registrations/{id}", tag = "registrations", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Registration ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<vehicle_registration::Model>, JsonApiError> {
    Ok(Json(registration_service::get_registration(&state.db, id).await?))
}

#[utoipa::path(put, path = "/api/registrations/{id}", tag = "registrations", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Registration ID")), request_body = crate::openapi::RegistrationDoc,
    responses((status = 200, description = "Updated"), (status = 404, description = "Not Found"), (status = 409, description = "Vehicle number taken")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<RegistrationPatch>,
) -> Result<Json<vehicle_registration::Model>, JsonApiError> {
    Ok(Json(registration_service::update_registration(&state.db, id, patch).await?))
}

#[utoipa::path(delete, path = "/api/registrations/{id}", tag = "registrations", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Registration ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    registration_service::delete_registration(&state.db, id).await?;
    info!(%id, "deleted registration");
    Ok(StatusCode::NO_CONTENT)
}
