use axum::{extract::{Path, Query, State}, http::StatusCode, Extension, Json};
use tracing::info;
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::user;
use service::auth::domain::Claims;
use service::user_service::{self, UserPatch};

use crate::{errors::JsonApiError, state::ServerState};

#[utoipa::path(get, path = "/api/users", tag = "users", security(("bearer" = [])),
    params(Pagination),
    responses((status = 200, description = "List OK"), (status = 403, description = "Admin only")))]
pub async fn list(State(state): State<ServerState>, Query(p): Query<Pagination>) -> Result<Json<Page<user::Model>>, JsonApiError> {
    Ok(Json(user_service::list_users(&state.db, p).await?))
}

#[utoipa::path(get, path = "/api/users/{id}", tag = "users", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(user_service::get_user(&state.db, id).await?))
}

#[utoipa::path(put, path = "/api/users/{id}", tag = "users", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "User ID")), request_body = crate::openapi::UserPatchDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<user::Model>, JsonApiError> {
    let m = user_service::update_user(&state.db, id, patch).await?;
    info!(id = %m.id, role = m.role.as_str(), "updated user");
    Ok(Json(m))
}

#[utoipa::path(delete, path = "/api/users/{id}", tag = "users", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 204, description = "Deleted"), (status = 400, description = "Cannot delete yourself"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    let actor = claims.user_id().map_err(|e| JsonApiError::unauthorized(e.to_string()))?;
    user_service::delete_user(&state.db, actor, id).await?;
    info!(%id, %actor, "deleted user");
    Ok(StatusCode::NO_CONTENT)
}
