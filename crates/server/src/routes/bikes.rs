use axum::{extract::{Multipart, Path, Query, State}, http::StatusCode, Json};
use tracing::{error, info};
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::bike::{self, BikePatch, NewBike};
use service::bike_service::{self, BikeFilter};

use crate::{errors::JsonApiError, state::ServerState};

/// Multipart field carrying the picture.
const IMAGE_FIELD: &str = "image";

#[utoipa::path(get, path = "/api/bikes", tag = "bikes", security(("bearer" = [])),
    params(Pagination, BikeFilter),
    responses((status = 200, description = "List OK")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(p): Query<Pagination>,
    Query(filter): Query<BikeFilter>,
) -> Result<Json<Page<bike::Model>>, JsonApiError> {
    Ok(Json(bike_service::list_bikes(&state.db, filter, p).await?))
}

#[utoipa::path(post, path = "/api/bikes", tag = "bikes", security(("bearer" = [])),
    request_body = crate::openapi::BikeDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create(State(state): State<ServerState>, Json(input): Json<NewBike>) -> Result<(StatusCode, Json<bike::Model>), JsonApiError> {
    let m = bike_service::create_bike(&state.db, input).await?;
    info!(id = %m.id, brand = %m.brand, model = %m.model_name, "created bike");
    Ok((StatusCode::CREATED, Json(m)))
}

#[utoipa::path(get, path = "/api/bikes/{id}", tag = "bikes", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Bike ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<bike::Model>, JsonApiError> {
    Ok(Json(bike_service::get_bike(&state.db, id).await?))
}

#[utoipa::path(put, path = "/api/bikes/{id}", tag = "bikes", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Bike ID")), request_body = crate::openapi::BikeDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<BikePatch>,
) -> Result<Json<bike::Model>, JsonApiError> {
    let m = bike_service::update_bike(&state.db, id, patch).await?;
    info!(id = %m.id, stock = m.stock, "updated bike");
    Ok(Json(m))
}

#[utoipa::path(delete, path = "/api/bikes/{id}", tag = "bikes", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Bike ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"), (status = 409, description = "Still referenced")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    let removed = bike_service::delete_bike(&state.db, id).await?;
    if let Some(file) = removed.image_path.as_deref() {
        state.images.remove(file).await;
    }
    info!(%id, "deleted bike");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/bikes/{id}/image", tag = "bikes", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Bike ID")),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Field `image`: png, jpg, jpeg or webp"),
    responses((status = 200, description = "Image stored"), (status = 400, description = "Bad file"),
        (status = 404, description = "Not Found"), (status = 413, description = "Too large")))]
pub async fn upload_image(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<bike::Model>, JsonApiError> {
    // fail fast before touching the disk
    bike_service::get_bike(&state.db, id).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| JsonApiError::bad_request(format!("failed to read upload: {e}")))?;
        upload = Some((file_name, data));
        break;
    }
    let (file_name, data) = upload.ok_or_else(|| JsonApiError::bad_request("multipart field `image` is required"))?;

    let stored = state.images.save(&file_name, &data).await?;
    match bike_service::set_bike_image(&state.db, id, &stored).await {
        Ok((m, previous)) => {
            if let Some(prev) = previous {
                state.images.remove(&prev).await;
            }
            info!(id = %m.id, file = %stored, "bike image updated");
            Ok(Json(m))
        }
        Err(e) => {
            error!(%id, err = %e, "bike image update failed, removing stored file");
            state.images.remove(&stored).await;
            Err(e.into())
        }
    }
}
