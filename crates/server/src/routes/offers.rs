use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::offer::{self, NewOffer, OfferPatch};
use service::offer_service;

use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActiveQuery {
    /// Day to check (default today)
    pub on: Option<NaiveDate>,
}

#[utoipa::path(get, path = "/api/offers", tag = "offers", security(("bearer" = [])),
    params(Pagination),
    responses((status = 200, description = "List OK")))]
pub async fn list(State(state): State<ServerState>, Query(p): Query<Pagination>) -> Result<Json<Page<offer::Model>>, JsonApiError> {
    Ok(Json(offer_service::list_offers(&state.db, p).await?))
}

#[utoipa::path(get, path = "/api/offers/active", tag = "offers", security(("bearer" = [])),
    params(ActiveQuery),
    responses((status = 200, description = "Offers valid on the day")))]
pub async fn active(State(state): State<ServerState>, Query(q): Query<ActiveQuery>) -> Result<Json<Vec<offer::Model>>, JsonApiError> {
    let day = q.on.unwrap_or_else(|| Utc::now().date_naive());
    Ok(Json(offer_service::active_offers(&state.db, day).await?))
}

#[utoipa::path(post, path = "/api/offers", tag = "offers", security(("bearer" = [])),
    request_body = crate::openapi::OfferDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create(State(state): State<ServerState>, Json(input): Json<NewOffer>) -> Result<(StatusCode, Json<offer::Model>), JsonApiError> {
    let m = offer_service::create_offer(&state.db, input).await?;
    info!(id = %m.id, percent = m.discount_percent, "created offer");
    Ok((StatusCode::CREATED, Json(m)))
}

#[utoipa::path(get, path = "/api/offers/{id}", tag = "offers", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Offer ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<offer::Model>, JsonApiError> {
    Ok(Json(offer_service::get_offer(&state.db, id).await?))
}

#[utoipa::path(put, path = "/api/offers/{id}", tag = "offers", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Offer ID")), request_body = crate::openapi::OfferDoc,
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<OfferPatch>,
) -> Result<Json<offer::Model>, JsonApiError> {
    Ok(Json(offer_service::update_offer(&state.db, id, patch).await?))
}

#[utoipa::path(delete, path = "/api/offers/{id}", tag = "offers", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Offer ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found"), (status = 409, description = "Used by a bill")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    offer_service::delete_offer(&state.db, id).await?;
    info!(%id, "deleted offer");
    Ok(StatusCode::NO_CONTENT)
}
