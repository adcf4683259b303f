//! Service-date bookings. The `public_*` handlers need no token; customers
//! confirm ownership of the phone number with the texted code.

use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::service_booking::{self, BookingStatus, NewBooking};
use service::booking::repository::BookingFilter;
use service::booking::BookingReceipt;

use crate::{errors::JsonApiError, metrics, state::ServerState};

#[derive(Debug, Deserialize)]
pub struct VerifyCode {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct BookingStatusChange {
    pub status: BookingStatus,
}

#[utoipa::path(post, path = "/public/service-bookings", tag = "bookings", request_body = crate::openapi::BookingRequestDoc,
    responses((status = 201, description = "Stored, code sent by SMS"), (status = 400, description = "Validation Error"),
        (status = 502, description = "SMS delivery failed")))]
pub async fn public_request(
    State(state): State<ServerState>,
    Json(input): Json<NewBooking>,
) -> Result<(StatusCode, Json<BookingReceipt>), JsonApiError> {
    let receipt = state.bookings.request(input).await?;
    metrics::OTP_SENT_TOTAL.inc();
    Ok((StatusCode::CREATED, Json(receipt)))
}

#[utoipa::path(post, path = "/public/service-bookings/{id}/verify", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")), request_body = crate::openapi::VerifyCodeDoc,
    responses((status = 200, description = "Confirmed"), (status = 400, description = "Wrong code"),
        (status = 404, description = "Not Found"), (status = 409, description = "Not awaiting verification"),
        (status = 410, description = "Code expired"), (status = 429, description = "Too many attempts")))]
pub async fn public_verify(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<VerifyCode>,
) -> Result<Json<service_booking::Model>, JsonApiError> {
    Ok(Json(state.bookings.verify(id, &body.code).await?))
}

#[utoipa::path(post, path = "/public/service-bookings/{id}/resend", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses((status = 200, description = "New code sent"), (status = 404, description = "Not Found"),
        (status = 409, description = "Not awaiting verification"), (status = 429, description = "Cooldown or resend limit"),
        (status = 502, description = "SMS delivery failed")))]
pub async fn public_resend(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<BookingReceipt>, JsonApiError> {
    let receipt = state.bookings.resend(id).await?;
    metrics::OTP_SENT_TOTAL.inc();
    Ok(Json(receipt))
}

#[utoipa::path(get, path = "/api/service-bookings", tag = "bookings", security(("bearer" = [])),
    params(Pagination, BookingFilter),
    responses((status = 200, description = "List OK")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(p): Query<Pagination>,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<Page<service_booking::Model>>, JsonApiError> {
    Ok(Json(state.bookings.list(filter, p).await?))
}

#[utoipa::path(get, path = "/api/service-bookings/{id}", tag = "bookings", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<service_booking::Model>, JsonApiError> {
    Ok(Json(state.bookings.get(id).await?))
}

#[utoipa::path(put, path = "/api/service-bookings/{id}/status", tag = "bookings", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")), request_body = crate::openapi::StatusChangeDoc,
    responses((status = 200, description = "Status changed"), (status = 400, description = "Transition not allowed"), (status = 404, description = "Not Found")))]
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<BookingStatusChange>,
) -> Result<Json<service_booking::Model>, JsonApiError> {
    let m = state.bookings.update_status(id, body.status).await?;
    info!(%id, status = %m.status, "booking status changed");
    Ok(Json(m))
}

#[utoipa::path(delete, path = "/api/service-bookings/{id}", tag = "bookings", security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.bookings.delete(id).await?;
    info!(%id, "deleted service booking");
    Ok(StatusCode::NO_CONTENT)
}
