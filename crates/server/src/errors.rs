use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use models::errors::ModelError;
use service::auth::errors::AuthError;
use service::booking::{BookingError, OtpError};
use service::errors::ServiceError;
use service::uploads::UploadError;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

/// Error response rendered as `{"error": title, "detail": detail}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
    /// Seconds for the `Retry-After` header.
    pub retry_after: Option<i64>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail, retry_after: None }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(detail.into()))
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(detail.into()))
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden", Some("admin role required".into()))
    }

    fn internal(detail: String) -> Self {
        error!(error = %detail, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", Some(detail))
    }

    fn too_many(detail: String, retry_after: Option<i64>) -> Self {
        Self { retry_after, ..Self::new(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests", Some(detail)) }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.title, detail: self.detail.as_deref() };
        let mut resp = (self.status, Json(body)).into_response();
        if let Some(secs) = self.retry_after {
            if let Ok(v) = HeaderValue::from_str(&secs.to_string()) {
                resp.headers_mut().insert(header::RETRY_AFTER, v);
            }
        }
        resp
    }
}

impl From<ModelError> for JsonApiError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => Self::bad_request(msg),
            ModelError::NotFound(what) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("{what} not found"))),
            ModelError::Conflict(msg) => Self::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            ModelError::Db(msg) => Self::internal(msg),
        }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::bad_request(msg),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            ServiceError::Db(msg) => Self::internal(msg),
            ServiceError::Model(m) => m.into(),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => Self::bad_request(msg),
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
            AuthError::NotFound => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string())),
            AuthError::Unauthorized => Self::unauthorized(e.to_string()),
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
                error!(code = e.code(), "auth failure");
                Self::internal(e.to_string())
            }
        }
    }
}

impl From<OtpError> for JsonApiError {
    fn from(e: OtpError) -> Self {
        let detail = e.to_string();
        match e {
            OtpError::NotIssued | OtpError::Expired => Self::new(StatusCode::GONE, "Code Expired", Some(detail)),
            OtpError::Mismatch { .. } => Self::bad_request(detail),
            OtpError::Locked | OtpError::ResendLimit => Self::too_many(detail, None),
            OtpError::Cooldown { retry_after_secs } => Self::too_many(detail, Some(retry_after_secs)),
        }
    }
}

impl From<BookingError> for JsonApiError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::Otp(otp) => otp.into(),
            BookingError::Service(s) => s.into(),
            BookingError::NotPending(_) => Self::new(StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
            BookingError::InvalidTransition { .. } => Self::bad_request(e.to_string()),
            BookingError::Sms(_) => {
                error!(error = %e, "sms delivery failed");
                Self::new(StatusCode::BAD_GATEWAY, "SMS Delivery Failed", Some(e.to_string()))
            }
        }
    }
}

impl From<UploadError> for JsonApiError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Invalid(msg) => Self::bad_request(msg),
            UploadError::TooLarge { .. } => Self::new(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large", Some(e.to_string())),
            UploadError::Io(io) => Self::internal(io.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status() {
        assert_eq!(JsonApiError::from(ServiceError::validation("x")).status, StatusCode::BAD_REQUEST);
        assert_eq!(JsonApiError::from(ServiceError::not_found("bike")).status, StatusCode::NOT_FOUND);
        assert_eq!(JsonApiError::from(ServiceError::Conflict("dup".into())).status, StatusCode::CONFLICT);
        assert_eq!(
            JsonApiError::from(ServiceError::Model(ModelError::Conflict("dup".into()))).status,
            StatusCode::CONFLICT
        );
        assert_eq!(JsonApiError::from(ServiceError::Db("down".into())).status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn otp_errors_map_to_status() {
        assert_eq!(JsonApiError::from(OtpError::Expired).status, StatusCode::GONE);
        assert_eq!(JsonApiError::from(OtpError::Locked).status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(JsonApiError::from(OtpError::Mismatch { remaining: 2 }).status, StatusCode::BAD_REQUEST);
        let cooldown = JsonApiError::from(OtpError::Cooldown { retry_after_secs: 42 });
        assert_eq!(cooldown.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(cooldown.retry_after, Some(42));
        let resp = cooldown.into_response();
        assert_eq!(resp.headers().get(header::RETRY_AFTER).unwrap(), "42");
    }

    #[test]
    fn upload_errors_map_to_status() {
        assert_eq!(JsonApiError::from(UploadError::TooLarge { size: 10, max: 5 }).status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(JsonApiError::from(UploadError::Invalid("bad".into())).status, StatusCode::BAD_REQUEST);
    }
}
