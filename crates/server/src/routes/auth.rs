use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use models::user::Role;
use service::auth::domain::{AuthUser, Claims, LoginInput, RegisterInput};

use crate::{errors::JsonApiError, state::ServerState};

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub token: String,
    pub expires_at: i64,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub expires_at: i64,
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest,
    responses((status = 200, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(State(state): State<ServerState>, Json(input): Json<RegisterInput>) -> Result<Json<AuthUser>, JsonApiError> {
    let user = state.auth.register(input).await?;
    Ok(Json(user))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let user = session.user;
    let out = LoginOutput {
        user_id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
        token: session.token,
        expires_at: session.expires_at,
    };
    Ok((jar.add(cookie), Json(out)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", security(("bearer" = [])),
    responses((status = 200, description = "Current user"), (status = 401, description = "Unauthorized")))]
pub async fn me(Extension(claims): Extension<Claims>) -> Result<Json<MeOutput>, JsonApiError> {
    let user_id = claims.user_id().map_err(|e| JsonApiError::unauthorized(e.to_string()))?;
    Ok(Json(MeOutput { user_id, email: claims.email, role: claims.role, expires_at: claims.exp }))
}

/// Pull the token from `Authorization: Bearer` or fall back to the `auth_token` cookie.
/// `Ok(None)` means neither was sent.
fn extract_token(req: &Request) -> Result<Option<String>, ()> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION) {
        let h = h.to_str().map_err(|_| ())?;
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(Some(t.trim().to_string())),
            _ => Err(()),
        };
    }
    let jar = CookieJar::from_headers(req.headers());
    Ok(jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|t| !t.is_empty()))
}

/// Guards every staff route: missing token is 400, malformed or expired is 401.
/// Verified claims are stored as a request extension.
pub async fn require_bearer_token(State(state): State<ServerState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let token = match extract_token(&req) {
        Ok(Some(t)) => t,
        Ok(None) => {
            warn!(path = %path, "missing Authorization header and auth_token cookie");
            return JsonApiError::bad_request("missing bearer token").into_response();
        }
        Err(()) => {
            warn!(path = %path, "invalid Authorization format (expect Bearer)");
            return JsonApiError::unauthorized("invalid authorization header").into_response();
        }
    };
    match state.auth.verify_token(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => {
            warn!(path = %path, err = %e, "token validation failed");
            JsonApiError::unauthorized("invalid or expired token").into_response()
        }
    }
}

/// Runs after [`require_bearer_token`]; rejects non-admin callers with 403.
pub async fn require_admin(req: Request, next: Next) -> Response {
    match req.extensions().get::<Claims>() {
        Some(c) if c.is_admin() => next.run(req).await,
        Some(c) => {
            info!(user = %c.sub, path = %req.uri().path(), "admin route denied");
            JsonApiError::forbidden().into_response()
        }
        None => JsonApiError::unauthorized("missing claims").into_response(),
    }
}
