use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::{metrics, openapi::ApiDoc, state::ServerState};

pub mod auth;
pub mod bikes;
pub mod bills;
pub mod bookings;
pub mod customers;
pub mod expenses;
pub mod insurance;
pub mod loyalty;
pub mod offers;
pub mod registrations;
pub mod service_jobs;
pub mod spare_parts;
pub mod statistics;
pub mod users;

/// Room for multipart boundaries and headers on top of the image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[utoipa::path(get, path = "/health", tag = "platform", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public, staff (bearer) and admin routes
/// plus static assets and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let index = format!("{}/index.html", state.frontend_dir.trim_end_matches('/'));
    let static_dir = ServeDir::new(&state.frontend_dir).fallback(ServeFile::new(index));
    let uploads = ServeDir::new(state.images.dir());
    let upload_limit = state.images.max_bytes() + MULTIPART_OVERHEAD;

    // No token required
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/public/service-bookings", post(bookings::public_request))
        .route("/public/service-bookings/:id/verify", post(bookings::public_verify))
        .route("/public/service-bookings/:id/resend", post(bookings::public_resend));

    let admin = Router::new()
        .route("/api/users", get(users::list))
        .route("/api/users/:id", get(users::get).put(users::update).delete(users::delete))
        .route_layer(middleware::from_fn(auth::require_admin));

    // Any signed-in staff member
    let staff = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/api/customers", get(customers::list).post(customers::create))
        .route("/api/customers/:id", get(customers::get).put(customers::update).delete(customers::delete))
        .route("/api/bikes", get(bikes::list).post(bikes::create))
        .route("/api/bikes/:id", get(bikes::get).put(bikes::update).delete(bikes::delete))
        .route(
            "/api/bikes/:id/image",
            post(bikes::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/spare-parts", get(spare_parts::list).post(spare_parts::create))
        .route("/api/spare-parts/low-stock", get(spare_parts::low_stock))
        .route(
            "/api/spare-parts/:id",
            get(spare_parts::get).put(spare_parts::update).delete(spare_parts::delete),
        )
        .route("/api/spare-parts/:id/stock", post(spare_parts::adjust_stock))
        .route("/api/service-jobs", get(service_jobs::list).post(service_jobs::create))
        .route(
            "/api/service-jobs/:id",
            get(service_jobs::get).put(service_jobs::update).delete(service_jobs::delete),
        )
        .route("/api/service-jobs/:id/status", put(service_jobs::change_status))
        .route("/api/offers", get(offers::list).post(offers::create))
        .route("/api/offers/active", get(offers::active))
        .route("/api/offers/:id", get(offers::get).put(offers::update).delete(offers::delete))
        .route("/api/bills", get(bills::list).post(bills::create))
        .route("/api/bills/:id", get(bills::get).delete(bills::delete))
        .route("/api/bills/:id/pay", post(bills::pay))
        .route("/api/loyalty", get(loyalty::list))
        .route("/api/loyalty/customer/:customer_id", get(loyalty::for_customer))
        .route("/api/loyalty/customer/:customer_id/redeem", post(loyalty::redeem))
        .route("/api/insurance", get(insurance::list).post(insurance::create))
        .route("/api/insurance/expiring", get(insurance::expiring))
        .route("/api/insurance/:id", get(insurance::get).put(insurance::update).delete(insurance::delete))
        .route("/api/expenses", get(expenses::list).post(expenses::create))
        .route("/api/expenses/:id", get(expenses::get).put(expenses::update).delete(expenses::delete))
        .route("/api/registrations", get(registrations::list).post(registrations::create))
        .route(
            "/api/registrations/:id",
            get(registrations::get).put(registrations::update).delete(registrations::delete),
        )
        .route("/api/service-bookings", get(bookings::list))
        .route("/api/service-bookings/:id", get(bookings::get).delete(bookings::delete))
        .route("/api/service-bookings/:id/status", put(bookings::update_status))
        .route("/api/statistics/revenue", get(statistics::revenue))
        .route("/api/statistics/jobs", get(statistics::jobs))
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token));

    public
        .merge(staff)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service("/uploads", uploads)
        .route_layer(middleware::from_fn(metrics::track))
        .fallback_service(static_dir)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
