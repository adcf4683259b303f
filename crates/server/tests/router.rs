//! In-process router tests: auth repository and bookings run on the in-memory
//! implementations, so no database is needed.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::{routes, state::ServerState};
use service::auth::{repository::mock::MockAuthRepository, service::AuthConfig, AuthService};
use service::booking::repository::mock::MockBookingRepository;
use service::booking::sms::{SmsError, SmsSender};
use service::booking::{BookingService, OtpPolicy, OtpStore};
use service::uploads::ImageStore;

#[derive(Default)]
struct RecordingSms {
    sent: Mutex<Vec<String>>,
}

impl RecordingSms {
    fn last_code(&self) -> String {
        let sent = self.sent.lock().unwrap();
        let msg = sent.last().expect("no sms sent");
        msg.split_whitespace()
            .find(|w| w.len() == 6 && w.chars().all(|c| c.is_ascii_digit()))
            .expect("no code in message")
            .to_string()
    }
}

#[async_trait]
impl SmsSender for RecordingSms {
    async fn send(&self, _to: &str, message: &str) -> Result<(), SmsError> {
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

fn test_app() -> (Router, Arc<RecordingSms>) {
    let sms = Arc::new(RecordingSms::default());
    let policy = OtpPolicy {
        ttl: Duration::seconds(300),
        resend_cooldown: Duration::seconds(60),
        max_attempts: 3,
        max_resends: 2,
    };
    let state = ServerState {
        db: DatabaseConnection::default(),
        auth: Arc::new(AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::new("router-test-secret", 1))),
        bookings: Arc::new(BookingService::new(Arc::new(MockBookingRepository::default()), OtpStore::new(policy), sms.clone())),
        images: ImageStore::new(std::env::temp_dir().join("dealership-router-tests"), 1024),
        frontend_dir: "/nonexistent-frontend".into(),
    };
    let cors = tower_http::cors::CorsLayer::very_permissive();
    (routes::build_router(state, cors), sms)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn bearer_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn register_and_login(app: &Router, email: &str) -> String {
    let (status, _) = send(app, json_request("POST", "/auth/register", json!({"email": email, "name": "Tester", "password": "S3curePass!"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(app, json_request("POST", "/auth/login", json!({"email": email, "password": "S3curePass!"}))).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Request::builder().uri("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn staff_routes_require_token() {
    let (app, _) = test_app();
    let (status, body) = send(&app, Request::builder().uri("/api/customers").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");

    let (status, _) = send(&app, bearer_get("/api/customers", "not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let basic = Request::builder()
        .uri("/api/bills")
        .header(header::AUTHORIZATION, "Basic Zm9vOmJhcg==")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, basic).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_sets_cookie_and_me_reads_claims() {
    let (app, _) = test_app();
    send(&app, json_request("POST", "/auth/register", json!({"email": "owner@dealer.test", "name": "Owner", "password": "S3curePass!"}))).await;

    let resp = app
        .clone()
        .oneshot(json_request("POST", "/auth/login", json!({"email": "owner@dealer.test", "password": "S3curePass!"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(cookie.starts_with("auth_token="));
    assert!(cookie.contains("HttpOnly"));
    let token_pair = cookie.split(';').next().unwrap().to_string();

    let by_cookie = Request::builder().uri("/auth/me").header(header::COOKIE, token_pair).body(Body::empty()).unwrap();
    let (status, body) = send(&app, by_cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "owner@dealer.test");
    assert_eq!(body["role"], "admin");

    let (status, _) = send(&app, json_request("POST", "/auth/login", json!({"email": "owner@dealer.test", "password": "wrong-pass"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_bad_input_and_duplicates() {
    let (app, _) = test_app();
    let (status, _) = send(&app, json_request("POST", "/auth/register", json!({"email": "nope", "name": "X", "password": "S3curePass!"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, json_request("POST", "/auth/register", json!({"email": "a@b.test", "name": "X", "password": "short"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    register_and_login(&app, "dup@dealer.test").await;
    let (status, _) = send(&app, json_request("POST", "/auth/register", json!({"email": "dup@dealer.test", "name": "X", "password": "S3curePass!"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn user_admin_routes_are_admin_only() {
    let (app, _) = test_app();
    let _admin = register_and_login(&app, "first@dealer.test").await;
    let staff = register_and_login(&app, "second@dealer.test").await;

    let (status, body) = send(&app, bearer_get("/auth/me", &staff)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "staff");

    let (status, body) = send(&app, bearer_get("/api/users", &staff)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");
}

#[tokio::test]
async fn booking_otp_flow_over_http() {
    let (app, sms) = test_app();
    let day = (Utc::now().date_naive() + Duration::days(3)).to_string();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/public/service-bookings",
            json!({"customer_name": "Meera", "phone": "98450 22222", "vehicle_number": "ka 05 mn 4321", "preferred_date": day}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending_verification");
    assert_eq!(body["vehicle_number"], "KA05MN4321");
    assert!(body.get("code").is_none());
    let id = body["id"].as_str().unwrap().to_string();

    let code = sms.last_code();
    let wrong = if code == "000000" { "111111" } else { "000000" };
    let (status, body) = send(&app, json_request("POST", &format!("/public/service-bookings/{id}/verify"), json!({"code": wrong}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains('2'));

    let resp = app
        .clone()
        .oneshot(json_request("POST", &format!("/public/service-bookings/{id}/resend"), json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key(header::RETRY_AFTER));

    let (status, body) = send(&app, json_request("POST", &format!("/public/service-bookings/{id}/verify"), json!({"code": code}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");

    let (status, _) = send(&app, json_request("POST", &format!("/public/service-bookings/{id}/verify"), json!({"code": code}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let token = register_and_login(&app, "desk@dealer.test").await;
    let (status, body) = send(&app, bearer_get("/api/service-bookings?status=confirmed", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    let done = Request::builder()
        .method("PUT")
        .uri(format!("/api/service-bookings/{id}/status"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"status": "completed"}).to_string()))
        .unwrap();
    let (status, body) = send(&app, done).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
}

#[tokio::test]
async fn booking_rejects_past_dates_and_unknown_ids() {
    let (app, sms) = test_app();
    let yesterday = (Utc::now().date_naive() - Duration::days(1)).to_string();
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/public/service-bookings",
            json!({"customer_name": "Meera", "phone": "9845022222", "vehicle_number": "KA05", "preferred_date": yesterday}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(sms.sent.lock().unwrap().is_empty());

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(&app, json_request("POST", &format!("/public/service-bookings/{missing}/verify"), json!({"code": "123456"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_and_docs_are_served() {
    let (app, _) = test_app();
    server::metrics::init();
    send(&app, Request::builder().uri("/health").body(Body::empty()).unwrap()).await;

    let resp = app.clone().oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let text = String::from_utf8(axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();
    assert!(text.contains("otp_sent_total"));
    assert!(text.contains("http_requests_total"));

    let (status, body) = send(&app, Request::builder().uri("/api-docs/openapi.json").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/public/service-bookings"].is_object());

    let names = |path: &str| -> Vec<String> {
        body["paths"][path]["get"]["parameters"]
            .as_array()
            .map(|ps| ps.iter().filter_map(|p| p["name"].as_str().map(str::to_string)).collect())
            .unwrap_or_default()
    };
    let bikes = names("/api/bikes");
    for expected in ["page", "per_page", "brand", "in_stock"] {
        assert!(bikes.iter().any(|n| n == expected), "missing {expected} in {bikes:?}");
    }
    assert!(names("/api/service-bookings").iter().any(|n| n == "status"));
    assert!(names("/api/statistics/revenue").iter().any(|n| n == "year"));
}
