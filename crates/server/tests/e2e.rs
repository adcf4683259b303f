use std::net::SocketAddr;

use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::{routes, startup};

struct TestApp {
    base_url: String,
    client: reqwest::Client,
    token: String,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).bearer_auth(&self.token).json(&body).send().await.unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).bearer_auth(&self.token).send().await.unwrap()
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client.delete(self.url(path)).bearer_auth(&self.token).send().await.unwrap()
    }
}

fn db_tests_disabled() -> bool {
    let _ = models::db::DATABASE_URL.as_str();
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

fn unique_phone() -> String {
    format!("{:010}", Uuid::new_v4().as_u128() % 10_000_000_000)
}

async fn start_server() -> anyhow::Result<TestApp> {
    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("migrations notice: {}", e);
    }

    let mut cfg = configs::AppConfig::default();
    cfg.auth.jwt_secret = "e2e-secret".into();
    cfg.uploads.dir = format!("target/test-data/{}/uploads", Uuid::new_v4());
    let state = startup::build_state(&cfg, db);
    let app = routes::build_router(state, CorsLayer::very_permissive());

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let client = reqwest::Client::new();
    let email = format!("e2e_{}@dealer.test", Uuid::new_v4());
    let password = "S3curePass!";
    let resp = client
        .post(format!("{base_url}/auth/register"))
        .json(&json!({"email": email, "name": "E2E", "password": password}))
        .send()
        .await?;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let login: Value = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await?
        .json()
        .await?;
    let token = login["token"].as_str().unwrap_or_default().to_string();
    Ok(TestApp { base_url, client, token })
}

#[tokio::test]
async fn e2e_bill_payment_credits_loyalty() -> anyhow::Result<()> {
    if db_tests_disabled() {
        return Ok(());
    }
    let app = start_server().await?;

    let resp = app.post("/api/customers", json!({"name": "Ravi Kumar", "phone": unique_phone()})).await;
    assert_eq!(resp.status(), HttpStatusCode::CREATED);
    let customer: Value = resp.json().await?;
    let customer_id = customer["id"].as_str().unwrap().to_string();

    let part_number = format!("E2E-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let resp = app
        .post("/api/spare-parts", json!({"name": "Brake pad", "part_number": part_number, "quantity": 5, "unit_price_cents": 25_000}))
        .await;
    assert_eq!(resp.status(), HttpStatusCode::CREATED);
    let part: Value = resp.json().await?;
    let part_id = part["id"].as_str().unwrap().to_string();

    let resp = app
        .post(
            "/api/bills",
            json!({
                "customer_id": customer_id,
                "items": [
                    {"spare_part_id": part_id, "quantity": 2},
                    {"description": "Labour", "quantity": 1, "unit_price_cents": 50_000}
                ]
            }),
        )
        .await;
    assert_eq!(resp.status(), HttpStatusCode::CREATED);
    let bill: Value = resp.json().await?;
    assert_eq!(bill["total_cents"], 100_000);
    assert_eq!(bill["items"].as_array().map(|a| a.len()), Some(2));
    let bill_id = bill["id"].as_str().unwrap().to_string();

    let part: Value = app.get(&format!("/api/spare-parts/{part_id}")).await.json().await?;
    assert_eq!(part["quantity"], 3);

    let resp = app.post(&format!("/api/bills/{bill_id}/pay"), json!({})).await;
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let paid: Value = resp.json().await?;
    assert_eq!(paid["points_earned"], 10);

    let resp = app.post(&format!("/api/bills/{bill_id}/pay"), json!({})).await;
    assert_eq!(resp.status(), HttpStatusCode::CONFLICT);

    let loyalty: Value = app.get(&format!("/api/loyalty/customer/{customer_id}")).await.json().await?;
    assert_eq!(loyalty["points"], 10);
    assert_eq!(loyalty["tier"], "bronze");

    let resp = app.post(&format!("/api/loyalty/customer/{customer_id}/redeem"), json!({"points": 11})).await;
    assert_eq!(resp.status(), HttpStatusCode::BAD_REQUEST);

    // bills still point at the customer
    let resp = app.delete(&format!("/api/customers/{customer_id}")).await;
    assert_eq!(resp.status(), HttpStatusCode::CONFLICT);

    let resp = app.delete(&format!("/api/bills/{bill_id}")).await;
    assert_eq!(resp.status(), HttpStatusCode::BAD_REQUEST);

    let report: Value = app.get("/api/statistics/revenue").await.json().await?;
    assert_eq!(report["months"].as_array().map(|m| m.len()), Some(12));
    Ok(())
}

#[tokio::test]
async fn e2e_service_job_status_machine() -> anyhow::Result<()> {
    if db_tests_disabled() {
        return Ok(());
    }
    let app = start_server().await?;

    let customer: Value = app
        .post("/api/customers", json!({"name": "Job Owner", "phone": unique_phone()}))
        .await
        .json()
        .await?;
    let resp = app
        .post(
            "/api/service-jobs",
            json!({"customer_id": customer["id"], "vehicle_number": "KA01AB1234", "description": "General service"}),
        )
        .await;
    assert_eq!(resp.status(), HttpStatusCode::CREATED);
    let job: Value = resp.json().await?;
    assert_eq!(job["status"], "pending");
    let job_id = job["id"].as_str().unwrap().to_string();

    let put_status = |status: &'static str| {
        let req = app
            .client
            .put(app.url(&format!("/api/service-jobs/{job_id}/status")))
            .bearer_auth(&app.token)
            .json(&json!({"status": status}));
        async move { req.send().await.unwrap() }
    };
    assert_eq!(put_status("delivered").await.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(put_status("in_progress").await.status(), HttpStatusCode::OK);
    let done: Value = put_status("completed").await.json().await?;
    assert!(done["completed_at"].is_string());

    let resp = app
        .post("/api/service-jobs", json!({"customer_id": Uuid::new_v4(), "vehicle_number": "KA01", "description": "x"}))
        .await;
    assert_eq!(resp.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}
