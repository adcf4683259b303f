use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use configs::AppConfig;
use service::auth::{repo::SeaOrmAuthRepository, service::AuthConfig, AuthService};
use service::booking::{repository::seaorm::SeaOrmBookingRepository, sms::sender_from_config, BookingService, OtpPolicy, OtpStore};
use service::uploads::ImageStore;

use crate::{errors::StartupError, metrics, routes, state::ServerState};

/// How often expired one-time codes are dropped from memory.
const OTP_PURGE_INTERVAL: Duration = Duration::from_secs(60);

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

fn spawn_otp_purge(bookings: Arc<BookingService>) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(OTP_PURGE_INTERVAL);
        loop {
            tick.tick().await;
            let cleared = bookings.otp().purge_expired(Utc::now());
            if cleared > 0 {
                debug!(cleared, "cleared expired one-time codes");
            }
        }
    });
}

/// Wire the services on top of the database and configuration.
pub fn build_state(cfg: &AppConfig, db: sea_orm::DatabaseConnection) -> ServerState {
    let auth = AuthService::new(
        Arc::new(SeaOrmAuthRepository::new(db.clone())),
        AuthConfig::new(cfg.auth.jwt_secret.clone(), cfg.auth.token_ttl_hours),
    );
    let bookings = BookingService::new(
        Arc::new(SeaOrmBookingRepository::new(db.clone())),
        OtpStore::new(OtpPolicy::from(&cfg.otp)),
        sender_from_config(&cfg.otp),
    );
    ServerState {
        db,
        auth: Arc::new(auth),
        bookings: Arc::new(bookings),
        images: ImageStore::new(&cfg.uploads.dir, cfg.uploads.max_bytes),
        frontend_dir: cfg.server.frontend_dir.clone(),
    }
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
///
/// The caller owns `.env` loading, logging setup and config loading.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = cfg
        .server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}: {e}", cfg.server.bind_addr())))?;
    if cfg.auth.uses_dev_secret() {
        warn!("JWT secret is the development default; set JWT_SECRET or [auth].jwt_secret");
    }
    if cfg.otp.sms_gateway_url.is_none() {
        warn!("no SMS gateway configured; one-time codes are only logged");
    }

    common::env::ensure_env(&cfg.server.frontend_dir, &[cfg.server.data_dir.as_str(), cfg.uploads.dir.as_str()]).await?;

    let db = models::db::connect_with_config(&models::db::DatabaseConfig::from(&cfg.database)).await?;
    models::db::ping(&db).await?;

    metrics::init();
    let state = build_state(&cfg, db);
    spawn_otp_purge(Arc::clone(&state.bookings));

    let app: Router = routes::build_router(state, build_cors());

    info!(%addr, "starting dealership server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bad_bind_address_fails_before_touching_anything() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        cfg.server.data_dir = "/definitely/not/created/data".into();
        let err = run(cfg).await.unwrap_err();
        assert!(err.to_string().starts_with("invalid configuration: bind address"), "{err}");
        assert!(std::fs::metadata("/definitely/not/created/data").is_err());
    }
}
