use std::sync::Arc;

use sea_orm::DatabaseConnection;

use service::auth::AuthService;
use service::booking::BookingService;
use service::uploads::ImageStore;

/// Shared handler state; cloned per request.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService>,
    pub bookings: Arc<BookingService>,
    pub images: ImageStore,
    /// Static frontend assets served at `/`.
    pub frontend_dir: String,
}
