/// CRUD round trips against a live database
pub mod crud_tests;

/// Multi-row writes inside transactions
pub mod transaction_tests;

use sea_orm::DatabaseConnection;
use migration::MigratorTrait;

/// Connect and migrate, or `None` when no database is available for tests.
pub(crate) async fn setup_test_db() -> Option<DatabaseConnection> {
    let _ = crate::db::DATABASE_URL.as_str();
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return None;
    }
    let db = match crate::db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

/// Unique 10-digit phone so parallel tests never collide.
pub(crate) fn unique_phone() -> String {
    let n = uuid::Uuid::new_v4().as_u128() % 10_000_000_000;
    format!("{:010}", n)
}
