use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }
}

// Route through ModelError so constraint violations keep their meaning.
impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self { ServiceError::Model(ModelError::from(e)) }
}

/// Deleting a row that other rows still point at is a conflict, not bad input.
pub(crate) fn delete_error(entity: &str, e: DbErr) -> ServiceError {
    match e.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            ServiceError::Conflict(format!("{} is referenced by other records", entity))
        }
        _ => e.into(),
    }
}
