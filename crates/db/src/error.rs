use thiserror::Error;

/// Errors raised by the storage adapter.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("invalid database setting {field}: '{value}'")]
    InvalidConfig { field: &'static str, value: String },
}
