//! PostgreSQL storage adapter for bookshelf.
//!
//! Builds the shared connection pool from a [`DbConfig`] and applies
//! module migrations against it.

pub mod config;
pub mod error;
pub mod migrate;
pub mod pool;

pub use config::{DbConfig, PoolConfig};
pub use error::DbError;
pub use migrate::{apply_migrations, Migration};
pub use pool::{open, open_with};

/// Handle shared by every request handler.
///
/// `PgPool` is reference counted and safe to clone across tasks.
pub type Db = sqlx::PgPool;
