//! Connection pool construction.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

use crate::{Db, DbConfig, DbError, PoolConfig};

/// Open a pool with default sizing.
///
/// Connects eagerly so an unreachable host or rejected credentials surface
/// here rather than on the first request.
///
/// The pool is built from the individual fields through
/// [`DbConfig::connect_options`], not by parsing [`DbConfig::dsn`]; that
/// string is only rendered for logs. Values are therefore taken verbatim
/// (no key/value quoting), and empty fields keep the driver defaults.
pub async fn open(config: &DbConfig) -> Result<Db, DbError> {
    open_with(config, &PoolConfig::default()).await
}

/// Open a pool with explicit sizing.
pub async fn open_with(config: &DbConfig, pool: &PoolConfig) -> Result<Db, DbError> {
    let options = config.connect_options()?;

    tracing::info!(
        target: "bookshelf-db",
        dsn = %config.redacted_dsn(),
        max_connections = pool.max_connections,
        "opening database pool"
    );

    let db = PgPoolOptions::new()
        .max_connections(pool.max_connections)
        .acquire_timeout(Duration::from_millis(pool.acquire_timeout_ms))
        .connect_with(options)
        .await?;

    Ok(db)
}
