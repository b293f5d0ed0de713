//! Connection settings for the PostgreSQL server.

use std::str::FromStr;

use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::DbError;

/// Connection parameters, all kept as raw strings the way they arrive from
/// the environment.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct DbConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub user: String,
    #[serde(default, rename = "name")]
    pub dbname: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub sslmode: String,
}

impl DbConfig {
    /// Key/value connection string in libpq order.
    pub fn dsn(&self) -> String {
        self.format_dsn(&self.password)
    }

    /// Same as [`DbConfig::dsn`] with the password masked, for logs.
    pub fn redacted_dsn(&self) -> String {
        let mask = if self.password.is_empty() { "" } else { "*****" };
        self.format_dsn(mask)
    }

    fn format_dsn(&self, password: &str) -> String {
        format!(
            "host={} port={} user={} dbname={} password={} sslmode={}",
            self.host, self.port, self.user, self.dbname, password, self.sslmode
        )
    }

    /// Translate the settings into sqlx connect options.
    ///
    /// Empty fields keep the driver default (PG* environment or built-in).
    pub fn connect_options(&self) -> Result<PgConnectOptions, DbError> {
        let mut options = PgConnectOptions::new();

        if !self.host.is_empty() {
            options = options.host(&self.host);
        }
        if !self.port.is_empty() {
            let port = self
                .port
                .trim()
                .parse::<u16>()
                .map_err(|_| DbError::InvalidConfig {
                    field: "port",
                    value: self.port.clone(),
                })?;
            options = options.port(port);
        }
        if !self.user.is_empty() {
            options = options.username(&self.user);
        }
        if !self.dbname.is_empty() {
            options = options.database(&self.dbname);
        }
        if !self.password.is_empty() {
            options = options.password(&self.password);
        }
        if !self.sslmode.is_empty() {
            let mode =
                PgSslMode::from_str(&self.sslmode).map_err(|_| DbError::InvalidConfig {
                    field: "sslmode",
                    value: self.sslmode.clone(),
                })?;
            options = options.ssl_mode(mode);
        }

        Ok(options)
    }
}

/// Pool sizing knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    #[serde(default = "PoolConfig::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "PoolConfig::default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

impl PoolConfig {
    fn default_max_connections() -> u32 {
        10
    }

    fn default_acquire_timeout_ms() -> u64 {
        5000
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: Self::default_max_connections(),
            acquire_timeout_ms: Self::default_acquire_timeout_ms(),
        }
    }
}
