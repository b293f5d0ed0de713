use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use bookshelf_db::{DbConfig, PoolConfig};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKSHELF_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSHELF_CONFIG_DIR";
const ENV_PREFIX: &str = "BOOKSHELF";
const DB_ENV_PREFIX: &str = "DB";

/// Env file read at startup; its absence aborts the process.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration, read once at startup.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    /// Filled from the `DB_*` variables, never from config files.
    #[serde(skip)]
    pub database: DbConfig,
}

impl Settings {
    /// Load `.env` from the working directory, then layer config files and
    /// environment variables on top.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(DEFAULT_ENV_FILE))
    }

    /// Like [`Settings::load`] with an explicit env file.
    pub fn load_from(env_file: &Path) -> anyhow::Result<Self> {
        dotenvy::from_path(env_file)
            .with_context(|| format!("failed to load env file '{}'", env_file.display()))?;

        Self::from_env()
    }

    /// Build settings from the process environment and optional
    /// `config/base.toml` + `config/<env>.toml`.
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config"),
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let cfg = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        settings.environment = environment.parse()?;
        settings.database = database_from_env(None)?;

        Ok(settings)
    }
}

/// Read `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_NAME`, `DB_PASSWORD` and
/// `DB_SSLMODE`. Unset variables become empty strings.
///
/// `source` replaces the process environment when given.
pub fn database_from_env(
    source: Option<config::Map<String, String>>,
) -> anyhow::Result<DbConfig> {
    config::Config::builder()
        .add_source(config::Environment::with_prefix(DB_ENV_PREFIX).source(source))
        .build()
        .context("failed to read database environment")?
        .try_deserialize()
        .context("failed to deserialize database environment")
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub cors_permissive: bool,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        3000
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }

    /// `host:port` string handed to the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
