//! Configuration management for the Shipyard server
//!
//! Sources, lowest precedence first: the YAML config file, `SHIPYARD_*`
//! environment variables (`SHIPYARD_SERVER__PORT` sets `server.port`), then
//! command line arguments.

use std::time::Duration;

use clap::Parser;
use config::{Config, ConfigError, Environment};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::startup::LoggingConfig;

use super::constants::{
    AUTH_TOKEN_SECRET, DB_POOL_ACQUIRE_TIMEOUT, DB_POOL_CONNECT_TIMEOUT, DB_POOL_IDLE_TIMEOUT,
    DB_POOL_MAX_CONNECTIONS, DB_POOL_MAX_LIFETIME, DB_POOL_MIN_CONNECTIONS, DB_POOL_SQLX_LOGGING,
    DB_URL, DEFAULT_CONFIG_FILE, DEFAULT_SERVER_ADDRESS, DEFAULT_SERVER_PORT,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS, ENV_PREFIX, LOGS_CONSOLE, LOGS_FILE, LOGS_LEVEL, LOGS_PATH,
    SERVER_ADDRESS, SERVER_CORS_ENABLED, SERVER_PORT, SERVER_SHUTDOWN_TIMEOUT, SERVER_WORKERS,
};

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command(name = "shipyard", about = "Version-tracked shipping list service")]
struct Cli {
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    database_url: Option<String>,
    #[arg(long = "secret-key", env = "SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
}

/// `SHIPYARD_*` variables, kept as strings so secrets are never coerced.
/// Numeric and boolean keys are parsed by their accessors.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Load configuration from the config file, environment and CLI arguments
    pub fn new() -> Result<Self, ConfigError> {
        let args = Cli::parse();

        let mut config_builder = Config::builder()
            .add_source(config::File::with_name(&args.config_file).required(false))
            .add_source(environment());

        if let Some(v) = args.database_url {
            config_builder = config_builder.set_override(DB_URL, v)?;
        }
        if let Some(v) = args.secret_key {
            config_builder = config_builder.set_override(AUTH_TOKEN_SECRET, v)?;
        }
        if let Some(v) = args.port {
            config_builder = config_builder.set_override(SERVER_PORT, u64::from(v))?;
        }

        Ok(Self::from_config(config_builder.build()?))
    }

    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS)
            .unwrap_or(DEFAULT_SERVER_ADDRESS.to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT)
            .ok()
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// Number of HTTP workers; `None` lets actix use one per physical core
    pub fn server_workers(&self) -> Option<usize> {
        self.config
            .get_int(SERVER_WORKERS)
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
    }

    pub fn server_shutdown_timeout(&self) -> u64 {
        self.config
            .get_int(SERVER_SHUTDOWN_TIMEOUT)
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS)
    }

    pub fn cors_enabled(&self) -> bool {
        self.config.get_bool(SERVER_CORS_ENABLED).unwrap_or(true)
    }

    // ========================================================================
    // Authentication Configuration
    // ========================================================================

    /// Shared secret expected in `Authorization: Token <secret>`.
    ///
    /// There is no default: an unset or blank secret is a configuration error.
    pub fn token_secret(&self) -> Result<String, ConfigError> {
        let secret = self.config.get_string(AUTH_TOKEN_SECRET).unwrap_or_default();
        if secret.trim().is_empty() {
            return Err(ConfigError::Message(format!(
                "'{}' must be set (or pass --secret-key / SECRET_KEY)",
                AUTH_TOKEN_SECRET
            )));
        }
        Ok(secret)
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.config.get_string(LOGS_PATH).ok(),
            self.config.get_bool(LOGS_CONSOLE).unwrap_or(true),
            self.config.get_bool(LOGS_FILE).unwrap_or(true),
            self.config
                .get_string(LOGS_LEVEL)
                .unwrap_or("info".to_string()),
        )
    }

    // ========================================================================
    // Database Configuration
    // ========================================================================

    pub async fn database_connection(
        &self,
    ) -> std::result::Result<DatabaseConnection, Box<dyn std::error::Error>> {
        let max_connections = self.config.get_int(DB_POOL_MAX_CONNECTIONS).unwrap_or(10) as u32;
        let min_connections = self.config.get_int(DB_POOL_MIN_CONNECTIONS).unwrap_or(1) as u32;
        let connect_timeout = self.config.get_int(DB_POOL_CONNECT_TIMEOUT).unwrap_or(30) as u64;
        let acquire_timeout = self.config.get_int(DB_POOL_ACQUIRE_TIMEOUT).unwrap_or(8) as u64;
        let idle_timeout = self.config.get_int(DB_POOL_IDLE_TIMEOUT).unwrap_or(600) as u64;
        let max_lifetime = self.config.get_int(DB_POOL_MAX_LIFETIME).unwrap_or(1800) as u64;
        let sqlx_logging = self.config.get_bool(DB_POOL_SQLX_LOGGING).unwrap_or(false);

        let url = self.config.get_string(DB_URL)?;

        let mut opt = ConnectOptions::new(url);

        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .sqlx_logging(sqlx_logging)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        tracing::info!(
            max_connections = max_connections,
            min_connections = min_connections,
            connect_timeout = connect_timeout,
            idle_timeout = idle_timeout,
            max_lifetime = max_lifetime,
            sqlx_logging = sqlx_logging,
            "Database connection pool configured"
        );

        let database_connection: DatabaseConnection = Database::connect(opt).await?;

        Ok(database_connection)
    }
}
