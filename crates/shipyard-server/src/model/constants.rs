//! Common constants for the Shipyard server

// Server
pub const SERVER_ADDRESS: &str = "server.address";
pub const SERVER_PORT: &str = "server.port";
pub const SERVER_WORKERS: &str = "server.workers";
pub const SERVER_SHUTDOWN_TIMEOUT: &str = "server.shutdown_timeout";
pub const SERVER_CORS_ENABLED: &str = "server.cors.enabled";

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8000;
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// Database
pub const DB_URL: &str = "db.url";
pub const DB_POOL_MAX_CONNECTIONS: &str = "db.pool.max_connections";
pub const DB_POOL_MIN_CONNECTIONS: &str = "db.pool.min_connections";
pub const DB_POOL_CONNECT_TIMEOUT: &str = "db.pool.connect_timeout";
pub const DB_POOL_ACQUIRE_TIMEOUT: &str = "db.pool.acquire_timeout";
pub const DB_POOL_IDLE_TIMEOUT: &str = "db.pool.idle_timeout";
pub const DB_POOL_MAX_LIFETIME: &str = "db.pool.max_lifetime";
pub const DB_POOL_SQLX_LOGGING: &str = "db.pool.sqlx_logging";

// Authentication
pub const AUTH_TOKEN_SECRET: &str = "shipyard.auth.token.secret";
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const TOKEN_SCHEME: &str = "Token";

// Logging
pub const LOGS_PATH: &str = "shipyard.logs.path";
pub const LOGS_CONSOLE: &str = "shipyard.logs.console";
pub const LOGS_FILE: &str = "shipyard.logs.file";
pub const LOGS_LEVEL: &str = "shipyard.logs.level";

pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";
pub const ENV_PREFIX: &str = "shipyard";

// Routes that never require a token
pub const HEALTH_PATH_PREFIX: &str = "/health";
