use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Single-connection in-memory SQLite database.
///
/// Every pooled connection would open its own private in-memory database,
/// so the pool is pinned to one connection.
pub async fn memory_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    Database::connect(opt).await.unwrap()
}
