// Database - SQLite pool setup shared by the document store and the event repository

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// Open a pool for `config.url`, creating the database file if needed
pub async fn connect(config: &DatabaseConfig) -> AppResult<SqlitePool> {
    if config.url.contains(":memory:") {
        return connect_in_memory().await;
    }

    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| AppError::ConfigurationError(format!("Invalid DATABASE_URL {}: {}", config.url, e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    let filename = options.clone().get_filename();
    if let Some(parent) = filename.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .connect_with(options)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect to {}: {}", config.url, e)))?;

    info!("Connected to SQLite database at {}", config.url);
    Ok(pool)
}

/// Single-connection in-memory pool; every connection would otherwise see its own database
pub async fn connect_in_memory() -> AppResult<SqlitePool> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect to in-memory SQLite: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_connect_creates_database_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("nested").join("seed.db");
        let config = DatabaseConfig {
            url: format!("sqlite:{}", file.display()),
            max_connections: 2,
        };

        let pool = connect(&config).await.unwrap();
        sqlx::query("CREATE TABLE probe (id INTEGER PRIMARY KEY)")
            .execute(&pool)
            .await
            .unwrap();

        assert!(file.exists());
    }

    #[tokio::test]
    async fn test_in_memory_pool_keeps_state() {
        let pool = connect_in_memory().await.unwrap();
        sqlx::query("CREATE TABLE probe (id INTEGER PRIMARY KEY)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO probe (id) VALUES (1)")
            .execute(&pool)
            .await
            .unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM probe")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
