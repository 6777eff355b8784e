//! Storage connection management

use anyhow::{Context, Result};
use campus_config::StorageConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::info;

/// Prepare and establish the local SQLite connection pool
pub async fn prepare_database(config: &StorageConfig) -> Result<SqlitePool> {
    ensure_sqlite_directory(&config.url).await?;

    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("invalid storage url {}", config.url))?
        .create_if_missing(true)
        .busy_timeout(std::time::Duration::from_secs(5));

    let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections.max(1));

    // In-memory databases vanish with their last connection.
    if is_in_memory(&config.url) {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("failed to open storage {}", config.url))?;

    info!(url = %config.url, "storage connection established");
    Ok(pool)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Ensure the parent directory of an on-disk SQLite database exists
async fn ensure_sqlite_directory(url: &str) -> Result<()> {
    if is_in_memory(url) {
        return Ok(());
    }

    let Some(sqlite_path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };

    let sqlite_path = sqlite_path.split('?').next().unwrap_or(sqlite_path);
    let path = Path::new(sqlite_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create storage directory {}", parent.display())
            })?;
        }
    }

    Ok(())
}
