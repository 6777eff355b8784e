//! Campus Storage Crate
//!
//! Durable key-value storage for client-side state: SQLite connection
//! management, schema migrations, and the `KeyValueStore` implementations the
//! session layer persists credentials through.

pub mod connection;
pub mod errors;
pub mod memory;
pub mod migrations;
pub mod repos;
pub mod store;

pub use connection::prepare_database;
pub use errors::{StorageError, StorageResult};
pub use memory::MemoryKeyValueStore;
pub use migrations::run_migrations;
pub use repos::SqliteKeyValueStore;
pub use store::KeyValueStore;

pub use sqlx::SqlitePool;

use campus_config::StorageConfig;

/// Open the configured storage and bring its schema up to date
pub async fn initialize_storage(config: &StorageConfig) -> StorageResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| StorageError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| StorageError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}
