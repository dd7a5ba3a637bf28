//! Ledger manager that opens the configured store provider.

use std::sync::Arc;

use tracing::info;

use licensegate_core::config::DatabaseConfig;
use licensegate_core::error::AppError;
use licensegate_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::ledger::SqlLedgerStore;
use crate::memory::MemoryLedgerStore;
use crate::migration::run_migrations;
use crate::store::LedgerStore;

/// Owns the ledger store selected by configuration and its teardown.
#[derive(Debug, Clone)]
pub struct LedgerManager {
    /// The active store.
    inner: Arc<dyn LedgerStore>,
    /// Pool backing the store, when SQL-backed.
    db: Option<DatabasePool>,
}

impl LedgerManager {
    /// Open the configured provider, connecting and migrating if SQL-backed.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "sqlite" => {
                info!("Initializing SQLite ledger store");
                let db = DatabasePool::connect(config).await?;
                run_migrations(db.pool()).await?;
                Ok(Self {
                    inner: Arc::new(SqlLedgerStore::new(db.clone())),
                    db: Some(db),
                })
            }
            "memory" => {
                info!("Initializing in-memory ledger store");
                Ok(Self::from_store(Arc::new(MemoryLedgerStore::new())))
            }
            other => Err(AppError::configuration(format!(
                "Unknown ledger provider: '{other}'. Supported: sqlite, memory"
            ))),
        }
    }

    /// Wrap an existing store (for testing).
    pub fn from_store(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            inner: store,
            db: None,
        }
    }

    /// Shared handle to the active store.
    pub fn store(&self) -> Arc<dyn LedgerStore> {
        Arc::clone(&self.inner)
    }

    /// Release the underlying connections, if any.
    pub async fn close(&self) {
        if let Some(db) = &self.db {
            db.close().await;
        }
    }
}
