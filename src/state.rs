use std::sync::Arc;

use crate::config::{AppConfig, StorageBackend};
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};
use crate::services::bootstrap;

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Open the configured store, apply the schema and seed built-in rows
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match config.database.storage {
            StorageBackend::Postgres => {
                let pool = DatabaseManager::connect(&config.database).await?;
                DatabaseManager::migrate(&pool).await?;
                Arc::new(PgStore::new(pool))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        bootstrap::seed(store.as_ref(), &config.security).await?;

        Ok(Self::new(store, config))
    }
}
