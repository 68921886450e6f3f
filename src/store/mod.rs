//! Status store: the single persisted render flag.
//!
//! This module handles:
//! - The `StatusStore` trait every backend implements
//! - Memory, file and MongoDB backends
//! - Building the configured backend at startup

pub mod file;
pub mod memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use strum::{Display, EnumString};
use tracing::info;

use crate::config::Config;
use crate::error::StoreError;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Available persistence backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreBackend {
    /// Process memory; lost on restart.
    Memory,
    /// JSON file on local disk.
    #[default]
    File,
    /// MongoDB collection.
    Mongo,
}

/// Holds the one boolean flag of a deployment.
///
/// A store that has never been written reports `false`.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Read the current flag.
    async fn read(&self) -> Result<bool, StoreError>;

    /// Persist a new flag value.
    async fn write(&self, enabled: bool) -> Result<(), StoreError>;

    /// When the flag was last written, for backends that record it.
    async fn last_updated(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(None)
    }

    /// Which backend this is.
    fn backend(&self) -> StoreBackend;
}

/// Build the backend named in the configuration and probe it once.
///
/// Fails if the backend cannot be reached, so the server never starts
/// against a dead store.
pub async fn open_store(config: &Config) -> Result<Arc<dyn StatusStore>, StoreError> {
    let store: Arc<dyn StatusStore> = match config.store_backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new(config.initial_status)),
        StoreBackend::File => Arc::new(FileStore::new(&config.status_file)),
        StoreBackend::Mongo => {
            let uri = config.mongodb_uri.as_deref().ok_or_else(|| {
                StoreError::unavailable(StoreBackend::Mongo, "MONGODB_URI is not set")
            })?;
            Arc::new(
                MongoStore::connect(uri, &config.mongodb_database, &config.mongodb_collection)
                    .await?,
            )
        }
    };

    let enabled = store.read().await?;
    info!(backend = %store.backend(), enabled, "Status store ready");

    Ok(store)
}
