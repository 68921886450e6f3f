//! MongoDB backend.
//!
//! The flag lives in a single document with a fixed `_id`, so the
//! collection can never hold two divergent values.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::{
    bson::{self, doc},
    options::UpdateOptions,
    Client as MongoClient, Collection,
};
use serde::Deserialize;
use tracing::{debug, error, info};

use super::{StatusStore, StoreBackend};
use crate::error::StoreError;

/// `_id` of the one status document.
pub const STATUS_DOCUMENT_ID: &str = "app-status";

/// Stored document shape.
#[derive(Debug, Deserialize)]
struct StatusDocument {
    #[serde(default)]
    enabled: bool,
    #[serde(rename = "updatedAt", default)]
    updated_at: Option<bson::DateTime>,
}

/// Flag persisted in a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoStore {
    collection: Collection<StatusDocument>,
}

impl MongoStore {
    /// Connect and ping the server. Fails if the server is unreachable.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, StoreError> {
        info!(database = %database, collection = %collection, "Connecting to MongoDB");

        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            error!("Failed to parse MongoDB connection string: {}", e);
            StoreError::from(e)
        })?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                error!("MongoDB ping failed: {}", e);
                StoreError::from(e)
            })?;

        info!("Connected to MongoDB");

        let collection = client.database(database).collection(collection);
        Ok(Self { collection })
    }

    async fn find(&self) -> Result<Option<StatusDocument>, StoreError> {
        let found = self
            .collection
            .find_one(doc! { "_id": STATUS_DOCUMENT_ID }, None)
            .await?;
        Ok(found)
    }
}

#[async_trait]
impl StatusStore for MongoStore {
    async fn read(&self) -> Result<bool, StoreError> {
        Ok(self.find().await?.map(|d| d.enabled).unwrap_or(false))
    }

    async fn write(&self, enabled: bool) -> Result<(), StoreError> {
        let options = UpdateOptions::builder().upsert(true).build();
        self.collection
            .update_one(
                doc! { "_id": STATUS_DOCUMENT_ID },
                doc! { "$set": { "enabled": enabled, "updatedAt": bson::DateTime::now() } },
                options,
            )
            .await?;

        debug!(enabled, "Status document upserted");
        Ok(())
    }

    async fn last_updated(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self
            .find()
            .await?
            .and_then(|d| d.updated_at)
            .map(|ts| ts.to_chrono()))
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Mongo
    }
}
