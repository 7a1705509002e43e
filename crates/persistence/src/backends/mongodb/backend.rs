//! MongoDB backend implementation.

use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{Document as BsonDocument, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use parking_lot::RwLock;

use crate::core::{BackendConfig, BackendKind, CompiledQuery, DocumentStore};
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::{Document, MAX_SKIP};

use super::query::{from_bson_document, id_filter, id_to_string, to_bson_document, to_filter};

const BACKEND_NAME: &str = "mongodb";

/// MongoDB backend for document storage.
pub struct MongoBackend {
    client: Client,
    database: Database,
    /// Collection handles, created on first use.
    collections: RwLock<HashMap<String, Collection<BsonDocument>>>,
    config: BackendConfig,
}

impl Debug for MongoBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoBackend")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("database", &self.config.database)
            .field("cached_collections", &self.collections.read().len())
            .finish_non_exhaustive()
    }
}

fn connection_failed(err: mongodb::error::Error) -> StorageError {
    StorageError::Backend(BackendError::ConnectionFailed {
        backend_name: BACKEND_NAME.to_string(),
        message: err.to_string(),
    })
}

impl MongoBackend {
    /// Connects to the server described by `config` and verifies it answers.
    ///
    /// # Errors
    ///
    /// * `BackendError::ConnectionFailed` when the connection string is
    ///   invalid or the server does not answer a ping.
    pub async fn connect(config: &BackendConfig) -> StorageResult<Self> {
        let mut options = ClientOptions::parse(config.connection_string())
            .await
            .map_err(connection_failed)?;
        options.app_name = Some("owl".to_string());
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);
        options.max_pool_size = Some(config.pool_size);

        let client = Client::with_options(options).map_err(connection_failed)?;
        let database = client.database(&config.database);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connection_failed)?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connected to MongoDB"
        );

        Ok(Self {
            client,
            database,
            collections: RwLock::new(HashMap::new()),
            config: config.clone(),
        })
    }

    /// Returns the backend kind.
    pub fn kind(&self) -> BackendKind {
        BackendKind::MongoDB
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Returns the underlying driver client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Drops `collection` and forgets its cached handle.
    pub async fn drop_collection(&self, collection: &str) -> StorageResult<()> {
        self.collection(collection).drop().await?;
        self.collections.write().remove(collection);
        Ok(())
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        if let Some(handle) = self.collections.read().get(name) {
            tracing::trace!(collection = name, "Reusing collection handle");
            return handle.clone();
        }

        self.collections
            .write()
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(collection = name, "Opening collection handle");
                self.database.collection(name)
            })
            .clone()
    }
}

#[async_trait]
impl DocumentStore for MongoBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn operation_timeout(&self) -> Duration {
        self.config.operation_timeout
    }

    async fn list_documents(
        &self,
        collection: &str,
        skip: u64,
        limit: u64,
        query: &CompiledQuery,
    ) -> StorageResult<Vec<Document>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let filter = to_filter(query)?;
        tracing::debug!(collection, skip, limit, filter = %filter, "Listing documents");

        let mut cursor = self
            .collection(collection)
            .find(filter)
            .skip(skip.min(MAX_SKIP))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await?;

        let mut results = Vec::new();
        while cursor.advance().await? {
            results.push(from_bson_document(cursor.deserialize_current()?));
        }
        Ok(results)
    }

    async fn get_document(&self, collection: &str, id: &str) -> StorageResult<Document> {
        tracing::debug!(collection, id, "Finding document by id");

        let Some(filter) = id_filter(id) else {
            return Err(StorageError::not_found(collection, id));
        };

        self.collection(collection)
            .find_one(filter)
            .await?
            .map(from_bson_document)
            .ok_or_else(|| StorageError::not_found(collection, id))
    }

    async fn find_one_document(
        &self,
        collection: &str,
        query: &CompiledQuery,
    ) -> StorageResult<Document> {
        let filter = to_filter(query)?;
        tracing::debug!(collection, filter = %filter, "Finding document with filters");

        self.collection(collection)
            .find_one(filter)
            .await?
            .map(from_bson_document)
            .ok_or_else(|| StorageError::no_match(collection))
    }

    async fn insert_document(&self, collection: &str, document: Document) -> StorageResult<String> {
        let document = to_bson_document(document)?;
        let result = self.collection(collection).insert_one(document).await?;
        let id = id_to_string(result.inserted_id);

        tracing::debug!(collection, id = %id, "Inserted document");
        Ok(id)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> StorageResult<()> {
        let Some(filter) = id_filter(id) else {
            return Err(StorageError::not_found(collection, id));
        };
        let changes = to_bson_document(changes)?;

        let matched = if changes.is_empty() {
            self.collection(collection)
                .count_documents(filter)
                .await?
        } else {
            self.collection(collection)
                .update_one(filter, doc! { "$set": changes })
                .await?
                .matched_count
        };

        tracing::debug!(collection, id, matched, "Updated document");
        if matched == 0 {
            return Err(StorageError::not_found(collection, id));
        }
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> StorageResult<()> {
        let Some(filter) = id_filter(id) else {
            tracing::debug!(collection, id, "Skipping delete of malformed id");
            return Ok(());
        };

        let result = self.collection(collection).delete_one(filter).await?;
        tracing::debug!(collection, id, deleted = result.deleted_count, "Deleted document");
        Ok(())
    }

    async fn count_documents(&self, collection: &str, query: &CompiledQuery) -> StorageResult<u64> {
        let filter = to_filter(query)?;
        Ok(self.collection(collection).count_documents(filter).await?)
    }
}
