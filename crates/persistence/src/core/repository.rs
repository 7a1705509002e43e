//! The generic repository port.
//!
//! Two traits split the work:
//!
//! - [`DocumentStore`] is what a backend implements. It is object-safe and
//!   speaks only [`Document`]s and [`CompiledQuery`]s.
//! - [`Repository`] is what domain services call. It is generic over the
//!   entity type and is implemented for every `DocumentStore`, including
//!   `dyn DocumentStore`. It compiles filters, maps entities to and from
//!   documents, strips omitted fields on update and bounds every call with the
//!   store's operation timeout.
//!
//! # Example
//!
//! ```
//! use owl_persistence::backends::memory::MemoryBackend;
//! use owl_persistence::core::Repository;
//! use owl_persistence::types::Filter;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Hero {
//!     id: String,
//!     name: String,
//!     role: String,
//! }
//!
//! # tokio_test(async {
//! let repo = MemoryBackend::new();
//! let id = repo
//!     .create("heroes", &Hero { name: "Tony".into(), role: "genius".into(), ..Default::default() })
//!     .await?;
//!
//! let found: Hero = repo.get_one("heroes", &[Filter::eq("role", "genius")]).await?;
//! assert_eq!(found.id, id);
//! # Ok::<(), owl_persistence::StorageError>(())
//! # });
//! # fn tokio_test<F: std::future::Future<Output = Result<(), owl_persistence::StorageError>>>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(f).unwrap();
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::backend::DEFAULT_OPERATION_TIMEOUT;
use crate::core::compiler::{CompiledQuery, compile};
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::{Document, Entity, Filter, from_document, to_document, update_fields};

/// Storage driver for schemaless documents.
///
/// Implementations must treat the `id` field as the identity of every
/// document and must never block past their own I/O; the deadline is applied
/// by [`Repository`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Deadline applied to each call made through [`Repository`].
    fn operation_timeout(&self) -> Duration {
        DEFAULT_OPERATION_TIMEOUT
    }

    /// Returns at most `limit` documents matching `query`, skipping the first
    /// `skip` matches. Skipping past the end yields an empty list.
    async fn list_documents(
        &self,
        collection: &str,
        skip: u64,
        limit: u64,
        query: &CompiledQuery,
    ) -> StorageResult<Vec<Document>>;

    /// Returns the document whose identity is `id`.
    ///
    /// # Errors
    ///
    /// * `ResourceError::NotFound` with the id when no document matches.
    async fn get_document(&self, collection: &str, id: &str) -> StorageResult<Document>;

    /// Returns the first document matching `query`.
    ///
    /// # Errors
    ///
    /// * `ResourceError::NotFound` without an id when nothing matches.
    async fn find_one_document(
        &self,
        collection: &str,
        query: &CompiledQuery,
    ) -> StorageResult<Document>;

    /// Stores `document` under a newly assigned identity and returns it.
    ///
    /// Any identity already present in `document` is discarded.
    async fn insert_document(&self, collection: &str, document: Document) -> StorageResult<String>;

    /// Merges `changes` into the stored document field by field.
    ///
    /// `changes` never contains the identity field.
    ///
    /// # Errors
    ///
    /// * `ResourceError::NotFound` when `id` does not exist.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> StorageResult<()>;

    /// Removes the document with identity `id`. Missing ids are not an error.
    async fn delete_document(&self, collection: &str, id: &str) -> StorageResult<()>;

    /// Counts documents matching `query`.
    async fn count_documents(&self, collection: &str, query: &CompiledQuery) -> StorageResult<u64>;
}

/// Collection-parameterized CRUD over typed entities.
///
/// Blanket-implemented for every [`DocumentStore`]; domain services depend on
/// this trait only and never build backend queries themselves.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Lists up to `limit` entities after skipping `skip`, ANDing `filters`.
    async fn list<T: Entity>(
        &self,
        collection: &str,
        skip: u64,
        limit: u64,
        filters: &[Filter],
    ) -> StorageResult<Vec<T>>;

    /// Fetches the entity with identity `id`.
    async fn get<T: Entity>(&self, collection: &str, id: &str) -> StorageResult<T>;

    /// Fetches the first entity matching all `filters`.
    async fn get_one<T: Entity>(&self, collection: &str, filters: &[Filter]) -> StorageResult<T>;

    /// Persists `entity` and returns its newly assigned identity.
    async fn create<T: Entity>(&self, collection: &str, entity: &T) -> StorageResult<String>;

    /// Overwrites the stored fields of `id` with those of `entity`, except the
    /// identity field and every field named in `omit`.
    async fn update<T: Entity>(
        &self,
        collection: &str,
        id: &str,
        entity: &T,
        omit: &[&str],
    ) -> StorageResult<()>;

    /// Removes the entity with identity `id`; idempotent.
    async fn delete(&self, collection: &str, id: &str) -> StorageResult<()>;

    /// Counts the entities matching all `filters`.
    async fn count(&self, collection: &str, filters: &[Filter]) -> StorageResult<u64>;
}

#[async_trait]
impl<S> Repository for S
where
    S: DocumentStore + ?Sized,
{
    async fn list<T: Entity>(
        &self,
        collection: &str,
        skip: u64,
        limit: u64,
        filters: &[Filter],
    ) -> StorageResult<Vec<T>> {
        let query = compile(filters)?;
        let documents =
            with_deadline(self, self.list_documents(collection, skip, limit, &query)).await?;
        documents.into_iter().map(from_document).collect()
    }

    async fn get<T: Entity>(&self, collection: &str, id: &str) -> StorageResult<T> {
        let document = with_deadline(self, self.get_document(collection, id)).await?;
        from_document(document)
    }

    async fn get_one<T: Entity>(&self, collection: &str, filters: &[Filter]) -> StorageResult<T> {
        let query = compile(filters)?;
        let document = with_deadline(self, self.find_one_document(collection, &query)).await?;
        from_document(document)
    }

    async fn create<T: Entity>(&self, collection: &str, entity: &T) -> StorageResult<String> {
        let document = to_document(entity)?;
        with_deadline(self, self.insert_document(collection, document)).await
    }

    async fn update<T: Entity>(
        &self,
        collection: &str,
        id: &str,
        entity: &T,
        omit: &[&str],
    ) -> StorageResult<()> {
        let changes = update_fields(to_document(entity)?, omit);
        with_deadline(self, self.update_document(collection, id, changes)).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StorageResult<()> {
        with_deadline(self, self.delete_document(collection, id)).await
    }

    async fn count(&self, collection: &str, filters: &[Filter]) -> StorageResult<u64> {
        let query = compile(filters)?;
        with_deadline(self, self.count_documents(collection, &query)).await
    }
}

/// Runs `operation`, failing with [`BackendError::Timeout`] if it outlives the
/// store's operation timeout.
async fn with_deadline<S, F, T>(store: &S, operation: F) -> StorageResult<T>
where
    S: DocumentStore + ?Sized,
    F: Future<Output = StorageResult<T>>,
{
    let timeout = store.operation_timeout();
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Backend(BackendError::Timeout {
            backend_name: store.backend_name().to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })),
    }
}
