//! In-memory document store.

use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::core::{BackendKind, CompiledQuery, DEFAULT_OPERATION_TIMEOUT, DocumentStore};
use crate::error::{StorageError, StorageResult};
use crate::types::{Document, ID_FIELD, document_id};

use super::matcher::Matcher;

/// Document store keeping every collection in process memory.
///
/// Collections are created on first insert. Documents keep insertion order,
/// which is the natural order of [`DocumentStore::list_documents`].
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    operation_timeout: Duration,
}

impl Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("collections", &self.collections.read().len())
            .field("operation_timeout", &self.operation_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Sets the per-operation deadline.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Returns the backend kind.
    pub fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    /// Appends raw documents to `collection` as they are, identity included.
    ///
    /// Useful for fixtures that need known ids.
    pub fn seed(&self, collection: &str, documents: impl IntoIterator<Item = Document>) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    /// Returns the number of documents stored in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Returns `true` when `collection` holds no documents.
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Drops every collection.
    pub fn clear(&self) {
        self.collections.write().clear();
    }

    fn filtered(
        &self,
        collection: &str,
        query: &CompiledQuery,
        skip: u64,
        limit: u64,
    ) -> StorageResult<Vec<Document>> {
        let matcher = Matcher::new(query)?;
        let guard = self.collections.read();
        let Some(documents) = guard.get(collection) else {
            return Ok(Vec::new());
        };

        let mut skipped = 0;
        let mut results = Vec::new();
        for document in documents {
            if u64::try_from(results.len()).unwrap_or(u64::MAX) >= limit {
                break;
            }
            if !matcher.matches(document)? {
                continue;
            }
            if skipped < skip {
                skipped += 1;
                continue;
            }
            results.push(document.clone());
        }
        Ok(results)
    }
}

#[async_trait]
impl DocumentStore for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    async fn list_documents(
        &self,
        collection: &str,
        skip: u64,
        limit: u64,
        query: &CompiledQuery,
    ) -> StorageResult<Vec<Document>> {
        let results = self.filtered(collection, query, skip, limit)?;
        tracing::debug!(collection, skip, limit, found = results.len(), "listed documents");
        Ok(results)
    }

    async fn get_document(&self, collection: &str, id: &str) -> StorageResult<Document> {
        tracing::debug!(collection, id, "getting document");
        self.collections
            .read()
            .get(collection)
            .and_then(|documents| documents.iter().find(|d| document_id(d) == Some(id)))
            .cloned()
            .ok_or_else(|| StorageError::not_found(collection, id))
    }

    async fn find_one_document(
        &self,
        collection: &str,
        query: &CompiledQuery,
    ) -> StorageResult<Document> {
        let mut found = self.filtered(collection, query, 0, 1)?;
        tracing::debug!(collection, found = found.len(), "find one document");
        found.pop().ok_or_else(|| StorageError::no_match(collection))
    }

    async fn insert_document(&self, collection: &str, document: Document) -> StorageResult<String> {
        let id = uuid::Uuid::new_v4().to_string();

        let mut stored = Document::new();
        stored.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        stored.extend(document.into_iter().filter(|(key, _)| key != ID_FIELD));

        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(stored);

        tracing::debug!(collection, id = %id, "inserted document");
        Ok(id)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        changes: Document,
    ) -> StorageResult<()> {
        let mut guard = self.collections.write();
        let stored = guard
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|d| document_id(d) == Some(id)))
            .ok_or_else(|| StorageError::not_found(collection, id))?;

        let fields = changes.len();
        for (key, value) in changes {
            if key != ID_FIELD {
                stored.insert(key, value);
            }
        }

        tracing::debug!(collection, id, fields, "updated document");
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> StorageResult<()> {
        let mut guard = self.collections.write();
        let removed = match guard.get_mut(collection) {
            Some(documents) => {
                let before = documents.len();
                documents.retain(|d| document_id(d) != Some(id));
                before - documents.len()
            }
            None => 0,
        };

        tracing::debug!(collection, id, removed, "deleted document");
        Ok(())
    }

    async fn count_documents(&self, collection: &str, query: &CompiledQuery) -> StorageResult<u64> {
        let matcher = Matcher::new(query)?;
        let guard = self.collections.read();
        let Some(documents) = guard.get(collection) else {
            return Ok(0);
        };

        let mut count = 0;
        for document in documents {
            if matcher.matches(document)? {
                count += 1;
            }
        }
        Ok(count)
    }
}
