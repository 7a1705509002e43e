//! Shared helpers for service tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use owl::{AppState, OwlConfig, TokenCipher};
use owl_persistence::backends::memory::MemoryBackend;
use owl_persistence::core::{CompiledQuery, DocumentStore};
use owl_persistence::error::{BackendError, StorageError};
use owl_persistence::types::Document;
use owl_persistence::StorageResult;

/// Builds an `AppState` over a fresh in-memory store and returns both.
pub fn memory_state() -> (AppState, Arc<MemoryBackend>) {
    memory_state_with(OwlConfig::for_testing())
}

/// Like [`memory_state`] with a custom configuration.
pub fn memory_state_with(config: OwlConfig) -> (AppState, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let state = AppState::new(backend.clone(), config).expect("valid test config");
    (state, backend)
}

/// The cipher matching `OwlConfig::for_testing()`.
pub fn test_cipher() -> TokenCipher {
    let key = OwlConfig::for_testing().auth_key.expect("test key");
    TokenCipher::from_hex_key(&key).expect("valid test key")
}

/// A store whose every operation fails with an internal backend error.
#[derive(Debug, Default)]
pub struct BrokenStore;

fn broken() -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "broken".to_string(),
        message: "disk on fire".to_string(),
        source: None,
    })
}

#[async_trait]
impl DocumentStore for BrokenStore {
    fn backend_name(&self) -> &'static str {
        "broken"
    }

    fn operation_timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    async fn list_documents(
        &self,
        _collection: &str,
        _skip: u64,
        _limit: u64,
        _query: &CompiledQuery,
    ) -> StorageResult<Vec<Document>> {
        Err(broken())
    }

    async fn get_document(&self, _collection: &str, _id: &str) -> StorageResult<Document> {
        Err(broken())
    }

    async fn find_one_document(
        &self,
        _collection: &str,
        _query: &CompiledQuery,
    ) -> StorageResult<Document> {
        Err(broken())
    }

    async fn insert_document(&self, _collection: &str, _document: Document) -> StorageResult<String> {
        Err(broken())
    }

    async fn update_document(
        &self,
        _collection: &str,
        _id: &str,
        _changes: Document,
    ) -> StorageResult<()> {
        Err(broken())
    }

    async fn delete_document(&self, _collection: &str, _id: &str) -> StorageResult<()> {
        Err(broken())
    }

    async fn count_documents(&self, _collection: &str, _query: &CompiledQuery) -> StorageResult<u64> {
        Err(broken())
    }
}

/// Builds an `AppState` over [`BrokenStore`].
pub fn broken_state() -> AppState {
    AppState::new(Arc::new(BrokenStore), OwlConfig::for_testing()).expect("valid test config")
}
