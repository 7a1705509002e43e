//! Helpers for driving a store through the typed repository.

use std::time::Duration;

use async_trait::async_trait;

use owl_persistence::StorageResult;
use owl_persistence::core::{CompiledQuery, DocumentStore, Repository};
use owl_persistence::types::Document;

use super::fixtures::Hero;

/// Creates every hero in `collection`, returning the assigned ids in order.
pub async fn create_all<R>(repo: &R, collection: &str, heroes: &[Hero]) -> Vec<String>
where
    R: Repository + ?Sized,
{
    let mut ids = Vec::with_capacity(heroes.len());
    for hero in heroes {
        ids.push(repo.create(collection, hero).await.expect("create should succeed"));
    }
    ids
}

/// A store whose every operation hangs forever.
#[derive(Debug)]
pub struct StalledStore {
    pub timeout: Duration,
}

impl StalledStore {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl DocumentStore for StalledStore {
    fn backend_name(&self) -> &'static str {
        "stalled"
    }

    fn operation_timeout(&self) -> Duration {
        self.timeout
    }

    async fn list_documents(
        &self,
        _collection: &str,
        _skip: u64,
        _limit: u64,
        _query: &CompiledQuery,
    ) -> StorageResult<Vec<Document>> {
        std::future::pending().await
    }

    async fn get_document(&self, _collection: &str, _id: &str) -> StorageResult<Document> {
        std::future::pending().await
    }

    async fn find_one_document(
        &self,
        _collection: &str,
        _query: &CompiledQuery,
    ) -> StorageResult<Document> {
        std::future::pending().await
    }

    async fn insert_document(&self, _collection: &str, _document: Document) -> StorageResult<String> {
        std::future::pending().await
    }

    async fn update_document(
        &self,
        _collection: &str,
        _id: &str,
        _changes: Document,
    ) -> StorageResult<()> {
        std::future::pending().await
    }

    async fn delete_document(&self, _collection: &str, _id: &str) -> StorageResult<()> {
        std::future::pending().await
    }

    async fn count_documents(&self, _collection: &str, _query: &CompiledQuery) -> StorageResult<u64> {
        std::future::pending().await
    }
}
