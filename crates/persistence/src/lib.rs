//! Minerva Owl persistence layer.
//!
//! This crate provides a backend-agnostic repository for storing and querying
//! schemaless documents. Domain services describe what they want with
//! [`Filter`](types::Filter) values and typed entities; backends translate the
//! compiled filters into their own query language.
//!
//! # Backend Features
//!
//! - in-memory (always available) - reference implementation used in tests
//! - `mongodb` - MongoDB via the official driver
//!
//! # Architecture
//!
//! - [`types`] - Filters, documents, entities and pagination
//! - [`error`] - Error types for all operations
//! - [`core`] - The filter compiler and the storage traits
//! - [`backends`] - Backend implementations
//!
//! # Quick Start
//!
//! ```
//! use owl_persistence::backends::memory::MemoryBackend;
//! use owl_persistence::core::Repository;
//! use owl_persistence::types::{Filter, PaginationConfig, normalize};
//! use serde_json::{Value, json};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let store = MemoryBackend::new();
//! store.create("heroes", &json!({"name": "Tony", "role": "genius"})).await?;
//! store.create("heroes", &json!({"name": "Peter", "role": "student"})).await?;
//!
//! let window = normalize(None, None, &PaginationConfig::default());
//! let geniuses: Vec<Value> = store
//!     .list("heroes", window.skip, window.page_size, &[Filter::eq("role", "genius")])
//!     .await?;
//!
//! assert_eq!(geniuses.len(), 1);
//! assert_eq!(geniuses[0]["name"], "Tony");
//! # Ok::<(), owl_persistence::StorageError>(())
//! # }).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod types;

pub use error::{StorageError, StorageResult};
