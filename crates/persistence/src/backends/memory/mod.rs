//! In-memory backend.
//!
//! A complete [`DocumentStore`](crate::core::DocumentStore) kept in process
//! memory. It evaluates compiled queries itself, so it behaves like the
//! MongoDB backend for every filter the domain services build, and it is the
//! default store for tests and local runs.
//!
//! # Example
//!
//! ```
//! use owl_persistence::backends::memory::MemoryBackend;
//! use serde_json::json;
//!
//! let backend = MemoryBackend::new();
//! backend.seed("heroes", [json!({"id": "1", "name": "Tony"}).as_object().cloned().unwrap()]);
//! assert_eq!(backend.len("heroes"), 1);
//! ```

mod backend;
mod matcher;

pub use backend::MemoryBackend;
pub use matcher::{Matcher, matches};
