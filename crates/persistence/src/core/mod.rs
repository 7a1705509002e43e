//! Core storage traits and abstractions.
//!
//! - [`DocumentStore`] - Backend driver abstraction over schemaless documents
//! - [`Repository`] - Typed CRUD used by domain services
//! - [`compile`] - Filter compiler producing a [`CompiledQuery`]
//! - [`BackendConfig`] - Connection settings for networked backends
//!
//! # Layering
//!
//! ```text
//! domain service
//!     └── Repository            (typed entities, Filter, timeouts)
//!             └── DocumentStore (Document, CompiledQuery)
//!                     ├── MemoryBackend
//!                     └── MongoBackend
//! ```

pub mod backend;
pub mod compiler;
pub mod repository;

pub use backend::{BackendConfig, BackendKind, DEFAULT_OPERATION_TIMEOUT};
pub use compiler::{Clause, ClauseValue, CompiledQuery, compile, compile_clause};
pub use repository::{DocumentStore, Repository};
