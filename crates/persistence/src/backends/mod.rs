//! Database backend implementations.
//!
//! This module contains implementations of [`DocumentStore`](crate::core::DocumentStore)
//! for the supported document stores. Networked backends are gated behind a
//! feature flag.
//!
//! # Available Backends
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | (always) | In-process store, great for tests and development |
//! | MongoDB | `mongodb` | Document store with native JSON support |
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "mongodb")]
//! use owl_persistence::backends::mongodb::MongoBackend;
//! # #[cfg(feature = "mongodb")]
//! use owl_persistence::core::BackendConfig;
//!
//! # #[cfg(feature = "mongodb")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackendConfig::new("localhost", 27017).with_database("minerva");
//! let backend = MongoBackend::connect(&config).await?;
//! # Ok(())
//! # }
//! ```

pub mod memory;

#[cfg(feature = "mongodb")]
pub mod mongodb;
