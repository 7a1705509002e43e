//! # Owl
//!
//! Organization and user management for the Minerva platform.
//!
//! Owl keeps organizations and users in a document store through the generic
//! repository from `owl-persistence`. The store is picked at startup: an
//! in-memory backend for development and tests, or MongoDB when built with
//! the `mongodb` feature.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use owl::{AppState, OwlConfig};
//! use owl::domain::NewUser;
//! use owl_persistence::backends::memory::MemoryBackend;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), owl::ServiceError> {
//! let state = AppState::new(Arc::new(MemoryBackend::new()), OwlConfig::for_testing())?;
//!
//! let user = state
//!     .users()
//!     .create(NewUser {
//!         username: "tony".to_string(),
//!         role: "genius".to_string(),
//!         token_id: "oauth-token".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let geniuses = state.users().list_by_role("genius", None, None).await?;
//! assert_eq!(geniuses, vec![user]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Command line and environment configuration
//! - [`crypto`] - Token encryption
//! - [`domain`] - Organization and user models
//! - [`service`] - Domain services
//! - [`state`] - Service wiring

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod crypto;
pub mod domain;
pub mod service;
pub mod state;

pub use config::OwlConfig;
pub use crypto::{CryptoError, TokenCipher};
pub use service::{OrganizationService, ServiceError, ServiceResult, UserService};
pub use state::{AppState, connect_store};

/// Initializes logging with the given level.
///
/// `RUST_LOG` takes precedence when set.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("owl={},owl_persistence={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
