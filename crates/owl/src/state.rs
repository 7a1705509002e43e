//! Service wiring.
//!
//! [`AppState`] holds every domain service over one shared store. It is cheap
//! to clone and safe to hand to concurrent tasks.

use std::sync::Arc;

use owl_persistence::backends::memory::MemoryBackend;
use owl_persistence::core::{BackendKind, DocumentStore};
use tracing::info;

use crate::config::OwlConfig;
use crate::crypto::{CryptoError, TokenCipher};
use crate::service::{OrganizationService, ServiceError, UserService};

/// Shared application state.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use owl::{AppState, OwlConfig};
/// use owl_persistence::backends::memory::MemoryBackend;
/// use owl_persistence::core::DocumentStore;
///
/// let state = AppState::new(Arc::new(MemoryBackend::new()), OwlConfig::for_testing()).unwrap();
/// assert_eq!(state.store().backend_name(), "memory");
/// ```
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    config: Arc<OwlConfig>,
    organizations: Arc<OrganizationService>,
    users: Arc<UserService>,
}

// Everything is behind an Arc, so cloning never copies a service.
impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
            organizations: Arc::clone(&self.organizations),
            users: Arc::clone(&self.users),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.store.backend_name())
            .field("organizations", &self.organizations)
            .field("users", &self.users)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Builds the services over `store`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Crypto` when the configured auth key is missing
    /// or malformed.
    pub fn new(store: Arc<dyn DocumentStore>, config: OwlConfig) -> Result<Self, ServiceError> {
        let key = config
            .auth_key
            .as_deref()
            .ok_or_else(|| CryptoError::InvalidKey("no auth key configured".to_string()))?;
        let cipher = TokenCipher::from_hex_key(key)?;
        let pagination = config.pagination();

        let organizations = OrganizationService::new(Arc::clone(&store), pagination);
        let users = UserService::new(Arc::clone(&store), pagination, cipher);

        Ok(Self {
            store,
            config: Arc::new(config),
            organizations: Arc::new(organizations),
            users: Arc::new(users),
        })
    }

    /// Returns the shared store.
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &OwlConfig {
        &self.config
    }

    /// Returns the organization service.
    pub fn organizations(&self) -> &OrganizationService {
        &self.organizations
    }

    /// Returns the user service.
    pub fn users(&self) -> &UserService {
        &self.users
    }
}

/// Opens the store selected by `config.backend`.
///
/// # Errors
///
/// Fails when the database cannot be reached, or when MongoDB is selected in
/// a build without the `mongodb` feature.
pub async fn connect_store(config: &OwlConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.backend {
        BackendKind::Memory => {
            info!("Using in-memory store");
            Ok(Arc::new(
                MemoryBackend::new().with_operation_timeout(config.operation_timeout),
            ))
        }
        BackendKind::MongoDB => connect_mongodb(config).await,
    }
}

#[cfg(feature = "mongodb")]
async fn connect_mongodb(config: &OwlConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    use owl_persistence::backends::mongodb::MongoBackend;

    info!(host = %config.db_host, port = config.db_port, "Connecting to MongoDB");
    let backend = MongoBackend::connect(&config.backend_config()).await?;
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongodb(_config: &OwlConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    anyhow::bail!(
        "The mongodb backend requires the 'mongodb' feature. \
         Build with: cargo build -p owl --features mongodb"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_auth_key() {
        let config = OwlConfig {
            auth_key: None,
            ..OwlConfig::for_testing()
        };
        let err = AppState::new(Arc::new(MemoryBackend::new()), config).unwrap_err();
        assert!(matches!(err, ServiceError::Crypto(CryptoError::InvalidKey(_))));
    }

    #[test]
    fn test_clone_shares_services() {
        let state = AppState::new(Arc::new(MemoryBackend::new()), OwlConfig::for_testing()).unwrap();
        let clone = state.clone();
        assert!(std::ptr::eq(state.users(), clone.users()));
        assert!(std::ptr::eq(state.organizations(), clone.organizations()));
    }

    #[tokio::test]
    async fn test_connect_memory_store() {
        let store = connect_store(&OwlConfig::for_testing()).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
        assert_eq!(store.operation_timeout(), std::time::Duration::from_secs(2));
    }

    #[cfg(not(feature = "mongodb"))]
    #[tokio::test]
    async fn test_connect_mongodb_without_feature_fails() {
        let config = OwlConfig {
            backend: BackendKind::MongoDB,
            ..OwlConfig::for_testing()
        };
        match connect_store(&config).await {
            Ok(store) => panic!("expected an error, got {} store", store.backend_name()),
            Err(err) => assert!(err.to_string().contains("--features mongodb")),
        }
    }
}
