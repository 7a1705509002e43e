//! Domain services.
//!
//! Services own the business rules around the generic repository: page
//! normalization, duplicate checks, token encryption and timestamps. They
//! hold a shared `Arc<dyn DocumentStore>` so every service in a process
//! talks to the same backend.

mod organization;
mod user;

pub use organization::OrganizationService;
pub use user::UserService;

use owl_persistence::StorageError;
use thiserror::Error;

use crate::crypto::CryptoError;

/// Errors returned by domain services.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The underlying store failed or the item does not exist.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A user with this username is already registered.
    #[error("duplicated username: {username}")]
    DuplicateUsername {
        /// The rejected username.
        username: String,
    },

    /// A token could not be encrypted.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl ServiceError {
    /// Returns `true` when the error is a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Storage(err) if err.is_not_found())
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
