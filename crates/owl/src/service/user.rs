use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use owl_persistence::core::{DocumentStore, Repository};
use owl_persistence::types::{Filter, PaginationConfig, normalize};
use tracing::{debug, info, warn};

use crate::crypto::TokenCipher;
use crate::domain::{NewUser, STATUS_DELETED, USER_COLLECTION, User};

use super::{ServiceError, ServiceResult};

/// Fields a user update must never overwrite.
const IMMUTABLE_FIELDS: &[&str] = &["createDate"];

/// Manages platform users.
///
/// Provider tokens are encrypted before they are stored; the service never
/// writes a plaintext token.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn DocumentStore>,
    pagination: PaginationConfig,
    cipher: TokenCipher,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("backend", &self.store.backend_name())
            .field("pagination", &self.pagination)
            .field("cipher", &self.cipher)
            .finish()
    }
}

/// Current time truncated to whole seconds.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

impl UserService {
    /// Creates a service over `store`.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        pagination: PaginationConfig,
        cipher: TokenCipher,
    ) -> Self {
        Self {
            store,
            pagination,
            cipher,
        }
    }

    /// Lists one page of users.
    pub async fn list(&self, page: Option<i64>, page_size: Option<i64>) -> ServiceResult<Vec<User>> {
        self.list_filtered(&[], page, page_size).await
    }

    /// Lists one page of users holding `role`.
    pub async fn list_by_role(
        &self,
        role: &str,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> ServiceResult<Vec<User>> {
        self.list_filtered(&[Filter::eq("role", role)], page, page_size)
            .await
    }

    async fn list_filtered(
        &self,
        filters: &[Filter],
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> ServiceResult<Vec<User>> {
        let window = normalize(page, page_size, &self.pagination);
        debug!(page = window.page_index, page_size = window.page_size, "Listing users");

        Ok(self
            .store
            .list(USER_COLLECTION, window.skip, window.page_size, filters)
            .await?)
    }

    /// Fetches a user by id.
    pub async fn get(&self, id: &str) -> ServiceResult<User> {
        Ok(self.store.get(USER_COLLECTION, id).await?)
    }

    /// Fetches a user by username.
    pub async fn get_by_username(&self, username: &str) -> ServiceResult<User> {
        Ok(self
            .store
            .get_one(USER_COLLECTION, &[Filter::eq("username", username)])
            .await?)
    }

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// * `ServiceError::DuplicateUsername` when the username is taken.
    /// * `ServiceError::Storage` when the lookup or insert fails.
    pub async fn create(&self, new_user: NewUser) -> ServiceResult<User> {
        match self.get_by_username(&new_user.username).await {
            Ok(_) => {
                warn!(username = %new_user.username, "Rejected duplicated username");
                return Err(ServiceError::DuplicateUsername {
                    username: new_user.username,
                });
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        let stamp = now();
        let mut user = User {
            id: String::new(),
            username: new_user.username,
            name: new_user.name,
            picture: new_user.picture,
            role: new_user.role,
            provider: new_user.provider,
            token_id: self.seal(&new_user.token_id)?,
            create_date: Some(stamp),
            update_date: Some(stamp),
            status: new_user.status,
        };

        user.id = self.store.create(USER_COLLECTION, &user).await?;
        info!(id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }

    /// Applies the non-empty fields of `user` to the stored user.
    ///
    /// The token is re-encrypted only when it differs from the stored one,
    /// and `createDate` is never overwritten.
    pub async fn update(&self, mut user: User) -> ServiceResult<User> {
        user.update_date = Some(now());

        let current = self.get(&user.id).await?;
        if !user.token_id.is_empty() && user.token_id != current.token_id {
            debug!(id = %user.id, "Token changed, re-encrypting");
            user.token_id = self.cipher.encrypt(&user.token_id)?;
        }

        self.store
            .update(USER_COLLECTION, &user.id, &user, IMMUTABLE_FIELDS)
            .await?;
        info!(id = %user.id, "Updated user");
        Ok(user)
    }

    /// Deletes a user.
    ///
    /// A hard delete removes the record; a soft delete marks it
    /// [`STATUS_DELETED`] and keeps it.
    pub async fn delete(&self, id: &str, hard: bool) -> ServiceResult<()> {
        if hard {
            self.store.delete(USER_COLLECTION, id).await?;
            info!(id, "Deleted user");
            return Ok(());
        }

        let tombstone = User {
            status: STATUS_DELETED.to_string(),
            update_date: Some(now()),
            ..Default::default()
        };
        self.store
            .update(USER_COLLECTION, id, &tombstone, IMMUTABLE_FIELDS)
            .await?;
        info!(id, "Marked user deleted");
        Ok(())
    }

    fn seal(&self, token: &str) -> ServiceResult<String> {
        if token.is_empty() {
            return Ok(String::new());
        }
        Ok(self.cipher.encrypt(token)?)
    }
}
