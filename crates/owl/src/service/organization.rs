use std::sync::Arc;

use owl_persistence::core::{DocumentStore, Repository};
use owl_persistence::types::{PaginationConfig, normalize};
use tracing::{debug, info};

use crate::domain::{ORGANIZATION_COLLECTION, Organization};

use super::ServiceResult;

/// Manages organizations.
#[derive(Clone)]
pub struct OrganizationService {
    store: Arc<dyn DocumentStore>,
    pagination: PaginationConfig,
}

impl std::fmt::Debug for OrganizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrganizationService")
            .field("backend", &self.store.backend_name())
            .field("pagination", &self.pagination)
            .finish()
    }
}

impl OrganizationService {
    /// Creates a service over `store`.
    pub fn new(store: Arc<dyn DocumentStore>, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    /// Lists one page of organizations.
    pub async fn list(
        &self,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> ServiceResult<Vec<Organization>> {
        let window = normalize(page, page_size, &self.pagination);
        debug!(page = window.page_index, page_size = window.page_size, "Listing organizations");

        Ok(self
            .store
            .list(ORGANIZATION_COLLECTION, window.skip, window.page_size, &[])
            .await?)
    }

    /// Fetches an organization by id.
    pub async fn get(&self, id: &str) -> ServiceResult<Organization> {
        Ok(self.store.get(ORGANIZATION_COLLECTION, id).await?)
    }

    /// Creates an organization and returns it with its assigned id.
    pub async fn create(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        logo: impl Into<String>,
    ) -> ServiceResult<Organization> {
        let mut organization = Organization {
            id: String::new(),
            name: name.into(),
            description: description.into(),
            logo: logo.into(),
        };

        organization.id = self.store.create(ORGANIZATION_COLLECTION, &organization).await?;
        info!(id = %organization.id, name = %organization.name, "Created organization");
        Ok(organization)
    }

    /// Applies the non-empty fields of `organization` to the stored one.
    pub async fn update(&self, organization: Organization) -> ServiceResult<Organization> {
        self.store
            .update(ORGANIZATION_COLLECTION, &organization.id, &organization, &[])
            .await?;
        info!(id = %organization.id, "Updated organization");
        Ok(organization)
    }

    /// Removes an organization. Removing a missing one succeeds.
    ///
    /// `hard` matches [`UserService::delete`](super::UserService::delete).
    /// Organizations carry no status to mark, so a soft delete also removes
    /// the record.
    pub async fn delete(&self, id: &str, hard: bool) -> ServiceResult<()> {
        self.store.delete(ORGANIZATION_COLLECTION, id).await?;
        info!(id, hard, "Deleted organization");
        Ok(())
    }
}
