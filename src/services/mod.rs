//! Business logic services

pub mod accounts;
pub mod auth;
pub mod catalog;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub accounts: accounts::AccountsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        let auth = auth::AuthService::new(repository.clone(), auth_config);
        Self {
            accounts: accounts::AccountsService::new(repository.clone(), auth.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            auth,
            repository,
        }
    }

    /// True once the backing store answers queries
    pub async fn store_ready(&self) -> bool {
        self.repository.ping().await.is_ok()
    }
}
