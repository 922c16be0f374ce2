//! Service Container - Centralized service access.
//!
//! Handlers depend on the `ServiceContainer` trait; `Services` wires the
//! concrete managers over one shared Unit of Work and blob store.

use std::sync::Arc;

use super::{
    AccountantManager, AccountantService, AuthService, Authenticator, ClientManager, ClientService,
    DeleteRequestManager, DeleteRequestService, DocumentManager, DocumentService,
    JustificationManager, JustificationService,
};
use crate::config::Config;
use crate::infra::{BlobStore, LocalBlobStore, Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn accountants(&self) -> Arc<dyn AccountantService>;

    fn clients(&self) -> Arc<dyn ClientService>;

    fn documents(&self) -> Arc<dyn DocumentService>;

    fn justifications(&self) -> Arc<dyn JustificationService>;

    fn delete_requests(&self) -> Arc<dyn DeleteRequestService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    accountant_service: Arc<dyn AccountantService>,
    client_service: Arc<dyn ClientService>,
    document_service: Arc<dyn DocumentService>,
    justification_service: Arc<dyn JustificationService>,
    delete_request_service: Arc<dyn DeleteRequestService>,
}

impl Services {
    /// Wire every service over the given Unit of Work and blob store
    pub fn new<U: UnitOfWork + 'static>(
        uow: Arc<U>,
        blobs: Arc<dyn BlobStore>,
        config: Config,
    ) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            accountant_service: Arc::new(AccountantManager::new(uow.clone())),
            client_service: Arc::new(ClientManager::new(uow.clone(), blobs.clone())),
            document_service: Arc::new(DocumentManager::new(uow.clone(), blobs.clone())),
            justification_service: Arc::new(JustificationManager::new(uow.clone(), blobs.clone())),
            delete_request_service: Arc::new(DeleteRequestManager::new(uow, blobs)),
        }
    }

    /// Create service container from database connection and config,
    /// storing uploads on the local filesystem.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::from_config(&config));
        Self::new(uow, blobs, config)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn accountants(&self) -> Arc<dyn AccountantService> {
        self.accountant_service.clone()
    }

    fn clients(&self) -> Arc<dyn ClientService> {
        self.client_service.clone()
    }

    fn documents(&self) -> Arc<dyn DocumentService> {
        self.document_service.clone()
    }

    fn justifications(&self) -> Arc<dyn JustificationService> {
        self.justification_service.clone()
    }

    fn delete_requests(&self) -> Arc<dyn DeleteRequestService> {
        self.delete_request_service.clone()
    }
}
