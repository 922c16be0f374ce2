//! Unit of Work over mock repositories for service unit tests.
//!
//! Transactions need a live connection; workflows that open one are
//! covered by the SQLite integration tests instead.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{
    AccountantRepository, AdminRepository, ClientRepository, DeleteRequestRepository,
    DocumentRepository, JustificationRepository, MockAccountantRepository, MockAdminRepository,
    MockClientRepository, MockDeleteRequestRepository, MockDocumentRepository,
    MockJustificationRepository,
};
use crate::infra::{TransactionContext, UnitOfWork};

pub(crate) struct TestUnitOfWork {
    pub admins: Arc<MockAdminRepository>,
    pub accountants: Arc<MockAccountantRepository>,
    pub clients: Arc<MockClientRepository>,
    pub documents: Arc<MockDocumentRepository>,
    pub justifications: Arc<MockJustificationRepository>,
    pub delete_requests: Arc<MockDeleteRequestRepository>,
}

impl Default for TestUnitOfWork {
    fn default() -> Self {
        Self {
            admins: Arc::new(MockAdminRepository::new()),
            accountants: Arc::new(MockAccountantRepository::new()),
            clients: Arc::new(MockClientRepository::new()),
            documents: Arc::new(MockDocumentRepository::new()),
            justifications: Arc::new(MockJustificationRepository::new()),
            delete_requests: Arc::new(MockDeleteRequestRepository::new()),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn admins(&self) -> Arc<dyn AdminRepository> {
        self.admins.clone()
    }

    fn accountants(&self) -> Arc<dyn AccountantRepository> {
        self.accountants.clone()
    }

    fn clients(&self) -> Arc<dyn ClientRepository> {
        self.clients.clone()
    }

    fn documents(&self) -> Arc<dyn DocumentRepository> {
        self.documents.clone()
    }

    fn justifications(&self) -> Arc<dyn JustificationRepository> {
        self.justifications.clone()
    }

    fn delete_requests(&self) -> Arc<dyn DeleteRequestRepository> {
        self.delete_requests.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}
