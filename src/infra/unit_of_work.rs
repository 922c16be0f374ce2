//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and runs multi-entity workflows
//! (cascading deletes, delete-request approval, justification replace)
//! inside a single database transaction.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::{
    AccountantRepository, AccountantStore, AdminRepository, AdminStore, ClientRepository,
    ClientStore, DeleteRequestRepository, DeleteRequestStore, DocumentRepository, DocumentStore,
    JustificationRepository, JustificationStore,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, wrap mock repositories in a test implementation or use
/// integration tests against SQLite.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn admins(&self) -> Arc<dyn AdminRepository>;

    fn accountants(&self) -> Arc<dyn AccountantRepository>;

    fn clients(&self) -> Arc<dyn ClientRepository>;

    fn documents(&self) -> Arc<dyn DocumentRepository>;

    fn justifications(&self) -> Arc<dyn JustificationRepository>;

    fn delete_requests(&self) -> Arc<dyn DeleteRequestRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    /// Uses ReadCommitted isolation.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;

    /// Execute a closure within a serializable transaction.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// Every store handed out borrows the same transaction. Never touch the
/// pooled repositories while a context is alive: on single-connection
/// pools (SQLite) that waits on the connection the transaction holds.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn admins(&self) -> AdminStore<&'a DatabaseTransaction> {
        AdminStore::new(self.txn)
    }

    pub fn accountants(&self) -> AccountantStore<&'a DatabaseTransaction> {
        AccountantStore::new(self.txn)
    }

    pub fn clients(&self) -> ClientStore<&'a DatabaseTransaction> {
        ClientStore::new(self.txn)
    }

    pub fn documents(&self) -> DocumentStore<&'a DatabaseTransaction> {
        DocumentStore::new(self.txn)
    }

    pub fn justifications(&self) -> JustificationStore<&'a DatabaseTransaction> {
        JustificationStore::new(self.txn)
    }

    pub fn delete_requests(&self) -> DeleteRequestStore<&'a DatabaseTransaction> {
        DeleteRequestStore::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    admin_repo: Arc<AdminStore<DatabaseConnection>>,
    accountant_repo: Arc<AccountantStore<DatabaseConnection>>,
    client_repo: Arc<ClientStore<DatabaseConnection>>,
    document_repo: Arc<DocumentStore<DatabaseConnection>>,
    justification_repo: Arc<JustificationStore<DatabaseConnection>>,
    delete_request_repo: Arc<DeleteRequestStore<DatabaseConnection>>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            admin_repo: Arc::new(AdminStore::new(db.clone())),
            accountant_repo: Arc::new(AccountantStore::new(db.clone())),
            client_repo: Arc::new(ClientStore::new(db.clone())),
            document_repo: Arc::new(DocumentStore::new(db.clone())),
            justification_repo: Arc::new(JustificationStore::new(db.clone())),
            delete_request_repo: Arc::new(DeleteRequestStore::new(db.clone())),
            db,
        }
    }

    /// Internal transaction execution with configurable isolation level
    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn admins(&self) -> Arc<dyn AdminRepository> {
        self.admin_repo.clone()
    }

    fn accountants(&self) -> Arc<dyn AccountantRepository> {
        self.accountant_repo.clone()
    }

    fn clients(&self) -> Arc<dyn ClientRepository> {
        self.client_repo.clone()
    }

    fn documents(&self) -> Arc<dyn DocumentRepository> {
        self.document_repo.clone()
    }

    fn justifications(&self) -> Arc<dyn JustificationRepository> {
        self.justification_repo.clone()
    }

    fn delete_requests(&self) -> Arc<dyn DeleteRequestRepository> {
        self.delete_request_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}
