//! Repository layer - Data access abstraction
//!
//! Every store is generic over its [`Executor`], so the same query code runs
//! against the connection pool and inside a Unit of Work transaction.

mod accountant_repository;
mod admin_repository;
mod client_repository;
mod delete_request_repository;
mod document_repository;
pub(crate) mod entities;
mod justification_repository;

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction};

pub use accountant_repository::{AccountantRepository, AccountantStore};
pub use admin_repository::{AdminRepository, AdminStore};
pub use client_repository::{ClientRepository, ClientStore};
pub use delete_request_repository::{DeleteRequestRepository, DeleteRequestStore};
pub use document_repository::{DocumentRepository, DocumentScope, DocumentStore};
pub use justification_repository::{JustificationRepository, JustificationStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use accountant_repository::MockAccountantRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use admin_repository::MockAdminRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use client_repository::MockClientRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use delete_request_repository::MockDeleteRequestRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use document_repository::MockDocumentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use justification_repository::MockJustificationRepository;

/// Something queries can run on: the pool or a borrowed transaction.
pub trait Executor: Send + Sync {
    type Conn: ConnectionTrait + Send + Sync;

    fn conn(&self) -> &Self::Conn;
}

impl Executor for DatabaseConnection {
    type Conn = DatabaseConnection;

    fn conn(&self) -> &Self::Conn {
        self
    }
}

impl<'a> Executor for &'a DatabaseTransaction {
    type Conn = DatabaseTransaction;

    fn conn(&self) -> &Self::Conn {
        self
    }
}
