//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Unit of Work for transaction management
//! - Blob storage for uploaded files

pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    AccountantRepository, AdminRepository, ClientRepository, DeleteRequestRepository,
    DocumentRepository, DocumentScope, JustificationRepository,
};
pub use storage::{BlobStore, LocalBlobStore, UploadedFile};
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockBlobStore;
