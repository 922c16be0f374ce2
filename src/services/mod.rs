//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. Every operation takes the acting `Principal`
//! explicitly and consults the capability check before touching data.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod accountant_service;
mod auth_service;
mod cascade;
mod client_service;
pub mod container;
mod delete_request_service;
mod document_service;
mod justification_service;
mod visibility;

#[cfg(test)]
mod testing;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use accountant_service::{AccountantManager, AccountantService};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use client_service::{ClientManager, ClientService};
pub use delete_request_service::{DeleteRequestManager, DeleteRequestService};
pub use document_service::{DocumentManager, DocumentService};
pub use justification_service::{JustificationManager, JustificationService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
