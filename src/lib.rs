//! doc-intake - Document intake and review for accounting firms
//!
//! Administrators manage accountants; accountants onboard clients and
//! review the documents those clients upload. Clients are removed only
//! through a delete request an administrator approves.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities, lifecycles and the capability check
//! - **services**: Application use cases, scoped to the acting principal
//! - **infra**: Database, migrations, Unit of Work and blob storage
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Seed an administrator
//! cargo run -- admin create --name Root --email root@firm.example --password 'SecurePass123!'
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Principal, Role};
pub use errors::{AppError, AppResult};
