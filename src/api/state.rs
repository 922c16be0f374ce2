//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// All application services
    pub services: Arc<dyn ServiceContainer>,
    /// Database handle, used by the health check
    pub database: Arc<Database>,
    /// Runtime configuration; the router serves uploads from its directory
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            config.clone(),
        ));

        Self::new(services, database, config)
    }

    /// Create application state with manually injected services.
    pub fn new(services: Arc<dyn ServiceContainer>, database: Arc<Database>, config: Config) -> Self {
        Self {
            services,
            database,
            config: Arc::new(config),
        }
    }
}
