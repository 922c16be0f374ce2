//! Admin repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::admin::{self, ActiveModel, Entity as AdminEntity};
use super::Executor;
use crate::domain::Admin;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Admin repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Find admin by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Admin>>;

    /// Find admin by normalized email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Admin>>;

    /// Create a new admin
    async fn create(&self, admin: Admin) -> AppResult<Admin>;
}

/// Concrete implementation of AdminRepository
pub struct AdminStore<C> {
    conn: C,
}

impl<C: Executor> AdminStore<C> {
    /// Create new repository instance
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C: Executor> AdminRepository for AdminStore<C> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Admin>> {
        let result = AdminEntity::find_by_id(id)
            .one(self.conn.conn())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Admin::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        let result = AdminEntity::find()
            .filter(admin::Column::Email.eq(email))
            .one(self.conn.conn())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Admin::from))
    }

    async fn create(&self, admin: Admin) -> AppResult<Admin> {
        let active_model = ActiveModel {
            id: Set(admin.id),
            name: Set(admin.name),
            email: Set(admin.email),
            password_hash: Set(admin.password_hash),
            created_at: Set(admin.created_at),
        };

        let model = active_model
            .insert(self.conn.conn())
            .await
            .map_err(|e| AppError::from_db_unique(e, "An admin with this email already exists"))?;

        Ok(Admin::from(model))
    }
}
