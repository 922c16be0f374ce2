//! Accountant repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::accountant::{self, ActiveModel, Entity as AccountantEntity};
use super::Executor;
use crate::domain::Accountant;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const DUPLICATE_EMAIL: &str = "An accountant with this email already exists";

/// Accountant repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountantRepository: Send + Sync {
    /// Find accountant by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Accountant>>;

    /// Find accountant by normalized email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Accountant>>;

    /// Find several accountants at once (missing ids are skipped)
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Accountant>>;

    /// List all accountants, newest first
    async fn list(&self) -> AppResult<Vec<Accountant>>;

    /// Insert a new accountant; duplicate email is a conflict
    async fn create(&self, accountant: Accountant) -> AppResult<Accountant>;

    /// Persist every field of an existing accountant
    async fn update(&self, accountant: Accountant) -> AppResult<Accountant>;

    /// Hard delete; returns whether a row was removed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of AccountantRepository
pub struct AccountantStore<C> {
    conn: C,
}

impl<C: Executor> AccountantStore<C> {
    /// Create new repository instance
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C: Executor> AccountantRepository for AccountantStore<C> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Accountant>> {
        AccountantEntity::find_by_id(id)
            .one(self.conn.conn())
            .await?
            .map(Accountant::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Accountant>> {
        AccountantEntity::find()
            .filter(accountant::Column::Email.eq(email))
            .one(self.conn.conn())
            .await?
            .map(Accountant::try_from)
            .transpose()
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Accountant>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        AccountantEntity::find()
            .filter(accountant::Column::Id.is_in(ids))
            .all(self.conn.conn())
            .await?
            .into_iter()
            .map(Accountant::try_from)
            .collect()
    }

    async fn list(&self) -> AppResult<Vec<Accountant>> {
        AccountantEntity::find()
            .order_by_desc(accountant::Column::CreatedAt)
            .all(self.conn.conn())
            .await?
            .into_iter()
            .map(Accountant::try_from)
            .collect()
    }

    async fn create(&self, accountant: Accountant) -> AppResult<Accountant> {
        let model = ActiveModel::from(&accountant)
            .insert(self.conn.conn())
            .await
            .map_err(|e| AppError::from_db_unique(e, DUPLICATE_EMAIL))?;

        Accountant::try_from(model)
    }

    async fn update(&self, accountant: Accountant) -> AppResult<Accountant> {
        let mut active = ActiveModel::from(&accountant);
        // created_at is immutable
        active.created_at = sea_orm::ActiveValue::NotSet;

        let model = active
            .update(self.conn.conn())
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => AppError::NotFound,
                other => AppError::from_db_unique(other, DUPLICATE_EMAIL),
            })?;

        Accountant::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = AccountantEntity::delete_by_id(id)
            .exec(self.conn.conn())
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}
