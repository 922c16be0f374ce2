//! Client repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use super::entities::client::{self, ActiveModel, Entity as ClientEntity};
use super::Executor;
use crate::domain::Client;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const DUPLICATE_EMAIL: &str = "A client with this email already exists";

/// Client repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Find client by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Client>>;

    /// Find client by ID and hold a row lock until the transaction ends
    async fn find_for_update(&self, id: Uuid) -> AppResult<Option<Client>>;

    /// Find client by normalized email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Client>>;

    /// Find several clients at once (missing ids are skipped)
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Client>>;

    /// List clients, newest first; `Some(accountant)` restricts to that owner
    async fn list(&self, accountant_id: Option<Uuid>) -> AppResult<Vec<Client>>;

    /// Ids of the clients owned by an accountant
    async fn ids_for_accountant(&self, accountant_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Insert a new client; duplicate email is a conflict
    async fn create(&self, client: Client) -> AppResult<Client>;

    /// Persist every field of an existing client
    async fn update(&self, client: Client) -> AppResult<Client>;

    /// Hard delete; returns whether a row was removed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of ClientRepository
pub struct ClientStore<C> {
    conn: C,
}

impl<C: Executor> ClientStore<C> {
    /// Create new repository instance
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C: Executor> ClientRepository for ClientStore<C> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Client>> {
        ClientEntity::find_by_id(id)
            .one(self.conn.conn())
            .await?
            .map(Client::try_from)
            .transpose()
    }

    async fn find_for_update(&self, id: Uuid) -> AppResult<Option<Client>> {
        ClientEntity::find_by_id(id)
            .lock_exclusive()
            .one(self.conn.conn())
            .await?
            .map(Client::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Client>> {
        ClientEntity::find()
            .filter(client::Column::Email.eq(email))
            .one(self.conn.conn())
            .await?
            .map(Client::try_from)
            .transpose()
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Client>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        ClientEntity::find()
            .filter(client::Column::Id.is_in(ids))
            .all(self.conn.conn())
            .await?
            .into_iter()
            .map(Client::try_from)
            .collect()
    }

    async fn list(&self, accountant_id: Option<Uuid>) -> AppResult<Vec<Client>> {
        let mut query = ClientEntity::find();
        if let Some(accountant_id) = accountant_id {
            query = query.filter(client::Column::AccountantId.eq(accountant_id));
        }

        query
            .order_by_desc(client::Column::CreatedAt)
            .all(self.conn.conn())
            .await?
            .into_iter()
            .map(Client::try_from)
            .collect()
    }

    async fn ids_for_accountant(&self, accountant_id: Uuid) -> AppResult<Vec<Uuid>> {
        let ids = ClientEntity::find()
            .select_only()
            .column(client::Column::Id)
            .filter(client::Column::AccountantId.eq(accountant_id))
            .into_tuple::<Uuid>()
            .all(self.conn.conn())
            .await?;

        Ok(ids)
    }

    async fn create(&self, client: Client) -> AppResult<Client> {
        let model = ActiveModel::from(&client)
            .insert(self.conn.conn())
            .await
            .map_err(|e| AppError::from_db_unique(e, DUPLICATE_EMAIL))?;

        Client::try_from(model)
    }

    async fn update(&self, client: Client) -> AppResult<Client> {
        let mut active = ActiveModel::from(&client);
        active.created_at = sea_orm::ActiveValue::NotSet;

        let model = active
            .update(self.conn.conn())
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => AppError::NotFound,
                other => AppError::from_db_unique(other, DUPLICATE_EMAIL),
            })?;

        Client::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = ClientEntity::delete_by_id(id)
            .exec(self.conn.conn())
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}
