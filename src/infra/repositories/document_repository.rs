//! Document repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use super::entities::document::{self, ActiveModel, Entity as DocumentEntity};
use super::Executor;
use crate::domain::Document;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Which documents a listing may return
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentScope {
    /// Unfiltered
    All,
    /// Documents owned by any of these clients
    Clients(Vec<Uuid>),
}

/// Document repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Find document by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>>;

    /// Find document by ID and hold a row lock until the transaction ends
    async fn find_for_update(&self, id: Uuid) -> AppResult<Option<Document>>;

    /// List documents in scope, newest first
    async fn list(&self, scope: DocumentScope) -> AppResult<Vec<Document>>;

    /// Ids of the documents owned by a client
    async fn ids_for_client(&self, client_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Insert a new document
    async fn create(&self, document: Document) -> AppResult<Document>;

    /// Persist every field of an existing document
    async fn update(&self, document: Document) -> AppResult<Document>;

    /// Hard delete; returns whether a row was removed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Delete every document owned by a client; returns the count removed
    async fn delete_for_client(&self, client_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of DocumentRepository
pub struct DocumentStore<C> {
    conn: C,
}

impl<C: Executor> DocumentStore<C> {
    /// Create new repository instance
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C: Executor> DocumentRepository for DocumentStore<C> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        DocumentEntity::find_by_id(id)
            .one(self.conn.conn())
            .await?
            .map(Document::try_from)
            .transpose()
    }

    async fn find_for_update(&self, id: Uuid) -> AppResult<Option<Document>> {
        DocumentEntity::find_by_id(id)
            .lock_exclusive()
            .one(self.conn.conn())
            .await?
            .map(Document::try_from)
            .transpose()
    }

    async fn list(&self, scope: DocumentScope) -> AppResult<Vec<Document>> {
        let query = match scope {
            DocumentScope::All => DocumentEntity::find(),
            DocumentScope::Clients(ids) if ids.is_empty() => return Ok(Vec::new()),
            DocumentScope::Clients(ids) => {
                DocumentEntity::find().filter(document::Column::ClientId.is_in(ids))
            }
        };

        query
            .order_by_desc(document::Column::CreatedAt)
            .all(self.conn.conn())
            .await?
            .into_iter()
            .map(Document::try_from)
            .collect()
    }

    async fn ids_for_client(&self, client_id: Uuid) -> AppResult<Vec<Uuid>> {
        let ids = DocumentEntity::find()
            .select_only()
            .column(document::Column::Id)
            .filter(document::Column::ClientId.eq(client_id))
            .into_tuple::<Uuid>()
            .all(self.conn.conn())
            .await?;

        Ok(ids)
    }

    async fn create(&self, document: Document) -> AppResult<Document> {
        let model = ActiveModel::from(&document)
            .insert(self.conn.conn())
            .await
            .map_err(AppError::from)?;

        Document::try_from(model)
    }

    async fn update(&self, document: Document) -> AppResult<Document> {
        let mut active = ActiveModel::from(&document);
        active.created_at = sea_orm::ActiveValue::NotSet;

        let model = active
            .update(self.conn.conn())
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => AppError::NotFound,
                other => AppError::Database(other),
            })?;

        Document::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = DocumentEntity::delete_by_id(id)
            .exec(self.conn.conn())
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_for_client(&self, client_id: Uuid) -> AppResult<u64> {
        let result = DocumentEntity::delete_many()
            .filter(document::Column::ClientId.eq(client_id))
            .exec(self.conn.conn())
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
