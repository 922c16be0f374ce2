//! Justification document repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::entities::justification_document::{self, ActiveModel, Entity as JustificationEntity};
use super::Executor;
use crate::domain::JustificationDocument;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Justification repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait JustificationRepository: Send + Sync {
    /// Find the justification attached to a document
    async fn find_by_document(&self, document_id: Uuid) -> AppResult<Option<JustificationDocument>>;

    /// Insert a justification; a second one for the same document is a conflict
    async fn create(&self, justification: JustificationDocument) -> AppResult<JustificationDocument>;

    /// Remove the justification of a document, returning it if one existed
    async fn delete_for_document(&self, document_id: Uuid) -> AppResult<Option<JustificationDocument>>;

    /// Remove the justifications of several documents; returns the count removed
    async fn delete_for_documents(&self, document_ids: Vec<Uuid>) -> AppResult<u64>;
}

/// Concrete implementation of JustificationRepository
pub struct JustificationStore<C> {
    conn: C,
}

impl<C: Executor> JustificationStore<C> {
    /// Create new repository instance
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C: Executor> JustificationRepository for JustificationStore<C> {
    async fn find_by_document(&self, document_id: Uuid) -> AppResult<Option<JustificationDocument>> {
        JustificationEntity::find()
            .filter(justification_document::Column::DocumentId.eq(document_id))
            .one(self.conn.conn())
            .await?
            .map(JustificationDocument::try_from)
            .transpose()
    }

    async fn create(&self, justification: JustificationDocument) -> AppResult<JustificationDocument> {
        let model = ActiveModel::from(&justification)
            .insert(self.conn.conn())
            .await
            .map_err(|e| {
                AppError::from_db_unique(e, "Document already has a justification attached")
            })?;

        JustificationDocument::try_from(model)
    }

    async fn delete_for_document(&self, document_id: Uuid) -> AppResult<Option<JustificationDocument>> {
        let existing = self.find_by_document(document_id).await?;

        if existing.is_some() {
            JustificationEntity::delete_many()
                .filter(justification_document::Column::DocumentId.eq(document_id))
                .exec(self.conn.conn())
                .await
                .map_err(AppError::from)?;
        }

        Ok(existing)
    }

    async fn delete_for_documents(&self, document_ids: Vec<Uuid>) -> AppResult<u64> {
        if document_ids.is_empty() {
            return Ok(0);
        }

        let result = JustificationEntity::delete_many()
            .filter(justification_document::Column::DocumentId.is_in(document_ids))
            .exec(self.conn.conn())
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
