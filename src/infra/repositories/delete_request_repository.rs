//! Delete request repository implementation.
//!
//! The "one pending request per client" rule is held by a partial unique
//! index, and decisions use a conditional update, so neither depends on an
//! application-level check-then-act.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use super::entities::delete_request::{self, ActiveModel, Entity as DeleteRequestEntity};
use super::Executor;
use crate::config::DELETE_REQUEST_STATUS_PENDING;
use crate::domain::{DeleteRequest, DeleteRequestStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Delete request repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DeleteRequestRepository: Send + Sync {
    /// Find request by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DeleteRequest>>;

    /// Find the pending request for a client, if any
    async fn find_pending_for_client(&self, client_id: Uuid) -> AppResult<Option<DeleteRequest>>;

    /// List requests, newest first; `Some(accountant)` restricts to that requester
    async fn list(&self, accountant_id: Option<Uuid>) -> AppResult<Vec<DeleteRequest>>;

    /// Insert a pending request; a second pending one for the client is a conflict
    async fn create(&self, request: DeleteRequest) -> AppResult<DeleteRequest>;

    /// Move a request out of `pending`. Returns false when it was no longer pending.
    async fn set_status_if_pending(&self, id: Uuid, status: DeleteRequestStatus) -> AppResult<bool>;
}

/// Concrete implementation of DeleteRequestRepository
pub struct DeleteRequestStore<C> {
    conn: C,
}

impl<C: Executor> DeleteRequestStore<C> {
    /// Create new repository instance
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C: Executor> DeleteRequestRepository for DeleteRequestStore<C> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DeleteRequest>> {
        DeleteRequestEntity::find_by_id(id)
            .one(self.conn.conn())
            .await?
            .map(DeleteRequest::try_from)
            .transpose()
    }

    async fn find_pending_for_client(&self, client_id: Uuid) -> AppResult<Option<DeleteRequest>> {
        DeleteRequestEntity::find()
            .filter(delete_request::Column::ClientId.eq(client_id))
            .filter(delete_request::Column::Status.eq(DELETE_REQUEST_STATUS_PENDING))
            .one(self.conn.conn())
            .await?
            .map(DeleteRequest::try_from)
            .transpose()
    }

    async fn list(&self, accountant_id: Option<Uuid>) -> AppResult<Vec<DeleteRequest>> {
        let mut query = DeleteRequestEntity::find();
        if let Some(accountant_id) = accountant_id {
            query = query.filter(delete_request::Column::AccountantId.eq(accountant_id));
        }

        query
            .order_by_desc(delete_request::Column::CreatedAt)
            .all(self.conn.conn())
            .await?
            .into_iter()
            .map(DeleteRequest::try_from)
            .collect()
    }

    async fn create(&self, request: DeleteRequest) -> AppResult<DeleteRequest> {
        let model = ActiveModel::from(&request)
            .insert(self.conn.conn())
            .await
            .map_err(|e| {
                AppError::from_db_unique(e, "A deletion request is already pending for this client")
            })?;

        DeleteRequest::try_from(model)
    }

    async fn set_status_if_pending(&self, id: Uuid, status: DeleteRequestStatus) -> AppResult<bool> {
        let result = DeleteRequestEntity::update_many()
            .col_expr(delete_request::Column::Status, Expr::value(status.as_str()))
            .col_expr(delete_request::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(delete_request::Column::Id.eq(id))
            .filter(delete_request::Column::Status.eq(DELETE_REQUEST_STATUS_PENDING))
            .exec(self.conn.conn())
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected == 1)
    }
}
