//! Delete request database entity for SeaORM.
//!
//! `client_id` deliberately carries no foreign key: an approved request
//! outlives the client it removed.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::DeleteRequest;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "delete_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub accountant_id: Uuid,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for DeleteRequest {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(DeleteRequest {
            status: parse_column("delete_requests", "status", &model.status)?,
            id: model.id,
            client_id: model.client_id,
            accountant_id: model.accountant_id,
            created_at: model.created_at,
        })
    }
}

impl From<&DeleteRequest> for ActiveModel {
    fn from(request: &DeleteRequest) -> Self {
        ActiveModel {
            id: Set(request.id),
            client_id: Set(request.client_id),
            accountant_id: Set(request.accountant_id),
            status: Set(request.status.as_str().to_string()),
            created_at: Set(request.created_at),
            updated_at: Set(chrono::Utc::now()),
        }
    }
}
