//! Client database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::Client;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub status: String,
    /// Owning accountant. Not a foreign key: a dangling id is tolerated.
    pub accountant_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::document::Entity")]
    Documents,
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Client {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Client {
            status: parse_column("clients", "status", &model.status)?,
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            accountant_id: model.accountant_id,
            created_at: model.created_at,
        })
    }
}

impl From<&Client> for ActiveModel {
    fn from(client: &Client) -> Self {
        ActiveModel {
            id: Set(client.id),
            name: Set(client.name.clone()),
            email: Set(client.email.clone()),
            password_hash: Set(client.password_hash.clone()),
            status: Set(client.status.as_str().to_string()),
            accountant_id: Set(client.accountant_id),
            created_at: Set(client.created_at),
            updated_at: Set(chrono::Utc::now()),
        }
    }
}
