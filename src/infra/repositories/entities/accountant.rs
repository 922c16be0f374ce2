//! Accountant database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::Accountant;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accountants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Accountant {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Accountant {
            status: parse_column("accountants", "status", &model.status)?,
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            created_at: model.created_at,
        })
    }
}

impl From<&Accountant> for ActiveModel {
    fn from(accountant: &Accountant) -> Self {
        ActiveModel {
            id: Set(accountant.id),
            name: Set(accountant.name.clone()),
            email: Set(accountant.email.clone()),
            password_hash: Set(accountant.password_hash.clone()),
            status: Set(accountant.status.as_str().to_string()),
            created_at: Set(accountant.created_at),
            updated_at: Set(chrono::Utc::now()),
        }
    }
}
