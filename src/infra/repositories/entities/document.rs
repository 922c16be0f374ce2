//! Document database entity for SeaORM.
//!
//! Metadata is flattened into nullable columns; `meta_date` is the only
//! required metadata field.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::{Document, DocumentMetadata};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub file_url: String,
    pub file_type: String,
    pub category: String,
    pub meta_date: Date,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub party_name: Option<String>,
    pub party_type: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub client_id: Uuid,
    pub status: String,
    pub assigned_accountant_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(has_one = "super::justification_document::Entity")]
    Justification,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::justification_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Justification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Document {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let party_type = model
            .party_type
            .as_deref()
            .map(|raw| parse_column("documents", "party_type", raw))
            .transpose()?;

        Ok(Document {
            id: model.id,
            title: model.title,
            file_url: model.file_url,
            file_type: parse_column("documents", "file_type", &model.file_type)?,
            category: parse_column("documents", "category", &model.category)?,
            metadata: DocumentMetadata {
                date: model.meta_date,
                amount: model.amount,
                currency: model.currency,
                party_name: model.party_name,
                party_type,
                reference: model.reference,
                notes: model.notes,
            },
            client_id: model.client_id,
            status: parse_column("documents", "status", &model.status)?,
            assigned_accountant_id: model.assigned_accountant_id,
            created_at: model.created_at,
        })
    }
}

impl From<&Document> for ActiveModel {
    fn from(document: &Document) -> Self {
        let metadata = &document.metadata;
        ActiveModel {
            id: Set(document.id),
            title: Set(document.title.clone()),
            file_url: Set(document.file_url.clone()),
            file_type: Set(document.file_type.as_str().to_string()),
            category: Set(document.category.as_str().to_string()),
            meta_date: Set(metadata.date),
            amount: Set(metadata.amount),
            currency: Set(metadata.currency.clone()),
            party_name: Set(metadata.party_name.clone()),
            party_type: Set(metadata.party_type.map(|p| p.as_str().to_string())),
            reference: Set(metadata.reference.clone()),
            notes: Set(metadata.notes.clone()),
            client_id: Set(document.client_id),
            status: Set(document.status.as_str().to_string()),
            assigned_accountant_id: Set(document.assigned_accountant_id),
            created_at: Set(document.created_at),
            updated_at: Set(chrono::Utc::now()),
        }
    }
}
