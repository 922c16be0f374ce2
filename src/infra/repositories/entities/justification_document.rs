//! Justification document database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::domain::JustificationDocument;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "justification_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// At most one justification per document
    #[sea_orm(unique)]
    pub document_id: Uuid,
    pub title: String,
    pub file_url: String,
    pub file_type: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::document::Entity",
        from = "Column::DocumentId",
        to = "super::document::Column::Id"
    )]
    Document,
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for JustificationDocument {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(JustificationDocument {
            file_type: parse_column("justification_documents", "file_type", &model.file_type)?,
            id: model.id,
            document_id: model.document_id,
            title: model.title,
            file_url: model.file_url,
            created_at: model.created_at,
        })
    }
}

impl From<&JustificationDocument> for ActiveModel {
    fn from(justification: &JustificationDocument) -> Self {
        ActiveModel {
            id: Set(justification.id),
            document_id: Set(justification.document_id),
            title: Set(justification.title.clone()),
            file_url: Set(justification.file_url.clone()),
            file_type: Set(justification.file_type.as_str().to_string()),
            created_at: Set(justification.created_at),
        }
    }
}
