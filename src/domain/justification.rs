//! Justification documents: the supporting file linked to a document.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::document::FileType;

/// Supporting file for a document. At most one exists per document.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct JustificationDocument {
    pub id: Uuid,
    pub document_id: Uuid,
    #[schema(example = "Bank transfer confirmation")]
    pub title: String,
    pub file_url: String,
    pub file_type: FileType,
    pub created_at: DateTime<Utc>,
}

impl JustificationDocument {
    pub fn new(document_id: Uuid, title: String, file_url: String, file_type: FileType) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            title,
            file_url,
            file_type,
            created_at: Utc::now(),
        }
    }
}
