//! Document domain entity and its processing lifecycle.
//!
//! Status moves freely between `in_progress`, `processed` and `rejected`.
//! `new` is the initial state and is re-entered by every edit of the
//! document content or metadata.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::search::Searchable;
use crate::config::{
    DOCUMENT_STATUS_IN_PROGRESS, DOCUMENT_STATUS_NEW, DOCUMENT_STATUS_PROCESSED,
    DOCUMENT_STATUS_REJECTED,
};
use crate::errors::{AppError, AppResult};

// =============================================================================
// File type
// =============================================================================

/// Stored file type, always one of the short forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Jpg,
    Jpeg,
    Png,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Jpg => "jpg",
            FileType::Jpeg => "jpeg",
            FileType::Png => "png",
        }
    }

    /// Normalize a raw MIME type or extension to a stored file type.
    ///
    /// `image/jpeg` maps to `jpg`; a bare `jpeg` extension is kept as is.
    pub fn normalize(raw: &str) -> AppResult<Self> {
        let essence = raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        let short = essence.trim_start_matches('.');

        match short {
            "application/pdf" | "pdf" => Ok(FileType::Pdf),
            "image/jpeg" | "image/jpg" | "image/pjpeg" | "jpg" => Ok(FileType::Jpg),
            "jpeg" => Ok(FileType::Jpeg),
            "image/png" | "png" => Ok(FileType::Png),
            _ => Err(AppError::validation(format!(
                "Unsupported file type '{}'; expected pdf, jpg, jpeg or png",
                raw
            ))),
        }
    }
}

impl FromStr for FileType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileType::normalize(s)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Category & party
// =============================================================================

/// Accounting category of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DocumentCategory {
    Purchase,
    Sale,
    #[serde(rename = "Payment Receipt")]
    PaymentReceipt,
    #[serde(rename = "Delivery Note")]
    DeliveryNote,
}

impl DocumentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::Purchase => "Purchase",
            DocumentCategory::Sale => "Sale",
            DocumentCategory::PaymentReceipt => "Payment Receipt",
            DocumentCategory::DeliveryNote => "Delivery Note",
        }
    }
}

impl FromStr for DocumentCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Purchase" => Ok(DocumentCategory::Purchase),
            "Sale" => Ok(DocumentCategory::Sale),
            "Payment Receipt" => Ok(DocumentCategory::PaymentReceipt),
            "Delivery Note" => Ok(DocumentCategory::DeliveryNote),
            other => Err(AppError::validation(format!("Unknown category '{}'", other))),
        }
    }
}

/// Counterparty role on a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PartyType {
    Supplier,
    Customer,
}

impl PartyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyType::Supplier => "Supplier",
            PartyType::Customer => "Customer",
        }
    }
}

impl FromStr for PartyType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Supplier" => Ok(PartyType::Supplier),
            "Customer" => Ok(PartyType::Customer),
            other => Err(AppError::validation(format!("Unknown party type '{}'", other))),
        }
    }
}

// =============================================================================
// Metadata
// =============================================================================

/// Financial metadata recorded for a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DocumentMetadata {
    #[schema(value_type = String, format = Date, example = "2024-03-31")]
    pub date: NaiveDate,
    /// Exact decimal, serialized as a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "249.90")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_type: Option<PartyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DocumentMetadata {
    pub fn dated(date: NaiveDate) -> Self {
        Self {
            date,
            amount: None,
            currency: None,
            party_name: None,
            party_type: None,
            reference: None,
            notes: None,
        }
    }

    /// Overlay the provided keys; keys absent from the patch keep their value.
    pub fn merge(&mut self, patch: MetadataPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if patch.amount.is_some() {
            self.amount = patch.amount;
        }
        if patch.currency.is_some() {
            self.currency = patch.currency;
        }
        if patch.party_name.is_some() {
            self.party_name = patch.party_name;
        }
        if patch.party_type.is_some() {
            self.party_type = patch.party_type;
        }
        if patch.reference.is_some() {
            self.reference = patch.reference;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
    }
}

/// Partial metadata update
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct MetadataPatch {
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, example = "249.90")]
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub party_name: Option<String>,
    pub party_type: Option<PartyType>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Status
// =============================================================================

/// Document processing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    New,
    InProgress,
    Processed,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::New => DOCUMENT_STATUS_NEW,
            DocumentStatus::InProgress => DOCUMENT_STATUS_IN_PROGRESS,
            DocumentStatus::Processed => DOCUMENT_STATUS_PROCESSED,
            DocumentStatus::Rejected => DOCUMENT_STATUS_REJECTED,
        }
    }

    /// Whether a reviewer may move a document into this status directly.
    /// `new` is only re-entered through an edit.
    pub fn is_review_target(&self) -> bool {
        !matches!(self, DocumentStatus::New)
    }
}

impl FromStr for DocumentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DOCUMENT_STATUS_NEW => Ok(DocumentStatus::New),
            DOCUMENT_STATUS_IN_PROGRESS => Ok(DocumentStatus::InProgress),
            DOCUMENT_STATUS_PROCESSED => Ok(DocumentStatus::Processed),
            DOCUMENT_STATUS_REJECTED => Ok(DocumentStatus::Rejected),
            other => Err(AppError::validation(format!("Unknown document status '{}'", other))),
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Document
// =============================================================================

/// Document domain entity
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Document {
    pub id: Uuid,
    #[schema(example = "March electricity invoice")]
    pub title: String,
    #[schema(example = "http://localhost:3000/uploads/3f0c-invoice.pdf")]
    pub file_url: String,
    pub file_type: FileType,
    pub category: DocumentCategory,
    pub metadata: DocumentMetadata,
    pub client_id: Uuid,
    pub status: DocumentStatus,
    /// Owning client's accountant at creation time; scoping goes through the client
    pub assigned_accountant_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Build a fresh document in status `new`.
    pub fn new(draft: NewDocument, file_url: String, client_id: Uuid, accountant_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            file_url,
            file_type: draft.file_type,
            category: draft.category,
            metadata: draft.metadata,
            client_id,
            status: DocumentStatus::New,
            assigned_accountant_id: accountant_id,
            created_at: Utc::now(),
        }
    }

    /// Move to a review status.
    pub fn transition(&mut self, target: DocumentStatus) -> AppResult<()> {
        if !target.is_review_target() {
            return Err(AppError::invalid_transition(format!(
                "Document cannot be moved to '{}' directly; edit it instead",
                target
            )));
        }
        self.status = target;
        Ok(())
    }

    /// Apply a content edit. Metadata is merged and the review restarts.
    pub fn apply_edit(&mut self, edit: DocumentEdit) {
        if let Some(title) = edit.title {
            self.title = title;
        }
        if let Some(file_url) = edit.file_url {
            self.file_url = file_url;
        }
        if let Some(file_type) = edit.file_type {
            self.file_type = file_type;
        }
        if let Some(category) = edit.category {
            self.category = category;
        }
        if let Some(patch) = edit.metadata {
            self.metadata.merge(patch);
        }
        self.status = DocumentStatus::New;
    }
}

impl Searchable for Document {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.category.as_str()];
        if let Some(party) = self.metadata.party_name.as_deref() {
            fields.push(party);
        }
        if let Some(reference) = self.metadata.reference.as_deref() {
            fields.push(reference);
        }
        fields
    }
}

/// Validated document details supplied on creation
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub file_type: FileType,
    pub category: DocumentCategory,
    pub metadata: DocumentMetadata,
}

/// Document details supplied with an upload; the file type comes from the file
#[derive(Debug, Clone)]
pub struct DocumentDraft {
    pub title: String,
    pub category: DocumentCategory,
    pub metadata: DocumentMetadata,
}

impl DocumentDraft {
    pub fn with_file_type(self, file_type: FileType) -> NewDocument {
        NewDocument {
            title: self.title,
            file_type,
            category: self.category,
            metadata: self.metadata,
        }
    }
}

/// Document edit; absent fields keep their value
#[derive(Debug, Clone, Default)]
pub struct DocumentEdit {
    pub title: Option<String>,
    pub file_url: Option<String>,
    pub file_type: Option<FileType>,
    pub category: Option<DocumentCategory>,
    pub metadata: Option<MetadataPatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        let mut metadata = DocumentMetadata::dated(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        metadata.amount = Some(Decimal::new(12050, 2));
        metadata.currency = Some("EUR".to_string());
        metadata.party_name = Some("Old Supplier".to_string());
        metadata.reference = Some("INV-001".to_string());

        Document::new(
            NewDocument {
                title: "Invoice".to_string(),
                file_type: FileType::Pdf,
                category: DocumentCategory::Purchase,
                metadata,
            },
            "http://files/invoice.pdf".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
        )
    }

    #[test]
    fn test_mime_normalization() {
        assert_eq!(FileType::normalize("image/jpeg").unwrap(), FileType::Jpg);
        assert_eq!(FileType::normalize("image/png").unwrap(), FileType::Png);
        assert_eq!(FileType::normalize("application/pdf").unwrap(), FileType::Pdf);
        assert_eq!(FileType::normalize("Application/PDF; qs=0.9").unwrap(), FileType::Pdf);
        assert_eq!(FileType::normalize("jpeg").unwrap(), FileType::Jpeg);
        assert_eq!(FileType::normalize(".png").unwrap(), FileType::Png);
        assert!(FileType::normalize("image/gif").is_err());
    }

    #[test]
    fn test_new_document_starts_new() {
        assert_eq!(document().status, DocumentStatus::New);
    }

    #[test]
    fn test_review_transitions_are_free() {
        let mut doc = document();
        doc.transition(DocumentStatus::Processed).unwrap();
        doc.transition(DocumentStatus::Rejected).unwrap();
        doc.transition(DocumentStatus::Processed).unwrap();
        doc.transition(DocumentStatus::InProgress).unwrap();
        assert_eq!(doc.status, DocumentStatus::InProgress);
    }

    #[test]
    fn test_cannot_transition_to_new() {
        let mut doc = document();
        doc.transition(DocumentStatus::Processed).unwrap();
        assert!(matches!(
            doc.transition(DocumentStatus::New),
            Err(AppError::InvalidTransition(_))
        ));
        assert_eq!(doc.status, DocumentStatus::Processed);
    }

    #[test]
    fn test_edit_merges_metadata_and_resets_status() {
        let mut doc = document();
        doc.transition(DocumentStatus::Processed).unwrap();
        let before = doc.metadata.clone();

        doc.apply_edit(DocumentEdit {
            metadata: Some(MetadataPatch {
                party_name: Some("New Supplier".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(doc.status, DocumentStatus::New);
        assert_eq!(doc.metadata.party_name.as_deref(), Some("New Supplier"));
        assert_eq!(doc.metadata.reference, before.reference);
        assert_eq!(doc.metadata.date, before.date);
        assert_eq!(doc.metadata.amount, before.amount);
        assert_eq!(doc.metadata.currency, before.currency);
    }

    #[test]
    fn test_empty_edit_still_resets_status() {
        let mut doc = document();
        doc.transition(DocumentStatus::Rejected).unwrap();
        doc.apply_edit(DocumentEdit::default());
        assert_eq!(doc.status, DocumentStatus::New);
        assert_eq!(doc.title, "Invoice");
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&DocumentCategory::PaymentReceipt).unwrap();
        assert_eq!(json, "\"Payment Receipt\"");
        let parsed: DocumentCategory = serde_json::from_str("\"Delivery Note\"").unwrap();
        assert_eq!(parsed, DocumentCategory::DeliveryNote);
    }

    #[test]
    fn test_amount_is_exact() {
        let from_number: DocumentMetadata =
            serde_json::from_str(r#"{"date": "2024-03-31", "amount": 0.1}"#).unwrap();
        let from_string: DocumentMetadata =
            serde_json::from_str(r#"{"date": "2024-03-31", "amount": "0.20"}"#).unwrap();

        let total = from_number.amount.unwrap() + from_string.amount.unwrap();
        assert_eq!(total, Decimal::new(3, 1));

        let json = serde_json::to_value(&from_string).unwrap();
        assert_eq!(json["amount"], "0.20");
    }
}
