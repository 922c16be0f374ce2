//! Document intake and review.
//!
//! Scope checks run against the owning client before anything is written,
//! so a rejected upload never leaves a file behind.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::cascade;
use super::visibility::{document_scope, load_document, lock_document};
use crate::domain::{
    authorize, search, Action, Client, Document, DocumentDraft, DocumentEdit, DocumentStatus,
    NewDocument, Principal, Target,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::storage::discard_blob;
use crate::infra::{BlobStore, DocumentRepository, UnitOfWork, UploadedFile};

#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn list(&self, principal: &Principal, term: Option<&str>) -> AppResult<Vec<Document>>;

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Document>;

    /// Manual add of a document whose file already lives at `file_url`.
    /// Clients always add to themselves; staff name the owning client.
    async fn create(
        &self,
        principal: &Principal,
        client_id: Option<Uuid>,
        input: NewDocument,
        file_url: String,
    ) -> AppResult<Document>;

    /// Store an uploaded file and register it as a new document
    async fn upload(
        &self,
        principal: &Principal,
        client_id: Option<Uuid>,
        draft: DocumentDraft,
        file: UploadedFile,
    ) -> AppResult<Document>;

    /// Move to `in_progress`, `processed` or `rejected`
    async fn transition(
        &self,
        principal: &Principal,
        id: Uuid,
        status: DocumentStatus,
    ) -> AppResult<Document>;

    /// Edit content or metadata; always resets the review to `new`
    async fn edit(&self, principal: &Principal, id: Uuid, edit: DocumentEdit) -> AppResult<Document>;

    /// Hard delete together with the justification
    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()>;
}

pub struct DocumentManager<U: UnitOfWork> {
    uow: Arc<U>,
    blobs: Arc<dyn BlobStore>,
}

impl<U: UnitOfWork> DocumentManager<U> {
    pub fn new(uow: Arc<U>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { uow, blobs }
    }

    /// Resolve and authorize the client a new document will belong to.
    async fn owning_client(&self, principal: &Principal, client_id: Option<Uuid>) -> AppResult<Client> {
        let client_id = match principal {
            Principal::Client(me) => me.id,
            _ => client_id.ok_or_else(|| AppError::validation("client_id is required"))?,
        };

        let client = self.uow.clients().find_by_id(client_id).await?.ok_or_not_found()?;
        authorize(
            principal,
            Action::Create,
            Target::Document {
                client_id: client.id,
                accountant_id: Some(client.accountant_id),
            },
        )
        .into_result()?;

        Ok(client)
    }

    async fn insert(&self, input: NewDocument, file_url: String, owner: &Client) -> AppResult<Document> {
        let document = Document::new(input, file_url, owner.id, owner.accountant_id);
        let document = self.uow.documents().create(document).await?;
        tracing::info!(document_id = %document.id, client_id = %owner.id, "Document added");
        Ok(document)
    }
}

#[async_trait]
impl<U: UnitOfWork> DocumentService for DocumentManager<U> {
    async fn list(&self, principal: &Principal, term: Option<&str>) -> AppResult<Vec<Document>> {
        let scope = document_scope(self.uow.clients().as_ref(), principal).await?;
        let documents = self.uow.documents().list(scope).await?;
        Ok(search::filter(documents, term))
    }

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Document> {
        load_document(
            self.uow.clients().as_ref(),
            self.uow.documents().as_ref(),
            principal,
            Action::View,
            id,
        )
        .await
    }

    async fn create(
        &self,
        principal: &Principal,
        client_id: Option<Uuid>,
        input: NewDocument,
        file_url: String,
    ) -> AppResult<Document> {
        let owner = self.owning_client(principal, client_id).await?;
        self.insert(input, file_url, &owner).await
    }

    async fn upload(
        &self,
        principal: &Principal,
        client_id: Option<Uuid>,
        draft: DocumentDraft,
        file: UploadedFile,
    ) -> AppResult<Document> {
        let file_type = file.file_type()?;
        let owner = self.owning_client(principal, client_id).await?;

        let locator = self.blobs.store(file.bytes, &file.file_name).await?;
        let file_url = self.blobs.public_url(&locator);

        match self.insert(draft.with_file_type(file_type), file_url, &owner).await {
            Ok(document) => Ok(document),
            Err(e) => {
                discard_blob(self.blobs.as_ref(), &locator).await;
                Err(e)
            }
        }
    }

    async fn transition(
        &self,
        principal: &Principal,
        id: Uuid,
        status: DocumentStatus,
    ) -> AppResult<Document> {
        let principal = principal.clone();
        let (from, document) = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let documents = ctx.documents();
                    let mut document =
                        lock_document(&ctx.clients(), &documents, &principal, Action::Review, id)
                            .await?;
                    let from = document.status;
                    document.transition(status)?;
                    Ok((from, documents.update(document).await?))
                })
            })
            .await?;

        tracing::info!(document_id = %id, from = %from, to = %document.status, "Document reviewed");
        Ok(document)
    }

    async fn edit(&self, principal: &Principal, id: Uuid, edit: DocumentEdit) -> AppResult<Document> {
        let principal = principal.clone();
        let document = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let documents = ctx.documents();
                    let mut document =
                        lock_document(&ctx.clients(), &documents, &principal, Action::Edit, id)
                            .await?;
                    document.apply_edit(edit);
                    documents.update(document).await
                })
            })
            .await?;

        tracing::info!(document_id = %id, "Document edited; review reset to new");
        Ok(document)
    }

    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        load_document(
            self.uow.clients().as_ref(),
            self.uow.documents().as_ref(),
            principal,
            Action::Delete,
            id,
        )
        .await?;

        let files = self
            .uow
            .transaction(move |ctx| Box::pin(async move { cascade::delete_document(&ctx, id).await }))
            .await?
            .ok_or(AppError::NotFound)?;

        tracing::info!(document_id = %id, "Document deleted");
        cascade::discard_files(self.blobs.as_ref(), &files).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::domain::{ClientStatus, DocumentCategory, DocumentMetadata, Identity};
    use crate::services::testing::TestUnitOfWork;
    use crate::infra::repositories::{MockClientRepository, MockDocumentRepository};
    use crate::infra::MockBlobStore;

    fn draft() -> DocumentDraft {
        DocumentDraft {
            title: "Receipt".to_string(),
            category: DocumentCategory::PaymentReceipt,
            metadata: DocumentMetadata::dated(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
        }
    }

    fn pdf() -> UploadedFile {
        UploadedFile {
            file_name: "receipt.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: b"%PDF".to_vec(),
        }
    }

    fn accountant(id: Uuid) -> Principal {
        Principal::Accountant(Identity {
            id,
            name: "Ada".to_string(),
            email: "ada@firm.example".to_string(),
        })
    }

    fn client_of(accountant_id: Uuid) -> Client {
        Client {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            email: "acme@example.com".to_string(),
            password_hash: "hash".to_string(),
            status: ClientStatus::Accepted,
            accountant_id,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_unsupported_type_is_rejected_before_any_write() {
        let uow = TestUnitOfWork::default();
        let mut blobs = MockBlobStore::new();
        blobs.expect_store().times(0);

        let service = DocumentManager::new(Arc::new(uow), Arc::new(blobs));
        let gif = UploadedFile {
            file_name: "anim.gif".to_string(),
            content_type: Some("image/gif".to_string()),
            bytes: vec![0x47],
        };

        let result = service
            .upload(&accountant(Uuid::new_v4()), Some(Uuid::new_v4()), draft(), gif)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_out_of_scope_upload_writes_nothing() {
        let foreign = client_of(Uuid::new_v4());
        let foreign_id = foreign.id;

        let mut clients = MockClientRepository::new();
        clients
            .expect_find_by_id()
            .returning(move |_| Ok(Some(foreign.clone())));

        let mut documents = MockDocumentRepository::new();
        documents.expect_create().times(0);

        let mut blobs = MockBlobStore::new();
        blobs.expect_store().times(0);

        let uow = TestUnitOfWork {
            clients: Arc::new(clients),
            documents: Arc::new(documents),
            ..Default::default()
        };
        let service = DocumentManager::new(Arc::new(uow), Arc::new(blobs));

        let result = service
            .upload(&accountant(Uuid::new_v4()), Some(foreign_id), draft(), pdf())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_failed_insert_removes_stored_blob() {
        let me = Uuid::new_v4();
        let owner = client_of(me);
        let owner_id = owner.id;

        let mut clients = MockClientRepository::new();
        clients
            .expect_find_by_id()
            .returning(move |_| Ok(Some(owner.clone())));

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_create()
            .returning(|_| Err(AppError::internal("disk full")));

        let mut blobs = MockBlobStore::new();
        blobs
            .expect_store()
            .times(1)
            .returning(|_, _| Ok("abc-receipt.pdf".to_string()));
        blobs
            .expect_public_url()
            .returning(|locator| format!("http://localhost:3000/uploads/{}", locator));
        blobs
            .expect_remove()
            .withf(|locator| locator == "abc-receipt.pdf")
            .times(1)
            .returning(|_| Ok(()));

        let uow = TestUnitOfWork {
            clients: Arc::new(clients),
            documents: Arc::new(documents),
            ..Default::default()
        };
        let service = DocumentManager::new(Arc::new(uow), Arc::new(blobs));

        let result = service.upload(&accountant(me), Some(owner_id), draft(), pdf()).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_staff_upload_requires_client_id() {
        let mut blobs = MockBlobStore::new();
        blobs.expect_store().times(0);
        let service = DocumentManager::new(Arc::new(TestUnitOfWork::default()), Arc::new(blobs));

        let result = service
            .upload(&accountant(Uuid::new_v4()), None, draft(), pdf())
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
