//! Justification linkage: one supporting file per document.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::cascade;
use super::visibility::load_document;
use crate::domain::{Action, JustificationDocument, Principal};
use crate::errors::{AppResult, OptionExt};
use crate::infra::storage::discard_blob;
use crate::infra::{BlobStore, JustificationRepository, UnitOfWork, UploadedFile};

#[async_trait]
pub trait JustificationService: Send + Sync {
    /// Attach a justification, replacing any previous one
    async fn attach(
        &self,
        principal: &Principal,
        document_id: Uuid,
        title: Option<String>,
        file: UploadedFile,
    ) -> AppResult<JustificationDocument>;

    async fn get_by_document(
        &self,
        principal: &Principal,
        document_id: Uuid,
    ) -> AppResult<JustificationDocument>;
}

pub struct JustificationManager<U: UnitOfWork> {
    uow: Arc<U>,
    blobs: Arc<dyn BlobStore>,
}

impl<U: UnitOfWork> JustificationManager<U> {
    pub fn new(uow: Arc<U>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { uow, blobs }
    }
}

#[async_trait]
impl<U: UnitOfWork> JustificationService for JustificationManager<U> {
    async fn attach(
        &self,
        principal: &Principal,
        document_id: Uuid,
        title: Option<String>,
        file: UploadedFile,
    ) -> AppResult<JustificationDocument> {
        // Document must exist and be in scope before anything is stored
        let document = load_document(
            self.uow.clients().as_ref(),
            self.uow.documents().as_ref(),
            principal,
            Action::Attach,
            document_id,
        )
        .await?;
        let file_type = file.file_type()?;

        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| document.title.clone());

        let locator = self.blobs.store(file.bytes, &file.file_name).await?;
        let justification = JustificationDocument::new(
            document_id,
            title,
            self.blobs.public_url(&locator),
            file_type,
        );

        let replaced = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let previous = ctx.justifications().delete_for_document(document_id).await?;
                    let created = ctx.justifications().create(justification).await?;
                    Ok((created, previous))
                })
            })
            .await;

        let (created, previous) = match replaced {
            Ok(pair) => pair,
            Err(e) => {
                discard_blob(self.blobs.as_ref(), &locator).await;
                return Err(e);
            }
        };

        if let Some(previous) = previous {
            tracing::info!(document_id = %document_id, "Justification replaced");
            cascade::discard_files(self.blobs.as_ref(), &[previous.file_url]).await;
        } else {
            tracing::info!(document_id = %document_id, "Justification attached");
        }

        Ok(created)
    }

    async fn get_by_document(
        &self,
        principal: &Principal,
        document_id: Uuid,
    ) -> AppResult<JustificationDocument> {
        load_document(
            self.uow.clients().as_ref(),
            self.uow.documents().as_ref(),
            principal,
            Action::View,
            document_id,
        )
        .await?;

        self.uow
            .justifications()
            .find_by_document(document_id)
            .await?
            .ok_or_not_found()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Identity;
    use crate::errors::AppError;
    use crate::infra::repositories::{MockDocumentRepository, MockJustificationRepository};
    use crate::infra::MockBlobStore;
    use crate::services::testing::TestUnitOfWork;

    fn accountant() -> Principal {
        Principal::Accountant(Identity {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@firm.example".to_string(),
        })
    }

    fn receipt() -> UploadedFile {
        UploadedFile {
            file_name: "transfer.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, 0x50],
        }
    }

    #[tokio::test]
    async fn test_attach_to_missing_document_stores_nothing() {
        let mut documents = MockDocumentRepository::new();
        documents.expect_find_by_id().returning(|_| Ok(None));

        let mut justifications = MockJustificationRepository::new();
        justifications.expect_create().times(0);

        let mut blobs = MockBlobStore::new();
        blobs.expect_store().times(0);

        let uow = TestUnitOfWork {
            documents: Arc::new(documents),
            justifications: Arc::new(justifications),
            ..Default::default()
        };
        let service = JustificationManager::new(Arc::new(uow), Arc::new(blobs));

        let result = service
            .attach(&accountant(), Uuid::new_v4(), None, receipt())
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_for_missing_document_is_not_found() {
        let mut documents = MockDocumentRepository::new();
        documents.expect_find_by_id().returning(|_| Ok(None));

        let uow = TestUnitOfWork {
            documents: Arc::new(documents),
            ..Default::default()
        };
        let service = JustificationManager::new(Arc::new(uow), Arc::new(MockBlobStore::new()));

        let result = service.get_by_document(&accountant(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
