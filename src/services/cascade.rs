//! Cascading deletes, run inside a Unit of Work transaction.
//!
//! Deleted rows report the file URLs they referenced so the caller can
//! drop the blobs once the transaction has committed.

use uuid::Uuid;

use crate::errors::AppResult;
use crate::infra::repositories::{ClientRepository, DocumentRepository, JustificationRepository};
use crate::infra::{BlobStore, DocumentScope, TransactionContext};

/// Remove a document and its justification.
///
/// Returns `None` when the document does not exist.
pub(crate) async fn delete_document(
    ctx: &TransactionContext<'_>,
    document_id: Uuid,
) -> AppResult<Option<Vec<String>>> {
    let Some(document) = ctx.documents().find_by_id(document_id).await? else {
        return Ok(None);
    };

    let mut files = vec![document.file_url];
    if let Some(justification) = ctx.justifications().delete_for_document(document_id).await? {
        files.push(justification.file_url);
    }
    ctx.documents().delete(document_id).await?;

    Ok(Some(files))
}

/// Remove a client, its documents and their justifications.
///
/// Returns `None` when the client does not exist.
pub(crate) async fn delete_client(
    ctx: &TransactionContext<'_>,
    client_id: Uuid,
) -> AppResult<Option<Vec<String>>> {
    if ctx.clients().find_by_id(client_id).await?.is_none() {
        return Ok(None);
    }

    let documents = ctx
        .documents()
        .list(DocumentScope::Clients(vec![client_id]))
        .await?;

    let mut files = Vec::with_capacity(documents.len());
    for document in documents {
        if let Some(justification) = ctx.justifications().delete_for_document(document.id).await? {
            files.push(justification.file_url);
        }
        files.push(document.file_url);
    }

    let removed = ctx.documents().delete_for_client(client_id).await?;
    ctx.clients().delete(client_id).await?;

    tracing::info!(client_id = %client_id, documents = removed, "Client deleted with its documents");
    Ok(Some(files))
}

/// Drop blobs that belong to this store; foreign URLs are left alone.
pub(crate) async fn discard_files(blobs: &dyn BlobStore, urls: &[String]) {
    for url in urls {
        if let Some(locator) = blobs.locator_from_url(url) {
            crate::infra::storage::discard_blob(blobs, &locator).await;
        }
    }
}
