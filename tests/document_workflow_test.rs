//! Document intake, review and justification linkage against in-memory
//! SQLite and a blob store in a temporary directory.

mod common;

use chrono::NaiveDate;
use doc_intake::domain::{
    DocumentCategory, DocumentDraft, DocumentEdit, DocumentStatus, FileType, MetadataPatch,
};
use doc_intake::errors::AppError;
use doc_intake::infra::{BlobStore, UploadedFile};
use doc_intake::services::ServiceContainer;
use rust_decimal::Decimal;
use uuid::Uuid;

use common::{client_principal, sample_metadata, setup};

fn pdf(name: &str) -> UploadedFile {
    UploadedFile {
        file_name: name.to_string(),
        content_type: Some("application/pdf".to_string()),
        bytes: b"%PDF-1.7 test".to_vec(),
    }
}

fn draft(title: &str) -> DocumentDraft {
    DocumentDraft {
        title: title.to_string(),
        category: DocumentCategory::Purchase,
        metadata: sample_metadata(),
    }
}

fn stored_path(ctx: &common::TestContext, url: &str) -> std::path::PathBuf {
    let locator = ctx.blobs.locator_from_url(url).expect("url from local store");
    ctx.blobs.root().join(locator)
}

#[tokio::test]
async fn test_document_review_scenario() {
    let ctx = setup().await;
    let accountant = ctx.accountant("Ada").await;
    let client_view = ctx.client(&accountant, "Acme", true).await;
    let client = client_principal(&client_view);
    let documents = ctx.services.documents();
    let justifications = ctx.services.justifications();

    // Client uploads an invoice; ownership comes from the token
    let document = documents
        .upload(&client, None, draft("March electricity"), pdf("march.pdf"))
        .await
        .unwrap();
    assert_eq!(document.status, DocumentStatus::New);
    assert_eq!(document.client_id, client_view.id);
    assert_eq!(document.assigned_accountant_id, accountant.id());
    assert_eq!(document.file_type, FileType::Pdf);
    assert!(stored_path(&ctx, &document.file_url).exists());

    // Accountant attaches a justification; title defaults to the document's
    let justification = justifications
        .attach(&accountant, document.id, None, pdf("receipt.pdf"))
        .await
        .unwrap();
    assert_eq!(justification.document_id, document.id);
    assert_eq!(justification.title, "March electricity");

    let linked = justifications.get_by_document(&client, document.id).await.unwrap();
    assert_eq!(linked.id, justification.id);

    // Attaching to a missing document stores nothing
    let missing = justifications
        .attach(&accountant, Uuid::new_v4(), None, pdf("stray.pdf"))
        .await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    // Review, then an edit restarts it with other metadata kept
    let processed = documents
        .transition(&accountant, document.id, DocumentStatus::Processed)
        .await
        .unwrap();
    assert_eq!(processed.status, DocumentStatus::Processed);

    let edited = documents
        .edit(
            &accountant,
            document.id,
            DocumentEdit {
                metadata: Some(MetadataPatch {
                    party_name: Some("Grid Power Ltd".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.status, DocumentStatus::New);
    assert_eq!(edited.metadata.party_name.as_deref(), Some("Grid Power Ltd"));
    assert_eq!(edited.metadata.reference.as_deref(), Some("INV-2024-031"));
    assert_eq!(edited.metadata.amount, Some(Decimal::new(24990, 2)));
    assert_eq!(edited.metadata.date, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());

    // Replacing the justification removes the old file
    let replacement = justifications
        .attach(
            &accountant,
            document.id,
            Some("Corrected receipt".to_string()),
            pdf("receipt-v2.pdf"),
        )
        .await
        .unwrap();
    assert_eq!(replacement.title, "Corrected receipt");
    assert!(!stored_path(&ctx, &justification.file_url).exists());
    assert!(stored_path(&ctx, &replacement.file_url).exists());

    let current = justifications.get_by_document(&accountant, document.id).await.unwrap();
    assert_eq!(current.id, replacement.id);
}

#[tokio::test]
async fn test_document_cannot_be_moved_back_to_new() {
    let ctx = setup().await;
    let accountant = ctx.accountant("Ada").await;
    let client = ctx.client(&accountant, "Acme", true).await;
    let document = ctx.document(&accountant, client.id, "Invoice").await;

    let result = ctx
        .services
        .documents()
        .transition(&accountant, document.id, DocumentStatus::New)
        .await;
    assert!(matches!(result, Err(AppError::InvalidTransition(_))));

    // Review statuses are freely reachable from each other
    for status in [
        DocumentStatus::Rejected,
        DocumentStatus::InProgress,
        DocumentStatus::Processed,
        DocumentStatus::Rejected,
    ] {
        let moved = ctx
            .services
            .documents()
            .transition(&ctx.admin, document.id, status)
            .await
            .unwrap();
        assert_eq!(moved.status, status);
    }
}

#[tokio::test]
async fn test_client_cannot_review_or_edit() {
    let ctx = setup().await;
    let accountant = ctx.accountant("Ada").await;
    let view = ctx.client(&accountant, "Acme", true).await;
    let client = client_principal(&view);
    let document = ctx.document(&client, view.id, "Receipt").await;
    let documents = ctx.services.documents();

    assert!(matches!(
        documents.transition(&client, document.id, DocumentStatus::Processed).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        documents.edit(&client, document.id, DocumentEdit::default()).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        documents.delete(&client, document.id).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_client_document_ownership_ignores_requested_client() {
    let ctx = setup().await;
    let accountant = ctx.accountant("Ada").await;
    let mine = ctx.client(&accountant, "Acme", true).await;
    let other = ctx.client(&accountant, "Bolt", true).await;

    let document = ctx.document(&client_principal(&mine), other.id, "Receipt").await;
    assert_eq!(document.client_id, mine.id);
}

#[tokio::test]
async fn test_document_visibility_follows_client_ownership() {
    let ctx = setup().await;
    let ada = ctx.accountant("Ada").await;
    let bob = ctx.accountant("Bob").await;
    let acme = ctx.client(&ada, "Acme", true).await;
    let bolt = ctx.client(&bob, "Bolt", true).await;

    let ada_doc = ctx.document(&ada, acme.id, "Acme invoice").await;
    let bob_doc = ctx.document(&bob, bolt.id, "Bolt invoice").await;
    let documents = ctx.services.documents();

    let visible = documents.list(&ada, None).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, ada_doc.id);

    assert_eq!(documents.list(&ctx.admin, None).await.unwrap().len(), 2);

    let own = documents.list(&client_principal(&bolt), None).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].id, bob_doc.id);

    // Out of scope reads as missing, for every kind of access
    assert!(matches!(documents.get(&ada, bob_doc.id).await, Err(AppError::NotFound)));
    assert!(matches!(
        documents.transition(&ada, bob_doc.id, DocumentStatus::Processed).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        documents.get(&client_principal(&acme), bob_doc.id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        ctx.services.clients().get(&ada, bolt.id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        documents.create(&ada, Some(bolt.id), common::sample_document("Sneaky"), "x".into()).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_document_search() {
    let ctx = setup().await;
    let accountant = ctx.accountant("Ada").await;
    let client = ctx.client(&accountant, "Acme", true).await;
    ctx.document(&accountant, client.id, "Electricity").await;
    ctx.document(&accountant, client.id, "Rent").await;
    let documents = ctx.services.documents();

    let hits = documents.list(&accountant, Some("RENT")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Rent");

    // Metadata fields are searched too
    let by_party = documents.list(&accountant, Some("power & light")).await.unwrap();
    assert_eq!(by_party.len(), 2);

    let blank = documents.list(&accountant, Some("   ")).await.unwrap();
    assert_eq!(blank.len(), 2);
}

#[tokio::test]
async fn test_deleting_document_removes_justification_and_files() {
    let ctx = setup().await;
    let accountant = ctx.accountant("Ada").await;
    let view = ctx.client(&accountant, "Acme", true).await;
    let documents = ctx.services.documents();
    let justifications = ctx.services.justifications();

    let document = documents
        .upload(&accountant, Some(view.id), draft("Invoice"), pdf("invoice.pdf"))
        .await
        .unwrap();
    let justification = justifications
        .attach(&accountant, document.id, None, pdf("proof.pdf"))
        .await
        .unwrap();

    documents.delete(&accountant, document.id).await.unwrap();

    assert!(matches!(documents.get(&accountant, document.id).await, Err(AppError::NotFound)));
    assert!(!stored_path(&ctx, &document.file_url).exists());
    assert!(!stored_path(&ctx, &justification.file_url).exists());
}

#[tokio::test]
async fn test_client_removal_cascades_to_documents() {
    let ctx = setup().await;
    let accountant = ctx.accountant("Ada").await;
    let view = ctx.client(&accountant, "Acme", true).await;
    let documents = ctx.services.documents();

    let document = documents
        .upload(&accountant, Some(view.id), draft("Invoice"), pdf("invoice.pdf"))
        .await
        .unwrap();
    let justification = ctx
        .services
        .justifications()
        .attach(&accountant, document.id, None, pdf("proof.pdf"))
        .await
        .unwrap();

    let requests = ctx.services.delete_requests();
    let request = requests.create(&accountant, view.id).await.unwrap();
    requests.approve(&ctx.admin, request.id).await.unwrap();

    assert!(documents.list(&ctx.admin, None).await.unwrap().is_empty());
    assert!(!stored_path(&ctx, &document.file_url).exists());
    assert!(!stored_path(&ctx, &justification.file_url).exists());
    assert!(matches!(
        ctx.services.justifications().get_by_document(&ctx.admin, document.id).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_upload_rejects_unsupported_type() {
    let ctx = setup().await;
    let accountant = ctx.accountant("Ada").await;
    let view = ctx.client(&accountant, "Acme", true).await;

    let result = ctx
        .services
        .documents()
        .upload(
            &accountant,
            Some(view.id),
            draft("Notes"),
            UploadedFile {
                file_name: "notes.txt".to_string(),
                content_type: Some("text/plain".to_string()),
                bytes: b"hello".to_vec(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let leftovers = std::fs::read_dir(ctx.blobs.root())
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_successive_metadata_edits_accumulate() {
    let ctx = setup().await;
    let accountant = ctx.accountant("Ada").await;
    let client = ctx.client(&accountant, "Acme", true).await;
    let document = ctx.document(&accountant, client.id, "Invoice").await;
    let documents = ctx.services.documents();

    let patch = |metadata: MetadataPatch| DocumentEdit {
        metadata: Some(metadata),
        ..Default::default()
    };

    documents
        .edit(
            &accountant,
            document.id,
            patch(MetadataPatch {
                reference: Some("INV-2024-099".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
    documents
        .transition(&ctx.admin, document.id, DocumentStatus::InProgress)
        .await
        .unwrap();
    documents
        .edit(
            &ctx.admin,
            document.id,
            patch(MetadataPatch {
                currency: Some("USD".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

    let stored = documents.get(&accountant, document.id).await.unwrap();
    assert_eq!(stored.metadata.reference.as_deref(), Some("INV-2024-099"));
    assert_eq!(stored.metadata.currency.as_deref(), Some("USD"));
    assert_eq!(stored.metadata.party_name.as_deref(), Some("Power & Light"));
    assert_eq!(stored.status, DocumentStatus::New);
}
