//! Shared fixtures: an in-memory SQLite database with migrations applied,
//! services wired over it, and helpers that seed principals.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;
use uuid::Uuid;

use doc_intake::config::Config;
use doc_intake::domain::{
    ClientDecision, ClientView, Document, DocumentCategory, DocumentMetadata, FileType, Identity,
    NewAccountant, NewClient, NewDocument, Principal,
};
use doc_intake::infra::{BlobStore, Database, LocalBlobStore, Migrator, Persistence};
use doc_intake::services::{ServiceContainer, Services};

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const PASSWORD: &str = "SecurePass123!";

pub struct TestContext {
    pub db: DatabaseConnection,
    pub services: Arc<Services>,
    pub blobs: Arc<LocalBlobStore>,
    pub config: Config,
    pub admin: Principal,
    // Keeps the upload directory alive for the test
    pub uploads: TempDir,
}

pub async fn connect() -> DatabaseConnection {
    // One connection: every handle must see the same in-memory database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = SeaDatabase::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn setup() -> TestContext {
    let db = connect().await;
    let uploads = tempfile::tempdir().unwrap();
    let config = Config::new("sqlite::memory:", JWT_SECRET, uploads.path());

    let blobs = Arc::new(LocalBlobStore::from_config(&config));
    let blob_store: Arc<dyn BlobStore> = blobs.clone();
    let services = Arc::new(Services::new(
        Arc::new(Persistence::new(db.clone())),
        blob_store,
        config.clone(),
    ));

    let admin = services
        .auth()
        .create_admin("Root".to_string(), "root@firm.example".to_string(), PASSWORD.to_string())
        .await
        .unwrap();

    TestContext {
        db,
        services,
        blobs,
        config,
        admin: Principal::Admin(admin.identity()),
        uploads,
    }
}

impl TestContext {
    pub fn database(&self) -> Arc<Database> {
        Arc::new(Database::from_connection(self.db.clone()))
    }

    pub async fn accountant(&self, name: &str) -> Principal {
        let accountant = self
            .services
            .accountants()
            .create(
                &self.admin,
                NewAccountant {
                    name: name.to_string(),
                    email: format!("{}@firm.example", name.to_lowercase()),
                    password: PASSWORD.to_string(),
                },
            )
            .await
            .unwrap();
        Principal::Accountant(accountant.identity())
    }

    /// Register a client for the accountant, accepted unless told otherwise.
    pub async fn client(&self, owner: &Principal, name: &str, accept: bool) -> ClientView {
        let client = self
            .services
            .clients()
            .create(
                owner,
                NewClient {
                    name: name.to_string(),
                    email: format!("{}@clients.example", name.to_lowercase()),
                    password: PASSWORD.to_string(),
                    accountant_id: None,
                },
            )
            .await
            .unwrap();

        if !accept {
            return client;
        }
        self.services
            .clients()
            .decide(owner, client.id, ClientDecision::Accept)
            .await
            .unwrap()
    }

    pub async fn document(&self, actor: &Principal, client_id: Uuid, title: &str) -> Document {
        self.services
            .documents()
            .create(
                actor,
                Some(client_id),
                sample_document(title),
                format!("https://files.example/{}.pdf", title.to_lowercase()),
            )
            .await
            .unwrap()
    }
}

pub fn client_principal(client: &ClientView) -> Principal {
    Principal::Client(Identity {
        id: client.id,
        name: client.name.clone(),
        email: client.email.clone(),
    })
}

pub fn sample_metadata() -> DocumentMetadata {
    let mut metadata = DocumentMetadata::dated(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    metadata.amount = Some(Decimal::new(24990, 2));
    metadata.currency = Some("EUR".to_string());
    metadata.party_name = Some("Power & Light".to_string());
    metadata.reference = Some("INV-2024-031".to_string());
    metadata
}

pub fn sample_document(title: &str) -> NewDocument {
    NewDocument {
        title: title.to_string(),
        file_type: FileType::Pdf,
        category: DocumentCategory::Purchase,
        metadata: sample_metadata(),
    }
}
