//! Blob storage for uploaded files.
//!
//! The workflow only ever sees the public URL of a stored file. Locators
//! are opaque file names inside the upload directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::{Config, MAX_STORED_NAME_LENGTH, UPLOADS_ROUTE};
use crate::domain::FileType;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Blob storage collaborator.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist bytes and return a locator for them.
    async fn store(&self, bytes: Vec<u8>, suggested_name: &str) -> AppResult<String>;

    /// Public URL under which a locator is served.
    fn public_url(&self, locator: &str) -> String;

    /// Remove a stored blob. Removing a missing blob is not an error.
    async fn remove(&self, locator: &str) -> AppResult<()>;

    /// Recover the locator from a public URL produced by this store.
    fn locator_from_url(&self, url: &str) -> Option<String>;
}

/// Blob store writing into a local directory served under `/uploads`.
pub struct LocalBlobStore {
    root: PathBuf,
    public_prefix: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_prefix: format!("{}{}/", public_base_url.trim_end_matches('/'), UPLOADS_ROUTE),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.upload_dir.clone(), &config.public_base_url)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, locator: &str) -> AppResult<PathBuf> {
        if locator.is_empty() || locator.contains(['/', '\\']) || locator.starts_with('.') {
            return Err(AppError::BadRequest(format!("Invalid file locator '{}'", locator)));
        }
        Ok(self.root.join(locator))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, bytes: Vec<u8>, suggested_name: &str) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.root).await?;

        let locator = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(suggested_name));
        let path = self.path_for(&locator)?;
        tokio::fs::write(&path, &bytes).await?;

        tracing::debug!(locator = %locator, size = bytes.len(), "Stored upload");
        Ok(locator)
    }

    fn public_url(&self, locator: &str) -> String {
        format!("{}{}", self.public_prefix, locator)
    }

    async fn remove(&self, locator: &str) -> AppResult<()> {
        let path = self.path_for(locator)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(e)),
        }
    }

    fn locator_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_prefix)
            .filter(|locator| !locator.is_empty() && !locator.contains('/'))
            .map(str::to_string)
    }
}

/// A file received from a caller, not yet stored
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Normalized file type: the declared MIME type when present, else the
    /// file name's extension.
    pub fn file_type(&self) -> AppResult<FileType> {
        match self.content_type.as_deref() {
            Some(mime) if !mime.trim().is_empty() && mime != "application/octet-stream" => {
                FileType::normalize(mime)
            }
            _ => {
                let extension = Path::new(&self.file_name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default();
                FileType::normalize(extension)
            }
        }
    }
}

/// Reduce a client-supplied file name to a safe, bounded suffix.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    let bounded: String = trimmed.chars().take(MAX_STORED_NAME_LENGTH).collect();

    if bounded.is_empty() {
        "upload".to_string()
    } else {
        bounded
    }
}

/// Remove a blob after a failed database step. Failures are logged only.
pub async fn discard_blob(store: &dyn BlobStore, locator: &str) {
    if let Err(e) = store.remove(locator).await {
        tracing::warn!(locator = %locator, "Failed to remove orphaned upload: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("invoice march.pdf"), "invoice_march.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\scan.png"), "scan.png");
        assert_eq!(sanitize_file_name("..."), "upload");
        assert_eq!(sanitize_file_name(""), "upload");
        assert_eq!(sanitize_file_name(&"a".repeat(300)).len(), MAX_STORED_NAME_LENGTH);
    }

    #[test]
    fn test_public_url_round_trip() {
        let store = LocalBlobStore::new("/tmp/uploads", "http://files.example/");
        let url = store.public_url("abc-scan.png");
        assert_eq!(url, "http://files.example/uploads/abc-scan.png");
        assert_eq!(store.locator_from_url(&url).as_deref(), Some("abc-scan.png"));
        assert_eq!(store.locator_from_url("http://elsewhere/x.png"), None);
    }

    #[tokio::test]
    async fn test_store_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:3000");

        let locator = store.store(b"%PDF-1.4".to_vec(), "receipt.pdf").await.unwrap();
        assert!(locator.ends_with("-receipt.pdf"));

        let stored = tokio::fs::read(dir.path().join(&locator)).await.unwrap();
        assert_eq!(stored, b"%PDF-1.4");

        store.remove(&locator).await.unwrap();
        assert!(!dir.path().join(&locator).exists());

        // Second removal is a no-op
        store.remove(&locator).await.unwrap();
    }

    #[test]
    fn test_uploaded_file_type_prefers_mime() {
        let file = UploadedFile {
            file_name: "scan.pdf".to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: Vec::new(),
        };
        assert_eq!(file.file_type().unwrap(), FileType::Jpg);

        let octet = UploadedFile {
            content_type: Some("application/octet-stream".to_string()),
            ..file.clone()
        };
        assert_eq!(octet.file_type().unwrap(), FileType::Pdf);

        let gif = UploadedFile {
            file_name: "anim.gif".to_string(),
            content_type: None,
            bytes: Vec::new(),
        };
        assert!(matches!(gif.file_type(), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rejects_path_locators() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:3000");
        assert!(matches!(
            store.remove("../secret").await,
            Err(AppError::BadRequest(_))
        ));
    }
}
