//! Multipart form extractor for file uploads.

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};

use crate::config::UPLOAD_FILE_FIELD;
use crate::errors::{AppError, AppResult};
use crate::infra::UploadedFile;

/// A multipart body: at most one file part plus plain text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

#[async_trait]
impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let mut form = UploadForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == UPLOAD_FILE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;

                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }
}

impl UploadForm {
    /// Optional text field; blank values count as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn require(&self, name: &str) -> AppResult<&str> {
        self.text(name)
            .ok_or_else(|| AppError::validation(format!("{} is required", name)))
    }

    /// Optional field parsed with `FromStr`.
    pub fn parse<T>(&self, name: &str) -> AppResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| AppError::validation(format!("Invalid {}: {}", name, e)))
            })
            .transpose()
    }

    /// Optional field holding a JSON document.
    pub fn json<T: serde::de::DeserializeOwned>(&self, name: &str) -> AppResult<Option<T>> {
        self.text(name)
            .map(|raw| {
                serde_json::from_str(raw)
                    .map_err(|e| AppError::validation(format!("Invalid {}: {}", name, e)))
            })
            .transpose()
    }

    pub fn take_file(&mut self) -> AppResult<UploadedFile> {
        self.file
            .take()
            .ok_or_else(|| AppError::validation(format!("{} is required", UPLOAD_FILE_FIELD)))
    }
}
