//! Document intake and review handlers.

use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{UploadForm, ValidatedJson};
use crate::api::middleware::CurrentPrincipal;
use crate::api::AppState;
use crate::config::MAX_UPLOAD_BYTES;
use crate::domain::{
    Document, DocumentCategory, DocumentDraft, DocumentEdit, DocumentMetadata, DocumentStatus,
    FileType, MetadataPatch, NewDocument,
};
use crate::errors::{AppError, AppResult};
use crate::types::{Created, ListQuery, NoContent, Paginated};

/// Manual add of a document whose file is already hosted
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDocumentRequest {
    /// Owning client; ignored when a client adds its own document
    pub client_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "March electricity invoice")]
    pub title: String,
    #[validate(length(min = 1, message = "File URL is required"))]
    pub file_url: String,
    /// MIME type or extension; stored as pdf, jpg, jpeg or png
    #[schema(example = "application/pdf")]
    pub file_type: String,
    pub category: DocumentCategory,
    pub metadata: DocumentMetadata,
}

/// Content edit; any edit sends the document back to `new`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub file_url: Option<String>,
    /// MIME type or extension
    pub file_type: Option<String>,
    pub category: Option<DocumentCategory>,
    /// Keys present here overwrite; absent keys keep their value
    pub metadata: Option<MetadataPatch>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusRequest {
    /// in_progress, processed or rejected
    pub status: DocumentStatus,
}

/// Multipart body of `POST /documents/upload`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadDocumentForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    pub title: String,
    #[schema(example = "Purchase")]
    pub category: String,
    #[schema(value_type = String, format = Date, example = "2024-03-31")]
    pub date: String,
    /// Required for staff uploads
    pub client_id: Option<Uuid>,
    /// Remaining metadata as a JSON object
    pub metadata: Option<String>,
}

pub fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents).post(create_document))
        .route(
            "/upload",
            post(upload_document).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/:id",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route("/:id/status", post(transition_document))
}

#[utoipa::path(
    get,
    path = "/documents",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Documents visible to the caller", body = crate::types::PaginatedDocuments)
    )
)]
pub async fn list_documents(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<Document>>> {
    let documents = state
        .services
        .documents()
        .list(&principal, query.search())
        .await?;

    Ok(Json(Paginated::from_items(documents, query.pagination())))
}

#[utoipa::path(
    post,
    path = "/documents",
    tag = "Documents",
    security(("bearer_auth" = [])),
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document added as new", body = Document),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Client not found or not visible")
    )
)]
pub async fn create_document(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    ValidatedJson(payload): ValidatedJson<CreateDocumentRequest>,
) -> AppResult<Created<Document>> {
    let input = NewDocument {
        title: payload.title,
        file_type: FileType::normalize(&payload.file_type)?,
        category: payload.category,
        metadata: payload.metadata,
    };

    let document = state
        .services
        .documents()
        .create(&principal, payload.client_id, input, payload.file_url)
        .await?;

    Ok(Created(document))
}

#[utoipa::path(
    post,
    path = "/documents/upload",
    tag = "Documents",
    security(("bearer_auth" = [])),
    request_body(content = UploadDocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored and document added", body = Document),
        (status = 400, description = "Missing field or unsupported file type"),
        (status = 404, description = "Client not found or not visible")
    )
)]
pub async fn upload_document(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    mut form: UploadForm,
) -> AppResult<Created<Document>> {
    let file = form.take_file()?;
    let client_id = form.parse::<Uuid>("client_id")?;

    let date = form
        .parse::<NaiveDate>("date")?
        .ok_or_else(|| AppError::validation("date is required"))?;
    let mut metadata = DocumentMetadata::dated(date);
    if let Some(extra) = form.json::<MetadataPatch>("metadata")? {
        metadata.merge(extra);
    }

    let draft = DocumentDraft {
        title: form.require("title")?.to_string(),
        category: form
            .parse::<DocumentCategory>("category")?
            .ok_or_else(|| AppError::validation("category is required"))?,
        metadata,
    };

    let document = state
        .services
        .documents()
        .upload(&principal, client_id, draft, file)
        .await?;

    Ok(Created(document))
}

#[utoipa::path(
    get,
    path = "/documents/{id}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document", body = Document),
        (status = 404, description = "Document not found or not visible")
    )
)]
pub async fn get_document(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Document>> {
    Ok(Json(state.services.documents().get(&principal, id).await?))
}

#[utoipa::path(
    put,
    path = "/documents/{id}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "Document edited and back to new", body = Document),
        (status = 404, description = "Document not found or not visible")
    )
)]
pub async fn update_document(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateDocumentRequest>,
) -> AppResult<Json<Document>> {
    let edit = DocumentEdit {
        title: payload.title,
        file_url: payload.file_url,
        file_type: payload
            .file_type
            .as_deref()
            .map(FileType::normalize)
            .transpose()?,
        category: payload.category,
        metadata: payload.metadata,
    };

    let document = state.services.documents().edit(&principal, id, edit).await?;
    Ok(Json(document))
}

#[utoipa::path(
    post,
    path = "/documents/{id}/status",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Document),
        (status = 404, description = "Document not found or not visible"),
        (status = 409, description = "Status cannot be set directly")
    )
)]
pub async fn transition_document(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<Document>> {
    let document = state
        .services
        .documents()
        .transition(&principal, id, payload.status)
        .await?;
    Ok(Json(document))
}

#[utoipa::path(
    delete,
    path = "/documents/{id}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document and justification deleted"),
        (status = 404, description = "Document not found or not visible")
    )
)]
pub async fn delete_document(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.documents().delete(&principal, id).await?;
    Ok(NoContent)
}
