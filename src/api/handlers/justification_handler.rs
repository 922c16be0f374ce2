//! Justification handlers, mounted under `/documents/{id}/justification`.

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    response::Json,
    routing::get,
    Router,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::UploadForm;
use crate::api::middleware::CurrentPrincipal;
use crate::api::AppState;
use crate::config::MAX_UPLOAD_BYTES;
use crate::domain::JustificationDocument;
use crate::errors::AppResult;
use crate::types::Created;

/// Multipart body for attaching a justification
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct AttachJustificationForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Defaults to the document title
    pub title: Option<String>,
}

pub fn justification_routes() -> Router<AppState> {
    Router::new().route(
        "/:id/justification",
        get(get_justification)
            .post(attach_justification)
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
    )
}

/// Attach a supporting file, replacing any previous one
#[utoipa::path(
    post,
    path = "/documents/{id}/justification",
    tag = "Justifications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body(content = AttachJustificationForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Justification attached", body = JustificationDocument),
        (status = 400, description = "Missing file or unsupported file type"),
        (status = 404, description = "Document not found or not visible")
    )
)]
pub async fn attach_justification(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    mut form: UploadForm,
) -> AppResult<Created<JustificationDocument>> {
    let file = form.take_file()?;
    let title = form.text("title").map(str::to_string);

    let justification = state
        .services
        .justifications()
        .attach(&principal, id, title, file)
        .await?;

    Ok(Created(justification))
}

#[utoipa::path(
    get,
    path = "/documents/{id}/justification",
    tag = "Justifications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Justification", body = JustificationDocument),
        (status = 404, description = "No justification, or document not visible")
    )
)]
pub async fn get_justification(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JustificationDocument>> {
    let justification = state
        .services
        .justifications()
        .get_by_document(&principal, id)
        .await?;
    Ok(Json(justification))
}
