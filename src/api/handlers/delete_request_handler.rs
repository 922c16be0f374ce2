//! Client deletion request handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::middleware::CurrentPrincipal;
use crate::api::AppState;
use crate::domain::DeleteRequestView;
use crate::errors::AppResult;
use crate::types::{Created, ListQuery, Paginated};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDeleteRequest {
    pub client_id: Uuid,
}

pub fn delete_request_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_delete_requests).post(create_delete_request))
        .route("/:id/approve", post(approve_delete_request))
        .route("/:id/reject", post(reject_delete_request))
}

#[utoipa::path(
    get,
    path = "/delete-requests",
    tag = "Delete Requests",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "All requests for admins, own requests for accountants", body = crate::types::PaginatedDeleteRequests),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_delete_requests(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<DeleteRequestView>>> {
    let requests = state
        .services
        .delete_requests()
        .list(&principal, query.search())
        .await?;

    Ok(Json(Paginated::from_items(requests, query.pagination())))
}

#[utoipa::path(
    post,
    path = "/delete-requests",
    tag = "Delete Requests",
    security(("bearer_auth" = [])),
    request_body = CreateDeleteRequest,
    responses(
        (status = 201, description = "Deletion requested", body = DeleteRequestView),
        (status = 403, description = "Only the owning accountant may request deletion"),
        (status = 404, description = "Client not found or not visible"),
        (status = 409, description = "A request is already pending for this client")
    )
)]
pub async fn create_delete_request(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Json(payload): Json<CreateDeleteRequest>,
) -> AppResult<Created<DeleteRequestView>> {
    let request = state
        .services
        .delete_requests()
        .create(&principal, payload.client_id)
        .await?;
    Ok(Created(request))
}

/// Approve and delete the client with its documents
#[utoipa::path(
    post,
    path = "/delete-requests/{id}/approve",
    tag = "Delete Requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Delete request ID")),
    responses(
        (status = 200, description = "Approved; client removed", body = DeleteRequestView),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Delete request not found"),
        (status = 409, description = "Request already decided")
    )
)]
pub async fn approve_delete_request(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteRequestView>> {
    let request = state
        .services
        .delete_requests()
        .approve(&principal, id)
        .await?;
    Ok(Json(request))
}

#[utoipa::path(
    post,
    path = "/delete-requests/{id}/reject",
    tag = "Delete Requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Delete request ID")),
    responses(
        (status = 200, description = "Rejected; client untouched", body = DeleteRequestView),
        (status = 403, description = "Administrators only"),
        (status = 404, description = "Delete request not found"),
        (status = 409, description = "Request already decided")
    )
)]
pub async fn reject_delete_request(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteRequestView>> {
    let request = state
        .services
        .delete_requests()
        .reject(&principal, id)
        .await?;
    Ok(Json(request))
}
