//! Client registration and review handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentPrincipal;
use crate::api::AppState;
use crate::domain::{ClientDecision, ClientEdit, ClientView, NewClient};
use crate::errors::AppResult;
use crate::types::{Created, ListQuery, NoContent, Paginated};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Acme Bakery")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "owner@acme.example")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Owning accountant; required when an administrator creates the client
    pub accountant_id: Option<Uuid>,
}

/// Name/email edit; any edit sends the client back to review
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClientRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route(
            "/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/:id/accept", post(accept_client))
        .route("/:id/reject", post(reject_client))
}

#[utoipa::path(
    get,
    path = "/clients",
    tag = "Clients",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Clients visible to the caller", body = crate::types::PaginatedClients),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_clients(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<ClientView>>> {
    let clients = state
        .services
        .clients()
        .list(&principal, query.search())
        .await?;

    Ok(Json(Paginated::from_items(clients, query.pagination())))
}

#[utoipa::path(
    post,
    path = "/clients",
    tag = "Clients",
    security(("bearer_auth" = [])),
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client registered as pending", body = ClientView),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_client(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    ValidatedJson(payload): ValidatedJson<CreateClientRequest>,
) -> AppResult<Created<ClientView>> {
    let client = state
        .services
        .clients()
        .create(
            &principal,
            NewClient {
                name: payload.name,
                email: payload.email,
                password: payload.password,
                accountant_id: payload.accountant_id,
            },
        )
        .await?;

    Ok(Created(client))
}

#[utoipa::path(
    get,
    path = "/clients/{id}",
    tag = "Clients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client", body = ClientView),
        (status = 404, description = "Client not found or not visible")
    )
)]
pub async fn get_client(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ClientView>> {
    Ok(Json(state.services.clients().get(&principal, id).await?))
}

#[utoipa::path(
    put,
    path = "/clients/{id}",
    tag = "Clients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Client ID")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client edited and back to pending", body = ClientView),
        (status = 404, description = "Client not found or not visible"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_client(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateClientRequest>,
) -> AppResult<Json<ClientView>> {
    let client = state
        .services
        .clients()
        .edit(
            &principal,
            id,
            ClientEdit {
                name: payload.name,
                email: payload.email,
            },
        )
        .await?;

    Ok(Json(client))
}

#[utoipa::path(
    post,
    path = "/clients/{id}/accept",
    tag = "Clients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client accepted", body = ClientView),
        (status = 404, description = "Client not found or not visible")
    )
)]
pub async fn accept_client(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ClientView>> {
    let client = state
        .services
        .clients()
        .decide(&principal, id, ClientDecision::Accept)
        .await?;
    Ok(Json(client))
}

#[utoipa::path(
    post,
    path = "/clients/{id}/reject",
    tag = "Clients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client rejected", body = ClientView),
        (status = 404, description = "Client not found or not visible")
    )
)]
pub async fn reject_client(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ClientView>> {
    let client = state
        .services
        .clients()
        .decide(&principal, id, ClientDecision::Reject)
        .await?;
    Ok(Json(client))
}

/// Direct removal with cascade; accountants go through a delete request
#[utoipa::path(
    delete,
    path = "/clients/{id}",
    tag = "Clients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Client and its documents deleted"),
        (status = 403, description = "Deletion requires an approved delete request"),
        (status = 404, description = "Client not found or not visible")
    )
)]
pub async fn delete_client(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.clients().delete(&principal, id).await?;
    Ok(NoContent)
}
