//! Accountant management handlers (administrators only).

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentPrincipal;
use crate::api::AppState;
use crate::domain::{AccountantChanges, AccountantResponse, AccountantStatus, NewAccountant};
use crate::errors::AppResult;
use crate::types::{Created, ListQuery, NoContent, Paginated};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccountantRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@firm.example")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

/// Partial update; omitted fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountantRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub status: Option<AccountantStatus>,
}

pub fn accountant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accountants).post(create_accountant))
        .route(
            "/:id",
            get(get_accountant)
                .put(update_accountant)
                .delete(delete_accountant),
        )
}

#[utoipa::path(
    get,
    path = "/accountants",
    tag = "Accountants",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Accountants", body = crate::types::PaginatedAccountants),
        (status = 403, description = "Administrators only")
    )
)]
pub async fn list_accountants(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<AccountantResponse>>> {
    let accountants = state
        .services
        .accountants()
        .list(&principal, query.search())
        .await?;

    Ok(Json(
        Paginated::from_items(accountants, query.pagination()).map(AccountantResponse::from),
    ))
}

#[utoipa::path(
    post,
    path = "/accountants",
    tag = "Accountants",
    security(("bearer_auth" = [])),
    request_body = CreateAccountantRequest,
    responses(
        (status = 201, description = "Accountant created", body = AccountantResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_accountant(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    ValidatedJson(payload): ValidatedJson<CreateAccountantRequest>,
) -> AppResult<Created<AccountantResponse>> {
    let accountant = state
        .services
        .accountants()
        .create(
            &principal,
            NewAccountant {
                name: payload.name,
                email: payload.email,
                password: payload.password,
            },
        )
        .await?;

    Ok(Created(AccountantResponse::from(accountant)))
}

#[utoipa::path(
    get,
    path = "/accountants/{id}",
    tag = "Accountants",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Accountant ID")),
    responses(
        (status = 200, description = "Accountant", body = AccountantResponse),
        (status = 404, description = "Accountant not found")
    )
)]
pub async fn get_accountant(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountantResponse>> {
    let accountant = state.services.accountants().get(&principal, id).await?;
    Ok(Json(AccountantResponse::from(accountant)))
}

#[utoipa::path(
    put,
    path = "/accountants/{id}",
    tag = "Accountants",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Accountant ID")),
    request_body = UpdateAccountantRequest,
    responses(
        (status = 200, description = "Accountant updated", body = AccountantResponse),
        (status = 404, description = "Accountant not found"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_accountant(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAccountantRequest>,
) -> AppResult<Json<AccountantResponse>> {
    let accountant = state
        .services
        .accountants()
        .update(
            &principal,
            id,
            AccountantChanges {
                name: payload.name,
                email: payload.email,
                password: payload.password,
                status: payload.status,
            },
        )
        .await?;

    Ok(Json(AccountantResponse::from(accountant)))
}

#[utoipa::path(
    delete,
    path = "/accountants/{id}",
    tag = "Accountants",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Accountant ID")),
    responses(
        (status = 204, description = "Accountant deleted"),
        (status = 404, description = "Accountant not found")
    )
)]
pub async fn delete_accountant(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.accountants().delete(&principal, id).await?;
    Ok(NoContent)
}
