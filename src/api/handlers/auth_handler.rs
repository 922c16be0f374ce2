//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentPrincipal;
use crate::api::AppState;
use crate::domain::PrincipalResponse;
use crate::errors::AppResult;
use crate::services::TokenResponse;

/// Sign-in request, shared by the staff and client entry points
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@firm.example")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(sign_in))
        .route("/client/sign-in", post(client_sign_in))
}

/// Staff sign-in (administrators take precedence over accountants)
#[utoipa::path(
    post,
    path = "/auth/sign-in",
    tag = "Authentication",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account is not active"),
        (status = 404, description = "Unknown email")
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignInRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .services
        .auth()
        .sign_in(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}

/// Client sign-in; only accepted clients are let in
#[utoipa::path(
    post,
    path = "/auth/client/sign-in",
    tag = "Authentication",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Client is not accepted"),
        (status = 404, description = "Unknown email")
    )
)]
pub async fn client_sign_in(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignInRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .services
        .auth()
        .client_sign_in(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}

/// Who the bearer token belongs to
#[utoipa::path(
    get,
    path = "/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current principal", body = PrincipalResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<PrincipalResponse> {
    Json(PrincipalResponse::from(&principal))
}
