//! Authentication service - Sign-in entry points and token handling.
//!
//! Two entry points exist: staff (admins, then accountants) and clients.
//! Both issue the same bearer token; the token's role decides which
//! principal kind a request acts as.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{
    confirm_accountant, confirm_admin, confirm_client, normalize_email, resolve_client,
    resolve_staff, Admin, Identity, Password, Principal, PrincipalResponse, Role,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    /// Who the token was issued to
    pub principal: PrincipalResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Staff sign-in: admins take precedence over accountants
    async fn sign_in(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Client sign-in; only accepted clients get in
    async fn client_sign_in(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify a bearer token and reload the principal it was issued to.
    /// Deleted accounts are unauthorized; deactivated accountants and
    /// clients no longer accepted are forbidden.
    async fn verify_token(&self, token: &str) -> AppResult<Principal>;

    /// Seed an administrator (CLI only)
    async fn create_admin(&self, name: String, email: String, password: String) -> AppResult<Admin>;
}

/// Sign a token for a principal.
fn generate_token(principal: &Principal, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);
    let identity = principal.identity();

    let claims = Claims {
        sub: identity.id,
        name: identity.name.clone(),
        email: identity.email.clone(),
        role: principal.role().to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
        principal: PrincipalResponse::from(principal),
    })
}

fn principal_from_token(token: &str, config: &Config) -> AppResult<Principal> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        AppError::Unauthorized
    })?
    .claims;

    let role: Role = claims.role.parse()?;
    Ok(Principal::new(
        role,
        Identity {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
        },
    ))
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn sign_in(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let email = normalize_email(&email);
        let admins = self.uow.admins();
        let accountants = self.uow.accountants();

        let (admin, accountant) = futures::try_join!(
            admins.find_by_email(&email),
            accountants.find_by_email(&email)
        )?;

        let principal = resolve_staff(admin.as_ref(), accountant.as_ref(), &password)?;
        tracing::info!(principal_id = %principal.id(), role = %principal.role(), "Staff signed in");

        generate_token(&principal, &self.config)
    }

    async fn client_sign_in(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let email = normalize_email(&email);
        let client = self.uow.clients().find_by_email(&email).await?;

        let principal = resolve_client(client.as_ref(), &password)?;
        tracing::info!(principal_id = %principal.id(), "Client signed in");

        generate_token(&principal, &self.config)
    }

    async fn verify_token(&self, token: &str) -> AppResult<Principal> {
        let claimed = principal_from_token(token, &self.config)?;
        let id = claimed.id();

        let current = match claimed.role() {
            Role::Admin => confirm_admin(self.uow.admins().find_by_id(id).await?.as_ref()),
            Role::Accountant => {
                confirm_accountant(self.uow.accountants().find_by_id(id).await?.as_ref())
            }
            Role::Client => confirm_client(self.uow.clients().find_by_id(id).await?.as_ref()),
        };

        if let Err(e) = &current {
            tracing::debug!(principal_id = %id, role = %claimed.role(), "Token no longer honoured: {}", e);
        }
        current
    }

    async fn create_admin(&self, name: String, email: String, password: String) -> AppResult<Admin> {
        let admin = Admin {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: normalize_email(&email),
            password_hash: Password::new(&password)?.into_string(),
            created_at: Utc::now(),
        };

        let admin = self.uow.admins().create(admin).await?;
        tracing::info!(admin_id = %admin.id, "Admin created");
        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::{Accountant, AccountantStatus};
    use crate::infra::repositories::MockAccountantRepository;
    use crate::services::testing::TestUnitOfWork;

    fn config() -> Config {
        Config::new("sqlite::memory:", "test-secret-key-for-testing-only-32chars", "/tmp")
    }

    fn identity() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@firm.example".to_string(),
        }
    }

    #[test]
    fn test_token_round_trip_keeps_role() {
        let config = config();
        for principal in [
            Principal::Admin(identity()),
            Principal::Accountant(identity()),
            Principal::Client(identity()),
        ] {
            let token = generate_token(&principal, &config).unwrap();
            let restored = principal_from_token(&token.access_token, &config).unwrap();
            assert_eq!(restored, principal);
        }
    }

    fn accountant(status: AccountantStatus) -> Accountant {
        Accountant {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@firm.example".to_string(),
            password_hash: "hash".to_string(),
            status,
            created_at: Utc::now(),
        }
    }

    fn authenticator(accountants: MockAccountantRepository) -> Authenticator<TestUnitOfWork> {
        let uow = TestUnitOfWork {
            accountants: Arc::new(accountants),
            ..Default::default()
        };
        Authenticator::new(Arc::new(uow), config())
    }

    #[tokio::test]
    async fn test_verify_token_reloads_accountant() {
        let stored = accountant(AccountantStatus::Active);
        let stale = Principal::Accountant(Identity {
            id: stored.id,
            name: "Old Name".to_string(),
            email: "old@firm.example".to_string(),
        });
        let token = generate_token(&stale, &config()).unwrap();

        let mut accountants = MockAccountantRepository::new();
        let found = stored.clone();
        accountants
            .expect_find_by_id()
            .with(eq(stored.id))
            .returning(move |_| Ok(Some(found.clone())));

        let principal = authenticator(accountants)
            .verify_token(&token.access_token)
            .await
            .unwrap();
        assert_eq!(principal, Principal::Accountant(stored.identity()));
    }

    #[tokio::test]
    async fn test_verify_token_refuses_inactive_or_missing_accountant() {
        let inactive = accountant(AccountantStatus::Inactive);
        let token = generate_token(&Principal::Accountant(inactive.identity()), &config()).unwrap();

        let mut accountants = MockAccountantRepository::new();
        accountants
            .expect_find_by_id()
            .returning(move |_| Ok(Some(inactive.clone())));
        let result = authenticator(accountants).verify_token(&token.access_token).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let mut accountants = MockAccountantRepository::new();
        accountants.expect_find_by_id().returning(|_| Ok(None));
        let result = authenticator(accountants).verify_token(&token.access_token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_foreign_token_is_unauthorized() {
        let principal = Principal::Admin(identity());
        let token = generate_token(&principal, &config()).unwrap();

        let other = Config::new("sqlite::memory:", "another-secret-key-that-is-32-chars!", "/tmp");
        assert!(matches!(
            principal_from_token(&token.access_token, &other),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            principal_from_token("garbage", &other),
            Err(AppError::Unauthorized)
        ));
    }
}
