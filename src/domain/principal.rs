//! Principals and sign-in resolution.
//!
//! Admins, accountants and clients live in three disjoint identity spaces.
//! The staff entry point consults admins before accountants, following
//! [`STAFF_SIGN_IN_PRECEDENCE`]; clients sign in through their own entry
//! point and are never reached from the staff one.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Accountant, Admin, Client, Password};
use crate::config::{ROLE_ACCOUNTANT, ROLE_ADMIN, ROLE_CLIENT};
use crate::errors::{AppError, AppResult};

/// Principal role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Accountant,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Accountant => ROLE_ACCOUNTANT,
            Role::Client => ROLE_CLIENT,
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_ACCOUNTANT => Ok(Role::Accountant),
            ROLE_CLIENT => Ok(Role::Client),
            _ => Err(AppError::Unauthorized),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Staff sign-in precedence: an email present in several spaces
/// resolves to the first role listed here.
pub const STAFF_SIGN_IN_PRECEDENCE: [Role; 2] = [Role::Admin, Role::Accountant];

/// Who a principal is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// An authenticated actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Admin(Identity),
    Accountant(Identity),
    Client(Identity),
}

impl Principal {
    pub fn new(role: Role, identity: Identity) -> Self {
        match role {
            Role::Admin => Principal::Admin(identity),
            Role::Accountant => Principal::Accountant(identity),
            Role::Client => Principal::Client(identity),
        }
    }

    pub fn identity(&self) -> &Identity {
        match self {
            Principal::Admin(identity)
            | Principal::Accountant(identity)
            | Principal::Client(identity) => identity,
        }
    }

    pub fn id(&self) -> Uuid {
        self.identity().id
    }

    pub fn role(&self) -> Role {
        match self {
            Principal::Admin(_) => Role::Admin,
            Principal::Accountant(_) => Role::Accountant,
            Principal::Client(_) => Role::Client,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin(_))
    }
}

/// Principal summary returned to callers
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrincipalResponse {
    pub id: Uuid,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@firm.example")]
    pub email: String,
    pub role: Role,
}

impl From<&Principal> for PrincipalResponse {
    fn from(principal: &Principal) -> Self {
        let identity = principal.identity();
        Self {
            id: identity.id,
            name: identity.name.clone(),
            email: identity.email.clone(),
            role: principal.role(),
        }
    }
}

/// Canonical form used for every email write and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Resolve the staff entry point from the candidates found for one email.
///
/// Status checks run before the password check so an inactive accountant
/// learns why sign-in is refused.
pub fn resolve_staff(
    admin: Option<&Admin>,
    accountant: Option<&Accountant>,
    password: &str,
) -> AppResult<Principal> {
    for role in STAFF_SIGN_IN_PRECEDENCE {
        match role {
            Role::Admin => {
                if let Some(admin) = admin {
                    Password::from_hash(admin.password_hash.as_str()).check(password)?;
                    return Ok(Principal::Admin(admin.identity()));
                }
            }
            Role::Accountant => {
                if let Some(accountant) = accountant {
                    if !accountant.status.is_active() {
                        return Err(AppError::forbidden("Account is not active"));
                    }
                    Password::from_hash(accountant.password_hash.as_str()).check(password)?;
                    return Ok(Principal::Accountant(accountant.identity()));
                }
            }
            Role::Client => {}
        }
    }

    Err(AppError::NotFound)
}

/// Resolve the client entry point.
pub fn resolve_client(client: Option<&Client>, password: &str) -> AppResult<Principal> {
    let client = client.ok_or(AppError::NotFound)?;
    if !client.can_sign_in() {
        return Err(AppError::forbidden("Account has not been accepted"));
    }
    Password::from_hash(client.password_hash.as_str()).check(password)?;
    Ok(Principal::Client(client.identity()))
}

/// Re-check a bearer token against the records it names.
///
/// Tokens outlive account changes, so every request looks the principal up
/// again: a record that is gone no longer authenticates, and an account
/// that lost its standing is refused the same way sign-in would refuse it.
/// The identity comes from the stored record, not the token.
pub fn confirm_admin(admin: Option<&Admin>) -> AppResult<Principal> {
    let admin = admin.ok_or(AppError::Unauthorized)?;
    Ok(Principal::Admin(admin.identity()))
}

/// See [`confirm_admin`].
pub fn confirm_accountant(accountant: Option<&Accountant>) -> AppResult<Principal> {
    let accountant = accountant.ok_or(AppError::Unauthorized)?;
    if !accountant.status.is_active() {
        return Err(AppError::forbidden("Account is not active"));
    }
    Ok(Principal::Accountant(accountant.identity()))
}

/// See [`confirm_admin`].
pub fn confirm_client(client: Option<&Client>) -> AppResult<Principal> {
    let client = client.ok_or(AppError::Unauthorized)?;
    if !client.can_sign_in() {
        return Err(AppError::forbidden("Account has not been accepted"));
    }
    Ok(Principal::Client(client.identity()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{AccountantStatus, ClientStatus};

    const PASSWORD: &str = "correct-horse";

    fn hash() -> String {
        Password::new(PASSWORD).unwrap().into_string()
    }

    fn admin(email: &str) -> Admin {
        Admin {
            id: Uuid::new_v4(),
            name: "Root".to_string(),
            email: email.to_string(),
            password_hash: hash(),
            created_at: Utc::now(),
        }
    }

    fn accountant(email: &str, status: AccountantStatus) -> Accountant {
        Accountant {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: email.to_string(),
            password_hash: hash(),
            status,
            created_at: Utc::now(),
        }
    }

    fn client(status: ClientStatus) -> Client {
        Client {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            email: "acme@example.com".to_string(),
            password_hash: hash(),
            status,
            accountant_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_wins_email_collision() {
        let a = admin("shared@example.com");
        let acc = accountant("shared@example.com", AccountantStatus::Active);
        let principal = resolve_staff(Some(&a), Some(&acc), PASSWORD).unwrap();
        assert_eq!(principal, Principal::Admin(a.identity()));
    }

    #[test]
    fn test_admin_wrong_password_does_not_fall_through() {
        let a = admin("shared@example.com");
        let acc = accountant("shared@example.com", AccountantStatus::Active);
        let result = resolve_staff(Some(&a), Some(&acc), "wrong-password");
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_inactive_accountant_is_forbidden_before_password_check() {
        let acc = accountant("ada@example.com", AccountantStatus::Inactive);
        let result = resolve_staff(None, Some(&acc), "not-even-the-password");
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_active_accountant_signs_in() {
        let acc = accountant("ada@example.com", AccountantStatus::Active);
        let principal = resolve_staff(None, Some(&acc), PASSWORD).unwrap();
        assert_eq!(principal.role(), Role::Accountant);
        assert_eq!(principal.id(), acc.id);
    }

    #[test]
    fn test_unknown_staff_email() {
        assert!(matches!(resolve_staff(None, None, PASSWORD), Err(AppError::NotFound)));
    }

    #[test]
    fn test_client_requires_accepted_status() {
        for status in [ClientStatus::Pending, ClientStatus::Rejected] {
            let c = client(status);
            assert!(matches!(resolve_client(Some(&c), PASSWORD), Err(AppError::Forbidden(_))));
        }
        let c = client(ClientStatus::Accepted);
        assert_eq!(resolve_client(Some(&c), PASSWORD).unwrap().role(), Role::Client);
        assert!(matches!(
            resolve_client(Some(&c), "bad-password"),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_confirm_rejects_vanished_records() {
        assert!(matches!(confirm_admin(None), Err(AppError::Unauthorized)));
        assert!(matches!(confirm_accountant(None), Err(AppError::Unauthorized)));
        assert!(matches!(confirm_client(None), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_confirm_applies_current_standing() {
        let inactive = accountant("ada@example.com", AccountantStatus::Inactive);
        assert!(matches!(confirm_accountant(Some(&inactive)), Err(AppError::Forbidden(_))));

        let mut active = accountant("ada@example.com", AccountantStatus::Active);
        active.name = "Ada Renamed".to_string();
        let principal = confirm_accountant(Some(&active)).unwrap();
        assert_eq!(principal.identity().name, "Ada Renamed");

        for status in [ClientStatus::Pending, ClientStatus::Rejected] {
            let c = client(status);
            assert!(matches!(confirm_client(Some(&c)), Err(AppError::Forbidden(_))));
        }
        let c = client(ClientStatus::Accepted);
        assert_eq!(confirm_client(Some(&c)).unwrap(), Principal::Client(c.identity()));

        let a = admin("root@example.com");
        assert_eq!(confirm_admin(Some(&a)).unwrap(), Principal::Admin(a.identity()));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Firm.Example "), "ada@firm.example");
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert_eq!("accountant".parse::<Role>().unwrap(), Role::Accountant);
        assert!(matches!("user".parse::<Role>(), Err(AppError::Unauthorized)));
    }
}
