//! Accountant domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::principal::Identity;
use super::search::Searchable;
use crate::config::{ACCOUNTANT_STATUS_ACTIVE, ACCOUNTANT_STATUS_INACTIVE};
use crate::errors::AppError;

/// Accountant account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountantStatus {
    Active,
    Inactive,
}

impl AccountantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountantStatus::Active => ACCOUNTANT_STATUS_ACTIVE,
            AccountantStatus::Inactive => ACCOUNTANT_STATUS_INACTIVE,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, AccountantStatus::Active)
    }
}

impl FromStr for AccountantStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ACCOUNTANT_STATUS_ACTIVE => Ok(AccountantStatus::Active),
            ACCOUNTANT_STATUS_INACTIVE => Ok(AccountantStatus::Inactive),
            other => Err(AppError::validation(format!(
                "Unknown accountant status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AccountantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accountant domain entity
#[derive(Debug, Clone)]
pub struct Accountant {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub status: AccountantStatus,
    pub created_at: DateTime<Utc>,
}

impl Accountant {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

impl Searchable for Accountant {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }
}

/// Data needed to register an accountant
#[derive(Debug, Clone)]
pub struct NewAccountant {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Admin-side changes to an accountant; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountantChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub status: Option<AccountantStatus>,
}

/// Accountant response (safe to return to callers)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountantResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@firm.example")]
    pub email: String,
    pub status: AccountantStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Accountant> for AccountantResponse {
    fn from(accountant: Accountant) -> Self {
        Self {
            id: accountant.id,
            name: accountant.name,
            email: accountant.email,
            status: accountant.status,
            created_at: accountant.created_at,
        }
    }
}
