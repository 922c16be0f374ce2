//! Client domain entity and its review lifecycle.
//!
//! ```text
//!            accept            reject
//! pending ─────────► accepted ◄──────► rejected
//!    ▲                  │                 │
//!    └──── edit ────────┴──── edit ───────┘
//! ```
//!
//! Any edit of name or email puts the client back into `pending`,
//! whether or not a value actually changed. A client leaves the
//! lifecycle only by being deleted.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::principal::Identity;
use super::search::Searchable;
use crate::config::{CLIENT_STATUS_ACCEPTED, CLIENT_STATUS_PENDING, CLIENT_STATUS_REJECTED};
use crate::errors::AppError;

/// Client review status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Pending => CLIENT_STATUS_PENDING,
            ClientStatus::Accepted => CLIENT_STATUS_ACCEPTED,
            ClientStatus::Rejected => CLIENT_STATUS_REJECTED,
        }
    }
}

impl FromStr for ClientStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CLIENT_STATUS_PENDING => Ok(ClientStatus::Pending),
            CLIENT_STATUS_ACCEPTED => Ok(ClientStatus::Accepted),
            CLIENT_STATUS_REJECTED => Ok(ClientStatus::Rejected),
            other => Err(AppError::validation(format!("Unknown client status '{}'", other))),
        }
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review decision an accountant or admin can take on a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientDecision {
    Accept,
    Reject,
}

/// Client domain entity
#[derive(Debug, Clone)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub status: ClientStatus,
    pub accountant_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Apply a review decision. Decisions can be reversed any number of times.
    pub fn decide(&mut self, decision: ClientDecision) {
        self.status = match decision {
            ClientDecision::Accept => ClientStatus::Accepted,
            ClientDecision::Reject => ClientStatus::Rejected,
        };
    }

    /// Apply an edit of the profile and reset the review.
    pub fn apply_edit(&mut self, edit: ClientEdit) {
        if let Some(name) = edit.name {
            self.name = name;
        }
        if let Some(email) = edit.email {
            self.email = email;
        }
        self.status = ClientStatus::Pending;
    }

    pub fn can_sign_in(&self) -> bool {
        self.status == ClientStatus::Accepted
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

impl Searchable for Client {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }
}

/// Data needed to register a client
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Owning accountant; ignored when an accountant creates the client
    pub accountant_id: Option<Uuid>,
}

/// Profile edit; absent fields keep their value
#[derive(Debug, Clone, Default)]
pub struct ClientEdit {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Client row as shown to staff, with the owning accountant resolved
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClientView {
    pub id: Uuid,
    #[schema(example = "Acme Bakery")]
    pub name: String,
    #[schema(example = "owner@acme.example")]
    pub email: String,
    pub status: ClientStatus,
    pub accountant_id: Uuid,
    /// Accountant display name, or the raw id when the accountant is gone
    pub accountant_name: String,
    pub created_at: DateTime<Utc>,
}

impl ClientView {
    pub fn new(client: Client, accountant_name: Option<String>) -> Self {
        Self {
            accountant_name: accountant_name.unwrap_or_else(|| client.accountant_id.to_string()),
            id: client.id,
            name: client.name,
            email: client.email,
            status: client.status,
            accountant_id: client.accountant_id,
            created_at: client.created_at,
        }
    }
}

impl Searchable for ClientView {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.accountant_name.as_str()]
    }
}
