//! Client deletion requests.
//!
//! An accountant asks for one of their clients to be removed; an admin
//! approves (which deletes the client) or rejects. Both outcomes are final.
//! At most one request per client may be pending at a time.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::search::Searchable;
use crate::config::{
    DELETE_REQUEST_STATUS_APPROVED, DELETE_REQUEST_STATUS_PENDING, DELETE_REQUEST_STATUS_REJECTED,
    UNKNOWN_DISPLAY_NAME,
};
use crate::errors::{AppError, AppResult};

/// Delete request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeleteRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl DeleteRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteRequestStatus::Pending => DELETE_REQUEST_STATUS_PENDING,
            DeleteRequestStatus::Approved => DELETE_REQUEST_STATUS_APPROVED,
            DeleteRequestStatus::Rejected => DELETE_REQUEST_STATUS_REJECTED,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DeleteRequestStatus::Pending)
    }
}

impl FromStr for DeleteRequestStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DELETE_REQUEST_STATUS_PENDING => Ok(DeleteRequestStatus::Pending),
            DELETE_REQUEST_STATUS_APPROVED => Ok(DeleteRequestStatus::Approved),
            DELETE_REQUEST_STATUS_REJECTED => Ok(DeleteRequestStatus::Rejected),
            other => Err(AppError::validation(format!(
                "Unknown delete request status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for DeleteRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin verdict on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Reject,
}

impl Verdict {
    pub fn resulting_status(&self) -> DeleteRequestStatus {
        match self {
            Verdict::Approve => DeleteRequestStatus::Approved,
            Verdict::Reject => DeleteRequestStatus::Rejected,
        }
    }
}

/// Delete request domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub id: Uuid,
    pub client_id: Uuid,
    /// Requesting accountant
    pub accountant_id: Uuid,
    pub status: DeleteRequestStatus,
    pub created_at: DateTime<Utc>,
}

impl DeleteRequest {
    pub fn new(client_id: Uuid, accountant_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            accountant_id,
            status: DeleteRequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Apply a verdict. Only pending requests can be decided.
    pub fn decide(&mut self, verdict: Verdict) -> AppResult<DeleteRequestStatus> {
        if self.status.is_terminal() {
            return Err(AppError::invalid_transition(format!(
                "Delete request is already {}",
                self.status
            )));
        }
        self.status = verdict.resulting_status();
        Ok(self.status)
    }
}

/// Reference to a principal resolved at read time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PartySummary {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// False when the referenced record no longer exists
    pub known: bool,
}

impl PartySummary {
    pub fn known(id: Uuid, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: Some(email.into()),
            known: true,
        }
    }

    pub fn unknown(id: Uuid) -> Self {
        Self {
            id,
            name: UNKNOWN_DISPLAY_NAME.to_string(),
            email: None,
            known: false,
        }
    }
}

/// Delete request with client and accountant resolved for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteRequestView {
    pub id: Uuid,
    pub status: DeleteRequestStatus,
    pub client: PartySummary,
    pub accountant: PartySummary,
    pub created_at: DateTime<Utc>,
}

impl Searchable for DeleteRequestView {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.client.name.as_str(), self.accountant.name.as_str()];
        if let Some(email) = self.client.email.as_deref() {
            fields.push(email);
        }
        fields
    }
}
