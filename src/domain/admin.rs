//! Administrator identity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::principal::Identity;

/// Administrator account. Admins are created from the CLI only.
#[derive(Debug, Clone)]
pub struct Admin {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}
