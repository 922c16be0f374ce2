//! Capability checks.
//!
//! Every service operation asks [`authorize`] before touching an entity.
//! Visibility follows ownership: accountant → clients → documents.
//! Acting on something outside the caller's scope is reported as
//! `NotFound`, so existence is never confirmed to the wrong principal;
//! acting in scope with the wrong role is `Forbidden`.

use uuid::Uuid;

use super::principal::Principal;
use crate::errors::{AppError, AppResult};

/// What the principal wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read a single entity or list a collection
    View,
    /// Create an entity in a collection or under an owner
    Create,
    /// Edit content (resets review)
    Edit,
    /// Accept/reject a client, move a document through review
    Review,
    /// Hard delete
    Delete,
    /// Ask an admin to delete a client
    RequestDeletion,
    /// Approve/reject a delete request
    Decide,
    /// Attach a justification file to a document
    Attach,
}

/// What the action applies to, reduced to the ownership facts that matter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Accountant management
    Accountants,
    /// Client collection (list, create)
    Clients,
    /// One client and its owning accountant
    Client { id: Uuid, accountant_id: Uuid },
    /// One document; `accountant_id` is the owning client's accountant,
    /// `None` when the owning client no longer exists
    Document {
        client_id: Uuid,
        accountant_id: Option<Uuid>,
    },
    /// Delete request queue (list, create)
    DeleteRequests,
    /// One delete request
    DeleteRequest { accountant_id: Uuid },
}

/// Why a request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Target is invisible to the principal
    OutOfScope,
    /// Target is visible but the role may not do this
    NotPermitted(&'static str),
}

/// Outcome of a capability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Map to the error kinds callers see.
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(Denial::OutOfScope) => Err(AppError::NotFound),
            Decision::Deny(Denial::NotPermitted(reason)) => Err(AppError::forbidden(reason)),
        }
    }
}

const ADMIN_ONLY: &str = "Only administrators may perform this action";
const STAFF_ONLY: &str = "Only staff may perform this action";
const CLIENT_DELETION_NEEDS_REQUEST: &str = "Client deletion requires an approved delete request";
const ACCOUNTANT_ONLY: &str = "Only the owning accountant may request deletion";

fn deny(reason: &'static str) -> Decision {
    Decision::Deny(Denial::NotPermitted(reason))
}

/// The single capability check consulted before every read and mutation.
pub fn authorize(principal: &Principal, action: Action, target: Target) -> Decision {
    match (principal, target) {
        // Admins may do everything except raise delete requests,
        // which exist for accountants to ask admins.
        (Principal::Admin(_), Target::Clients | Target::DeleteRequests)
            if action == Action::RequestDeletion =>
        {
            deny(ACCOUNTANT_ONLY)
        }
        (Principal::Admin(_), Target::Client { .. }) if action == Action::RequestDeletion => {
            deny(ACCOUNTANT_ONLY)
        }
        (Principal::Admin(_), _) => Decision::Allow,

        // Accountants
        (Principal::Accountant(_), Target::Accountants) => deny(ADMIN_ONLY),
        (Principal::Accountant(_), Target::Clients) => match action {
            Action::View | Action::Create => Decision::Allow,
            _ => deny(ADMIN_ONLY),
        },
        (Principal::Accountant(me), Target::Client { accountant_id, .. }) => {
            if accountant_id != me.id {
                return Decision::Deny(Denial::OutOfScope);
            }
            match action {
                Action::Delete => deny(CLIENT_DELETION_NEEDS_REQUEST),
                Action::Decide => deny(ADMIN_ONLY),
                _ => Decision::Allow,
            }
        }
        (Principal::Accountant(me), Target::Document { accountant_id, .. }) => {
            if accountant_id != Some(me.id) {
                return Decision::Deny(Denial::OutOfScope);
            }
            match action {
                Action::Decide | Action::RequestDeletion => deny(ADMIN_ONLY),
                _ => Decision::Allow,
            }
        }
        (Principal::Accountant(_), Target::DeleteRequests) => match action {
            Action::View | Action::Create | Action::RequestDeletion => Decision::Allow,
            _ => deny(ADMIN_ONLY),
        },
        (Principal::Accountant(me), Target::DeleteRequest { accountant_id }) => {
            if accountant_id != me.id {
                return Decision::Deny(Denial::OutOfScope);
            }
            match action {
                Action::View => Decision::Allow,
                _ => deny(ADMIN_ONLY),
            }
        }

        // Clients only ever see their own documents and profile
        (Principal::Client(me), Target::Document { client_id, .. }) => {
            if client_id != me.id {
                return Decision::Deny(Denial::OutOfScope);
            }
            match action {
                Action::View | Action::Create | Action::Attach => Decision::Allow,
                _ => deny(STAFF_ONLY),
            }
        }
        (Principal::Client(me), Target::Client { id, .. }) => {
            if id != me.id {
                return Decision::Deny(Denial::OutOfScope);
            }
            match action {
                Action::View => Decision::Allow,
                _ => deny(STAFF_ONLY),
            }
        }
        (Principal::Client(_), Target::DeleteRequest { .. }) => Decision::Deny(Denial::OutOfScope),
        (Principal::Client(_), Target::Accountants | Target::Clients | Target::DeleteRequests) => {
            deny(STAFF_ONLY)
        }
    }
}
