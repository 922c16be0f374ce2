//! Domain layer - Core business entities and logic
//!
//! Principals, the client/document/delete-request lifecycles and the
//! capability check live here, independent of storage and transport.

pub mod access;
pub mod accountant;
pub mod admin;
pub mod client;
pub mod delete_request;
pub mod document;
pub mod justification;
pub mod password;
pub mod principal;
pub mod search;

pub use access::{authorize, Action, Decision, Denial, Target};
pub use accountant::{
    Accountant, AccountantChanges, AccountantResponse, AccountantStatus, NewAccountant,
};
pub use admin::Admin;
pub use client::{Client, ClientDecision, ClientEdit, ClientStatus, ClientView, NewClient};
pub use delete_request::{
    DeleteRequest, DeleteRequestStatus, DeleteRequestView, PartySummary, Verdict,
};
pub use document::{
    Document, DocumentCategory, DocumentDraft, DocumentEdit, DocumentMetadata, DocumentStatus, FileType,
    MetadataPatch, NewDocument, PartyType,
};
pub use justification::JustificationDocument;
pub use password::Password;
pub use principal::{
    confirm_accountant, confirm_admin, confirm_client, normalize_email, resolve_client,
    resolve_staff, Identity, Principal, PrincipalResponse, Role,
};
pub use search::Searchable;
