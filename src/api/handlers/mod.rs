//! HTTP request handlers.

pub mod accountant_handler;
pub mod auth_handler;
pub mod client_handler;
pub mod delete_request_handler;
pub mod document_handler;
pub mod justification_handler;

pub use accountant_handler::accountant_routes;
pub use auth_handler::auth_routes;
pub use client_handler::client_routes;
pub use delete_request_handler::delete_request_routes;
pub use document_handler::document_routes;
pub use justification_handler::justification_routes;
