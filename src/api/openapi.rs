//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    accountant_handler, auth_handler, client_handler, delete_request_handler, document_handler,
    justification_handler,
};
use crate::domain::{
    AccountantResponse, AccountantStatus, ClientStatus, ClientView, DeleteRequestStatus,
    DeleteRequestView, Document, DocumentCategory, DocumentMetadata, DocumentStatus, FileType,
    JustificationDocument, MetadataPatch, PartySummary, PartyType, PrincipalResponse, Role,
};
use crate::services::TokenResponse;
use crate::types::{
    PaginatedAccountants, PaginatedClients, PaginatedDeleteRequests, PaginatedDocuments,
    PaginationMeta,
};

/// OpenAPI documentation for the document intake service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Document Intake",
        version = "0.1.0",
        description = "Client onboarding, document review and deletion requests for accounting firms",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::sign_in,
        auth_handler::client_sign_in,
        auth_handler::me,
        // Accountants
        accountant_handler::list_accountants,
        accountant_handler::create_accountant,
        accountant_handler::get_accountant,
        accountant_handler::update_accountant,
        accountant_handler::delete_accountant,
        // Clients
        client_handler::list_clients,
        client_handler::create_client,
        client_handler::get_client,
        client_handler::update_client,
        client_handler::accept_client,
        client_handler::reject_client,
        client_handler::delete_client,
        // Documents
        document_handler::list_documents,
        document_handler::create_document,
        document_handler::upload_document,
        document_handler::get_document,
        document_handler::update_document,
        document_handler::transition_document,
        document_handler::delete_document,
        // Justifications
        justification_handler::attach_justification,
        justification_handler::get_justification,
        // Delete requests
        delete_request_handler::list_delete_requests,
        delete_request_handler::create_delete_request,
        delete_request_handler::approve_delete_request,
        delete_request_handler::reject_delete_request,
    ),
    components(
        schemas(
            // Domain types
            Role,
            PrincipalResponse,
            AccountantStatus,
            AccountantResponse,
            ClientStatus,
            ClientView,
            FileType,
            DocumentCategory,
            PartyType,
            DocumentMetadata,
            MetadataPatch,
            DocumentStatus,
            Document,
            JustificationDocument,
            DeleteRequestStatus,
            PartySummary,
            DeleteRequestView,
            // Shared types
            TokenResponse,
            PaginationMeta,
            PaginatedAccountants,
            PaginatedClients,
            PaginatedDocuments,
            PaginatedDeleteRequests,
            // Request bodies
            auth_handler::SignInRequest,
            accountant_handler::CreateAccountantRequest,
            accountant_handler::UpdateAccountantRequest,
            client_handler::CreateClientRequest,
            client_handler::UpdateClientRequest,
            document_handler::CreateDocumentRequest,
            document_handler::UpdateDocumentRequest,
            document_handler::StatusRequest,
            document_handler::UploadDocumentForm,
            justification_handler::AttachJustificationForm,
            delete_request_handler::CreateDeleteRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign-in entry points"),
        (name = "Accountants", description = "Accountant management (administrators)"),
        (name = "Clients", description = "Client registration and review"),
        (name = "Documents", description = "Document intake and review"),
        (name = "Justifications", description = "Supporting files linked to documents"),
        (name = "Delete Requests", description = "Client deletion requests and approval")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/sign-in or /auth/client/sign-in"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/auth/sign-in",
            "/accountants/{id}",
            "/clients/{id}/accept",
            "/documents/upload",
            "/documents/{id}/justification",
            "/delete-requests/{id}/approve",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_list_responses_use_registered_page_schemas() {
        let doc: serde_json::Value =
            serde_json::from_str(&ApiDoc::openapi().to_json().unwrap()).unwrap();

        for (path, schema) in [
            ("/accountants", "PaginatedAccountants"),
            ("/clients", "PaginatedClients"),
            ("/documents", "PaginatedDocuments"),
            ("/delete-requests", "PaginatedDeleteRequests"),
        ] {
            let body = &doc["paths"][path]["get"]["responses"]["200"]["content"]["application/json"];
            assert_eq!(
                body["schema"]["$ref"],
                format!("#/components/schemas/{}", schema),
                "{}",
                path
            );
            assert!(doc["components"]["schemas"][schema].is_object(), "{}", schema);
        }
    }
}
