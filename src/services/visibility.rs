//! Visibility scoping: accountant → clients → documents.
//!
//! Document scope is always derived from the owning client's accountant,
//! never from the denormalized `assigned_accountant_id`.

use uuid::Uuid;

use crate::domain::{authorize, Action, Client, Document, Principal, Target};
use crate::errors::{AppResult, OptionExt};
use crate::infra::{ClientRepository, DocumentRepository, DocumentScope};

pub(crate) fn client_target(client: &Client) -> Target {
    Target::Client {
        id: client.id,
        accountant_id: client.accountant_id,
    }
}

/// Capability target for a document, resolved through its owning client.
pub(crate) async fn document_target(
    clients: &dyn ClientRepository,
    document: &Document,
) -> AppResult<Target> {
    let owner = clients.find_by_id(document.client_id).await?;
    Ok(Target::Document {
        client_id: document.client_id,
        accountant_id: owner.map(|c| c.accountant_id),
    })
}

/// Owner filter for client listings; `None` means unfiltered.
pub(crate) fn client_scope(principal: &Principal) -> AppResult<Option<Uuid>> {
    authorize(principal, Action::View, Target::Clients).into_result()?;
    Ok(match principal {
        Principal::Accountant(me) => Some(me.id),
        _ => None,
    })
}

/// Which documents a principal may list.
pub(crate) async fn document_scope(
    clients: &dyn ClientRepository,
    principal: &Principal,
) -> AppResult<DocumentScope> {
    Ok(match principal {
        Principal::Admin(_) => DocumentScope::All,
        Principal::Accountant(me) => DocumentScope::Clients(clients.ids_for_accountant(me.id).await?),
        Principal::Client(me) => DocumentScope::Clients(vec![me.id]),
    })
}

/// Load a client and check the principal may perform `action` on it.
pub(crate) async fn load_client(
    clients: &dyn ClientRepository,
    principal: &Principal,
    action: Action,
    id: Uuid,
) -> AppResult<Client> {
    let client = clients.find_by_id(id).await?.ok_or_not_found()?;
    authorize(principal, action, client_target(&client)).into_result()?;
    Ok(client)
}

/// Like [`load_client`], but the row stays locked for the rest of the
/// surrounding transaction.
pub(crate) async fn lock_client(
    clients: &dyn ClientRepository,
    principal: &Principal,
    action: Action,
    id: Uuid,
) -> AppResult<Client> {
    let client = clients.find_for_update(id).await?.ok_or_not_found()?;
    authorize(principal, action, client_target(&client)).into_result()?;
    Ok(client)
}

/// Load a document and check the principal may perform `action` on it.
pub(crate) async fn load_document(
    clients: &dyn ClientRepository,
    documents: &dyn DocumentRepository,
    principal: &Principal,
    action: Action,
    id: Uuid,
) -> AppResult<Document> {
    let document = documents.find_by_id(id).await?.ok_or_not_found()?;
    let target = document_target(clients, &document).await?;
    authorize(principal, action, target).into_result()?;
    Ok(document)
}

/// Like [`load_document`], with the document row locked.
pub(crate) async fn lock_document(
    clients: &dyn ClientRepository,
    documents: &dyn DocumentRepository,
    principal: &Principal,
    action: Action,
    id: Uuid,
) -> AppResult<Document> {
    let document = documents.find_for_update(id).await?.ok_or_not_found()?;
    let target = document_target(clients, &document).await?;
    authorize(principal, action, target).into_result()?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::{
        ClientStatus, DocumentCategory, DocumentMetadata, FileType, Identity, NewDocument,
    };
    use crate::errors::AppError;
    use crate::infra::repositories::{MockClientRepository, MockDocumentRepository};

    fn identity(id: Uuid) -> Identity {
        Identity {
            id,
            name: "n".to_string(),
            email: "e@example.com".to_string(),
        }
    }

    fn client(accountant_id: Uuid) -> Client {
        Client {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            email: "acme@example.com".to_string(),
            password_hash: "hash".to_string(),
            status: ClientStatus::Accepted,
            accountant_id,
            created_at: Utc::now(),
        }
    }

    fn document(client_id: Uuid, assigned: Uuid) -> Document {
        Document::new(
            NewDocument {
                title: "Invoice".to_string(),
                file_type: FileType::Pdf,
                category: DocumentCategory::Sale,
                metadata: DocumentMetadata::dated(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
            },
            "http://files/x.pdf".to_string(),
            client_id,
            assigned,
        )
    }

    #[tokio::test]
    async fn test_document_scope_follows_client_owner_not_assignment() {
        let me = Uuid::new_v4();
        let owner = client(Uuid::new_v4());
        // Assigned to me at creation, but the client now belongs to someone else
        let doc = document(owner.id, me);
        let doc_id = doc.id;

        let mut clients = MockClientRepository::new();
        let owner_clone = owner.clone();
        clients
            .expect_find_by_id()
            .with(eq(owner.id))
            .returning(move |_| Ok(Some(owner_clone.clone())));

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_by_id()
            .with(eq(doc_id))
            .returning(move |_| Ok(Some(doc.clone())));

        let principal = Principal::Accountant(identity(me));
        let result = load_document(&clients, &documents, &principal, Action::View, doc_id).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_locked_client_load_checks_ownership() {
        let me = Uuid::new_v4();
        let mine = client(me);
        let mine_id = mine.id;

        let mut clients = MockClientRepository::new();
        clients
            .expect_find_for_update()
            .with(eq(mine_id))
            .returning(move |_| Ok(Some(mine.clone())));
        clients.expect_find_by_id().times(0);

        let ok = lock_client(&clients, &Principal::Accountant(identity(me)), Action::Edit, mine_id).await;
        assert_eq!(ok.unwrap().id, mine_id);

        let other = Principal::Accountant(identity(Uuid::new_v4()));
        let hidden = lock_client(&clients, &other, Action::Edit, mine_id).await;
        assert!(matches!(hidden, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_locked_document_load_uses_locking_finder() {
        let me = Uuid::new_v4();
        let owner = client(me);
        let doc = document(owner.id, me);
        let doc_id = doc.id;

        let mut clients = MockClientRepository::new();
        clients
            .expect_find_by_id()
            .with(eq(owner.id))
            .returning(move |_| Ok(Some(owner.clone())));

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_for_update()
            .with(eq(doc_id))
            .times(1)
            .returning(move |_| Ok(Some(doc.clone())));
        documents.expect_find_by_id().times(0);

        let principal = Principal::Accountant(identity(me));
        let loaded = lock_document(&clients, &documents, &principal, Action::Edit, doc_id)
            .await
            .unwrap();
        assert_eq!(loaded.id, doc_id);
    }

    #[tokio::test]
    async fn test_accountant_document_scope_uses_owned_clients() {
        let me = Uuid::new_v4();
        let owned = vec![Uuid::new_v4(), Uuid::new_v4()];
        let expected = owned.clone();

        let mut clients = MockClientRepository::new();
        clients
            .expect_ids_for_accountant()
            .with(eq(me))
            .returning(move |_| Ok(owned.clone()));

        let scope = document_scope(&clients, &Principal::Accountant(identity(me)))
            .await
            .unwrap();
        assert_eq!(scope, DocumentScope::Clients(expected));
    }

    #[tokio::test]
    async fn test_client_document_scope_is_self() {
        let me = Uuid::new_v4();
        let clients = MockClientRepository::new();
        let scope = document_scope(&clients, &Principal::Client(identity(me)))
            .await
            .unwrap();
        assert_eq!(scope, DocumentScope::Clients(vec![me]));
    }

    #[test]
    fn test_client_scope() {
        let me = Uuid::new_v4();
        assert_eq!(client_scope(&Principal::Accountant(identity(me))).unwrap(), Some(me));
        assert_eq!(client_scope(&Principal::Admin(identity(me))).unwrap(), None);
        assert!(matches!(
            client_scope(&Principal::Client(identity(me))),
            Err(AppError::Forbidden(_))
        ));
    }
}
