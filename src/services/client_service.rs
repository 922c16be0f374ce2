//! Client registration, review and removal.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::cascade;
use super::visibility::{client_scope, load_client, lock_client};
use crate::domain::{
    authorize, normalize_email, search, Action, Client, ClientDecision, ClientEdit, ClientStatus,
    ClientView, NewClient, Password, Principal, Target,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{BlobStore, ClientRepository, UnitOfWork};

#[async_trait]
pub trait ClientService: Send + Sync {
    /// Clients visible to the principal, owner names resolved
    async fn list(&self, principal: &Principal, term: Option<&str>) -> AppResult<Vec<ClientView>>;

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<ClientView>;

    /// Register a client in status `pending`. An accountant always becomes
    /// the owner; an admin must name an existing accountant.
    async fn create(&self, principal: &Principal, input: NewClient) -> AppResult<ClientView>;

    async fn decide(
        &self,
        principal: &Principal,
        id: Uuid,
        decision: ClientDecision,
    ) -> AppResult<ClientView>;

    /// Edit name/email; always resets the review to `pending`
    async fn edit(&self, principal: &Principal, id: Uuid, edit: ClientEdit) -> AppResult<ClientView>;

    /// Direct hard delete with cascade (admin only)
    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()>;
}

pub struct ClientManager<U: UnitOfWork> {
    uow: Arc<U>,
    blobs: Arc<dyn BlobStore>,
}

impl<U: UnitOfWork> ClientManager<U> {
    pub fn new(uow: Arc<U>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { uow, blobs }
    }

    /// Attach owner display names; a missing accountant falls back to its id.
    async fn views(&self, clients: Vec<Client>) -> AppResult<Vec<ClientView>> {
        let mut owner_ids: Vec<Uuid> = clients.iter().map(|c| c.accountant_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let names: HashMap<Uuid, String> = self
            .uow
            .accountants()
            .find_many(owner_ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a.name))
            .collect();

        Ok(clients
            .into_iter()
            .map(|client| {
                let name = names.get(&client.accountant_id).cloned();
                ClientView::new(client, name)
            })
            .collect())
    }

    async fn view(&self, client: Client) -> AppResult<ClientView> {
        let name = self
            .uow
            .accountants()
            .find_by_id(client.accountant_id)
            .await?
            .map(|a| a.name);
        Ok(ClientView::new(client, name))
    }

}

async fn ensure_email_free(
    clients: &dyn ClientRepository,
    email: &str,
    except: Option<Uuid>,
) -> AppResult<()> {
    match clients.find_by_email(email).await? {
        Some(other) if Some(other.id) != except => {
            Err(AppError::conflict("A client with this email already exists"))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl<U: UnitOfWork> ClientService for ClientManager<U> {
    async fn list(&self, principal: &Principal, term: Option<&str>) -> AppResult<Vec<ClientView>> {
        let owner = client_scope(principal)?;
        let clients = self.uow.clients().list(owner).await?;
        let views = self.views(clients).await?;
        Ok(search::filter(views, term))
    }

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<ClientView> {
        let client = load_client(self.uow.clients().as_ref(), principal, Action::View, id).await?;
        self.view(client).await
    }

    async fn create(&self, principal: &Principal, input: NewClient) -> AppResult<ClientView> {
        authorize(principal, Action::Create, Target::Clients).into_result()?;

        let accountant_id = match principal {
            Principal::Accountant(me) => {
                // The token may outlive the account it names
                match self.uow.accountants().find_by_id(me.id).await? {
                    None => return Err(AppError::Unauthorized),
                    Some(owner) if !owner.status.is_active() => {
                        return Err(AppError::forbidden("Account is not active"))
                    }
                    Some(owner) => owner.id,
                }
            }
            _ => {
                let id = input
                    .accountant_id
                    .ok_or_else(|| AppError::validation("accountant_id is required"))?;
                if self.uow.accountants().find_by_id(id).await?.is_none() {
                    return Err(AppError::validation("accountant_id does not reference an accountant"));
                }
                id
            }
        };

        let email = normalize_email(&input.email);
        ensure_email_free(self.uow.clients().as_ref(), &email, None).await?;

        let client = Client {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            email,
            password_hash: Password::new(&input.password)?.into_string(),
            status: ClientStatus::Pending,
            accountant_id,
            created_at: Utc::now(),
        };

        let client = self.uow.clients().create(client).await?;
        tracing::info!(client_id = %client.id, accountant_id = %accountant_id, "Client registered");
        self.view(client).await
    }

    async fn decide(
        &self,
        principal: &Principal,
        id: Uuid,
        decision: ClientDecision,
    ) -> AppResult<ClientView> {
        let principal = principal.clone();
        let client = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let clients = ctx.clients();
                    let mut client = lock_client(&clients, &principal, Action::Review, id).await?;
                    client.decide(decision);
                    clients.update(client).await
                })
            })
            .await?;

        tracing::info!(client_id = %id, status = %client.status, "Client reviewed");
        self.view(client).await
    }

    async fn edit(&self, principal: &Principal, id: Uuid, edit: ClientEdit) -> AppResult<ClientView> {
        let principal = principal.clone();
        let edit = ClientEdit {
            name: edit.name.map(|n| n.trim().to_string()),
            email: edit.email.map(|e| normalize_email(&e)),
        };

        let client = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let clients = ctx.clients();
                    let mut client = lock_client(&clients, &principal, Action::Edit, id).await?;
                    if let Some(email) = edit.email.as_deref() {
                        ensure_email_free(&clients, email, Some(id)).await?;
                    }
                    client.apply_edit(edit);
                    clients.update(client).await
                })
            })
            .await?;

        tracing::info!(client_id = %id, "Client edited; review reset to pending");
        self.view(client).await
    }

    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        load_client(self.uow.clients().as_ref(), principal, Action::Delete, id).await?;

        let files = self
            .uow
            .transaction(move |ctx| Box::pin(async move { cascade::delete_client(&ctx, id).await }))
            .await?
            .ok_or(AppError::NotFound)?;

        cascade::discard_files(self.blobs.as_ref(), &files).await;
        Ok(())
    }
}
