//! Client deletion requests and their approval cascade.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::cascade;
use super::visibility::load_client;
use crate::domain::{
    authorize, search, Action, DeleteRequest, DeleteRequestView, PartySummary, Principal, Target,
    Verdict,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{BlobStore, DeleteRequestRepository, UnitOfWork};

#[async_trait]
pub trait DeleteRequestService: Send + Sync {
    /// Ask for one of the caller's clients to be removed
    async fn create(&self, principal: &Principal, client_id: Uuid) -> AppResult<DeleteRequestView>;

    /// All requests for an admin, own requests for an accountant
    async fn list(
        &self,
        principal: &Principal,
        term: Option<&str>,
    ) -> AppResult<Vec<DeleteRequestView>>;

    /// Approve and delete the client in the same transaction
    async fn approve(&self, principal: &Principal, id: Uuid) -> AppResult<DeleteRequestView>;

    async fn reject(&self, principal: &Principal, id: Uuid) -> AppResult<DeleteRequestView>;
}

pub struct DeleteRequestManager<U: UnitOfWork> {
    uow: Arc<U>,
    blobs: Arc<dyn BlobStore>,
}

impl<U: UnitOfWork> DeleteRequestManager<U> {
    pub fn new(uow: Arc<U>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { uow, blobs }
    }

    /// Resolve client and accountant for display; dangling ids become
    /// "unknown" placeholders.
    async fn views(&self, requests: Vec<DeleteRequest>) -> AppResult<Vec<DeleteRequestView>> {
        let client_ids: Vec<Uuid> = requests.iter().map(|r| r.client_id).collect();
        let accountant_ids: Vec<Uuid> = requests.iter().map(|r| r.accountant_id).collect();

        let client_repo = self.uow.clients();
        let accountant_repo = self.uow.accountants();
        let (clients, accountants) = futures::try_join!(
            client_repo.find_many(client_ids),
            accountant_repo.find_many(accountant_ids),
        )?;

        let clients: HashMap<Uuid, PartySummary> = clients
            .into_iter()
            .map(|c| (c.id, PartySummary::known(c.id, c.name, c.email)))
            .collect();
        let accountants: HashMap<Uuid, PartySummary> = accountants
            .into_iter()
            .map(|a| (a.id, PartySummary::known(a.id, a.name, a.email)))
            .collect();

        Ok(requests
            .into_iter()
            .map(|r| DeleteRequestView {
                id: r.id,
                status: r.status,
                client: clients
                    .get(&r.client_id)
                    .cloned()
                    .unwrap_or_else(|| PartySummary::unknown(r.client_id)),
                accountant: accountants
                    .get(&r.accountant_id)
                    .cloned()
                    .unwrap_or_else(|| PartySummary::unknown(r.accountant_id)),
                created_at: r.created_at,
            })
            .collect())
    }

    async fn view(&self, request: DeleteRequest) -> AppResult<DeleteRequestView> {
        self.views(vec![request])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("delete request view lost"))
    }

    async fn decide(
        &self,
        principal: &Principal,
        id: Uuid,
        verdict: Verdict,
    ) -> AppResult<DeleteRequestView> {
        let request = self.uow.delete_requests().find_by_id(id).await?.ok_or_not_found()?;
        authorize(
            principal,
            Action::Decide,
            Target::DeleteRequest {
                accountant_id: request.accountant_id,
            },
        )
        .into_result()?;

        let (request, files) = self
            .uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    let mut request = ctx
                        .delete_requests()
                        .find_by_id(id)
                        .await?
                        .ok_or(AppError::NotFound)?;

                    let status = request.decide(verdict)?;
                    if !ctx.delete_requests().set_status_if_pending(id, status).await? {
                        return Err(AppError::invalid_transition(
                            "Delete request was decided concurrently",
                        ));
                    }

                    let files = match verdict {
                        Verdict::Reject => Vec::new(),
                        Verdict::Approve => {
                            match cascade::delete_client(&ctx, request.client_id).await? {
                                Some(files) => files,
                                None => {
                                    tracing::warn!(
                                        request_id = %id,
                                        client_id = %request.client_id,
                                        "Client already gone; approving without cascade"
                                    );
                                    Vec::new()
                                }
                            }
                        }
                    };

                    Ok((request, files))
                })
            })
            .await?;

        tracing::info!(request_id = %id, status = %request.status, "Delete request decided");
        cascade::discard_files(self.blobs.as_ref(), &files).await;
        self.view(request).await
    }
}

#[async_trait]
impl<U: UnitOfWork> DeleteRequestService for DeleteRequestManager<U> {
    async fn create(&self, principal: &Principal, client_id: Uuid) -> AppResult<DeleteRequestView> {
        authorize(principal, Action::Create, Target::DeleteRequests).into_result()?;
        let Principal::Accountant(me) = principal else {
            return Err(AppError::forbidden("Only the owning accountant may request deletion"));
        };

        let client = load_client(
            self.uow.clients().as_ref(),
            principal,
            Action::RequestDeletion,
            client_id,
        )
        .await?;

        let requests = self.uow.delete_requests();
        if requests.find_pending_for_client(client.id).await?.is_some() {
            return Err(AppError::conflict(
                "A deletion request is already pending for this client",
            ));
        }

        // The partial unique index settles races between the check and the insert
        let request = requests.create(DeleteRequest::new(client.id, me.id)).await?;

        tracing::info!(request_id = %request.id, client_id = %client.id, "Deletion requested");
        self.view(request).await
    }

    async fn list(
        &self,
        principal: &Principal,
        term: Option<&str>,
    ) -> AppResult<Vec<DeleteRequestView>> {
        authorize(principal, Action::View, Target::DeleteRequests).into_result()?;
        let owner = match principal {
            Principal::Accountant(me) => Some(me.id),
            _ => None,
        };

        let requests = self.uow.delete_requests().list(owner).await?;
        let views = self.views(requests).await?;
        Ok(search::filter(views, term))
    }

    async fn approve(&self, principal: &Principal, id: Uuid) -> AppResult<DeleteRequestView> {
        self.decide(principal, id, Verdict::Approve).await
    }

    async fn reject(&self, principal: &Principal, id: Uuid) -> AppResult<DeleteRequestView> {
        self.decide(principal, id, Verdict::Reject).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::{
        Accountant, AccountantStatus, Client, ClientStatus, DeleteRequestStatus, Identity,
    };
    use crate::infra::repositories::{
        MockAccountantRepository, MockClientRepository, MockDeleteRequestRepository,
    };
    use crate::infra::MockBlobStore;
    use crate::services::testing::TestUnitOfWork;

    fn identity(id: Uuid) -> Identity {
        Identity {
            id,
            name: "Ada".to_string(),
            email: "ada@firm.example".to_string(),
        }
    }

    fn client_of(accountant_id: Uuid) -> Client {
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

    #[tokio::test]
    async fn test_second_pending_request_conflicts() {
        let me = Uuid::new_v4();
        let client = client_of(me);
        let client_id = client.id;

        let mut clients = MockClientRepository::new();
        clients
            .expect_find_by_id()
            .with(eq(client_id))
            .returning(move |_| Ok(Some(client.clone())));

        let mut requests = MockDeleteRequestRepository::new();
        requests
            .expect_find_pending_for_client()
            .returning(move |id| Ok(Some(DeleteRequest::new(id, me))));
        requests.expect_create().times(0);

        let uow = TestUnitOfWork {
            clients: Arc::new(clients),
            delete_requests: Arc::new(requests),
            ..Default::default()
        };
        let service = DeleteRequestManager::new(Arc::new(uow), Arc::new(MockBlobStore::new()));

        let result = service.create(&Principal::Accountant(identity(me)), client_id).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_admin_cannot_request_deletion() {
        let service = DeleteRequestManager::new(
            Arc::new(TestUnitOfWork::default()),
            Arc::new(MockBlobStore::new()),
        );
        let result = service
            .create(&Principal::Admin(identity(Uuid::new_v4())), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_accountant_cannot_decide() {
        let me = Uuid::new_v4();
        let request = DeleteRequest::new(Uuid::new_v4(), me);
        let request_id = request.id;

        let mut requests = MockDeleteRequestRepository::new();
        requests
            .expect_find_by_id()
            .returning(move |_| Ok(Some(request.clone())));

        let uow = TestUnitOfWork {
            delete_requests: Arc::new(requests),
            ..Default::default()
        };
        let service = DeleteRequestManager::new(Arc::new(uow), Arc::new(MockBlobStore::new()));

        let result = service.approve(&Principal::Accountant(identity(me)), request_id).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_list_marks_missing_parties_unknown() {
        let accountant_id = Uuid::new_v4();
        let request = DeleteRequest::new(Uuid::new_v4(), accountant_id);
        let listed = vec![request.clone()];

        let mut requests = MockDeleteRequestRepository::new();
        requests
            .expect_list()
            .with(eq(None))
            .returning(move |_| Ok(listed.clone()));

        let mut clients = MockClientRepository::new();
        clients.expect_find_many().returning(|_| Ok(Vec::new()));

        let mut accountants = MockAccountantRepository::new();
        accountants.expect_find_many().returning(move |_| {
            Ok(vec![Accountant {
                id: accountant_id,
                name: "Ada".to_string(),
                email: "ada@firm.example".to_string(),
                password_hash: "hash".to_string(),
                status: AccountantStatus::Active,
                created_at: Utc::now(),
            }])
        });

        let uow = TestUnitOfWork {
            clients: Arc::new(clients),
            accountants: Arc::new(accountants),
            delete_requests: Arc::new(requests),
            ..Default::default()
        };
        let service = DeleteRequestManager::new(Arc::new(uow), Arc::new(MockBlobStore::new()));

        let views = service
            .list(&Principal::Admin(identity(Uuid::new_v4())), None)
            .await
            .unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].status, DeleteRequestStatus::Pending);
        assert!(!views[0].client.known);
        assert!(views[0].accountant.known);
        assert_eq!(views[0].accountant.name, "Ada");
    }
}
