//! Accountant management (admin only).

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    authorize, normalize_email, search, Accountant, AccountantChanges, AccountantStatus, Action,
    NewAccountant, Password, Principal, Target,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait AccountantService: Send + Sync {
    async fn list(&self, principal: &Principal, term: Option<&str>) -> AppResult<Vec<Accountant>>;

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Accountant>;

    async fn create(&self, principal: &Principal, input: NewAccountant) -> AppResult<Accountant>;

    async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: AccountantChanges,
    ) -> AppResult<Accountant>;

    /// Hard delete. The accountant's clients keep their dangling owner id.
    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()>;
}

pub struct AccountantManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccountantManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    fn check(principal: &Principal, action: Action) -> AppResult<()> {
        authorize(principal, action, Target::Accountants).into_result()
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountantService for AccountantManager<U> {
    async fn list(&self, principal: &Principal, term: Option<&str>) -> AppResult<Vec<Accountant>> {
        Self::check(principal, Action::View)?;
        let accountants = self.uow.accountants().list().await?;
        Ok(search::filter(accountants, term))
    }

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Accountant> {
        Self::check(principal, Action::View)?;
        self.uow.accountants().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create(&self, principal: &Principal, input: NewAccountant) -> AppResult<Accountant> {
        Self::check(principal, Action::Create)?;

        let accountant = Accountant {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            email: normalize_email(&input.email),
            password_hash: Password::new(&input.password)?.into_string(),
            status: AccountantStatus::Active,
            created_at: Utc::now(),
        };

        let accountant = self.uow.accountants().create(accountant).await?;
        tracing::info!(accountant_id = %accountant.id, "Accountant created");
        Ok(accountant)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        changes: AccountantChanges,
    ) -> AppResult<Accountant> {
        Self::check(principal, Action::Edit)?;

        let repo = self.uow.accountants();
        let mut accountant = repo.find_by_id(id).await?.ok_or_not_found()?;

        if let Some(name) = changes.name {
            accountant.name = name.trim().to_string();
        }
        if let Some(email) = changes.email {
            let email = normalize_email(&email);
            if let Some(other) = repo.find_by_email(&email).await? {
                if other.id != id {
                    return Err(AppError::conflict("An accountant with this email already exists"));
                }
            }
            accountant.email = email;
        }
        if let Some(password) = changes.password {
            accountant.password_hash = Password::new(&password)?.into_string();
        }
        if let Some(status) = changes.status {
            accountant.status = status;
        }

        let accountant = repo.update(accountant).await?;
        tracing::info!(accountant_id = %id, status = %accountant.status, "Accountant updated");
        Ok(accountant)
    }

    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        Self::check(principal, Action::Delete)?;

        if !self.uow.accountants().delete(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(accountant_id = %id, "Accountant deleted");
        Ok(())
    }
}
