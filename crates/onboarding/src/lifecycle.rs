//! Company lifecycle: two-phase registration and developer review.

use chrono::Utc;

use stockflow_auth::{RoleId, can_access_developer_views};
use stockflow_core::{CompanyId, DomainError, DomainResult, UserId};
use stockflow_infra::document_store::{DocumentStore, DocumentWrite};
use stockflow_infra::join_code::generate_join_code;
use stockflow_tenancy::{Company, CompanyDetails, ReviewDecision, UserProfile};

/// Drives a company through reserve → details → review.
///
/// Review approval is the one place in the workflow that touches two
/// documents (the company and its owner). Both writes go through a single
/// `commit` batch with version preconditions, so two concurrent reviewers
/// cannot leave an approved company whose owner is still unlinked.
pub struct CompanyLifecycle<S> {
    store: S,
}

impl<S: DocumentStore> CompanyLifecycle<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// First registration phase: reserve a business name.
    ///
    /// Creates the company in `pending_details` with a fresh join code. The
    /// owner's profile is untouched until approval.
    pub fn reserve_name(
        &self,
        owner: UserId,
        name: &str,
        country: Option<String>,
        phone: Option<String>,
    ) -> DomainResult<CompanyId> {
        let profile = self
            .store
            .get_user(owner)?
            .ok_or_else(DomainError::not_found)?
            .record;
        if profile.has_company() {
            return Err(DomainError::conflict(
                "user already belongs to a company",
            ));
        }
        if self.store.find_company_by_owner(owner)?.is_some() {
            return Err(DomainError::conflict(
                "user already has a registration in flight",
            ));
        }

        let company = Company::reserve(
            CompanyId::new(),
            owner,
            name,
            generate_join_code(),
            country,
            phone,
            Utc::now(),
        )?;
        let company_id = company.id;
        self.store
            .commit(vec![DocumentWrite::create_company(company)])?;

        tracing::info!(%company_id, user_id = %owner, "business name reserved");
        Ok(company_id)
    }

    /// Second registration phase: attach full details and queue for review.
    pub fn submit_details(
        &self,
        company_id: CompanyId,
        caller: UserId,
        details: CompanyDetails,
    ) -> DomainResult<()> {
        let stored = self
            .store
            .get_company(company_id)?
            .ok_or_else(DomainError::not_found)?;

        let mut company = stored.record.clone();
        company.submit_details(caller, details)?;
        self.store
            .commit(vec![DocumentWrite::company(company, stored.expected())])?;

        tracing::info!(%company_id, "registration details submitted");
        Ok(())
    }

    /// Apply a developer review decision to a pending registration.
    ///
    /// Approval links the owner to the company as `admin` in the same commit
    /// that flips the company status. Rejection is terminal for the company.
    pub fn review(
        &self,
        company_id: CompanyId,
        decision: ReviewDecision,
        reviewer: UserId,
    ) -> DomainResult<()> {
        let reviewer_profile = self
            .store
            .get_user(reviewer)?
            .ok_or_else(DomainError::not_found)?
            .record;
        if !reviewer_profile.is_developer() {
            return Err(DomainError::permission_denied(
                "only developers may review registrations",
            ));
        }

        let stored_company = self
            .store
            .get_company(company_id)?
            .ok_or_else(DomainError::not_found)?;
        let mut company = stored_company.record.clone();
        company.review(decision)?;

        let mut batch = Vec::new();
        if decision == ReviewDecision::Approved {
            let stored_owner = self
                .store
                .get_user(company.owner_id)?
                .ok_or_else(DomainError::not_found)?;
            let mut owner = stored_owner.record.clone();
            owner.grant_membership(company_id, RoleId::admin());
            batch.push(DocumentWrite::user(owner, stored_owner.expected()));
        }
        batch.push(DocumentWrite::company(company, stored_company.expected()));
        self.store.commit(batch)?;

        tracing::info!(%company_id, user_id = %reviewer, ?decision, "registration reviewed");
        Ok(())
    }

    /// Review queue: companies awaiting a decision. Developer-only.
    pub fn pending_companies(&self, viewer: UserId) -> DomainResult<Vec<Company>> {
        self.require_developer(viewer)?;
        Ok(self
            .store
            .list_companies()?
            .into_iter()
            .map(|v| v.record)
            .filter(|c| c.status == stockflow_tenancy::CompanyStatus::Pending)
            .collect())
    }

    /// Global company directory. Developer-only.
    pub fn all_companies(&self, viewer: UserId) -> DomainResult<Vec<Company>> {
        self.require_developer(viewer)?;
        Ok(self
            .store
            .list_companies()?
            .into_iter()
            .map(|v| v.record)
            .collect())
    }

    /// Global user directory. Developer-only.
    pub fn all_users(&self, viewer: UserId) -> DomainResult<Vec<UserProfile>> {
        self.require_developer(viewer)?;
        Ok(self
            .store
            .list_users()?
            .into_iter()
            .map(|v| v.record)
            .collect())
    }

    fn require_developer(&self, viewer: UserId) -> DomainResult<()> {
        let profile = self
            .store
            .get_user(viewer)?
            .ok_or_else(DomainError::not_found)?
            .record;
        if !can_access_developer_views(&profile.role_id) {
            return Err(DomainError::permission_denied(
                "directory views require the developer role",
            ));
        }
        Ok(())
    }
}
