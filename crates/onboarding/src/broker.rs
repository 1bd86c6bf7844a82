//! Join-request brokering: joining an existing company by code.

use chrono::Utc;

use stockflow_auth::{Permission, RoleId, can_access};
use stockflow_core::{CompanyId, DomainError, DomainResult, RequestId, UserId};
use stockflow_infra::document_store::{DocumentStore, DocumentWrite};
use stockflow_tenancy::{Company, JoinDecision, JoinRequest};

/// Which role an approved joiner ends up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinRolePolicy {
    /// Every joiner becomes `staff`, whatever their profile held before.
    #[default]
    ForceStaff,
    /// Keep the role already on the joiner's profile.
    PreserveExisting,
}

/// Handles join requests against existing companies.
pub struct JoinRequestBroker<S> {
    store: S,
    policy: JoinRolePolicy,
}

impl<S: DocumentStore> JoinRequestBroker<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, JoinRolePolicy::default())
    }

    pub fn with_policy(store: S, policy: JoinRolePolicy) -> Self {
        Self { store, policy }
    }

    /// Look up a company by the join code a prospective member typed.
    ///
    /// Exact match only; an unknown code is `NotFound`, never a fuzzy hit.
    pub fn find_company_by_code(&self, code: &str) -> DomainResult<Company> {
        self.store
            .find_company_by_join_code(code)?
            .map(|v| v.record)
            .ok_or_else(DomainError::not_found)
    }

    /// File a join request for `user` against `company_id`.
    ///
    /// Idempotent per (company, user): while a request is pending, repeated
    /// calls return the existing request id instead of filing a duplicate.
    pub fn submit_request(&self, company_id: CompanyId, user: UserId) -> DomainResult<RequestId> {
        let profile = self
            .store
            .get_user(user)?
            .ok_or_else(DomainError::not_found)?
            .record;
        if profile.has_company() {
            return Err(DomainError::conflict(
                "user already belongs to a company",
            ));
        }
        if self.store.get_company(company_id)?.is_none() {
            return Err(DomainError::not_found());
        }

        if let Some(existing) = self
            .store
            .list_join_requests(company_id)?
            .into_iter()
            .find(|v| v.record.user_id == user && v.record.is_pending())
        {
            tracing::info!(
                %company_id,
                user_id = %user,
                request_id = %existing.record.id,
                "join request already pending"
            );
            return Ok(existing.record.id);
        }

        let request = JoinRequest::new(
            RequestId::new(),
            company_id,
            user,
            profile.full_name(),
            profile.email.clone(),
            Utc::now(),
        );
        let request_id = request.id;
        self.store
            .commit(vec![DocumentWrite::create_join_request(request)])?;

        tracing::info!(%company_id, user_id = %user, %request_id, "join request filed");
        Ok(request_id)
    }

    /// Approve or deny a pending join request.
    ///
    /// The decider must belong to the company and hold `settingsAccess`.
    /// Approval grants the requester membership (role per the configured
    /// [`JoinRolePolicy`]) in the same commit that resolves the request.
    pub fn decide(
        &self,
        company_id: CompanyId,
        request_id: RequestId,
        decision: JoinDecision,
        decider: UserId,
    ) -> DomainResult<()> {
        self.authorize_decider(company_id, decider)?;

        let stored_request = self
            .store
            .get_join_request(company_id, request_id)?
            .ok_or_else(DomainError::not_found)?;
        let mut request = stored_request.record.clone();
        request.decide(decision)?;

        let mut batch = Vec::new();
        if decision == JoinDecision::Approved {
            let stored_requester = self
                .store
                .get_user(request.user_id)?
                .ok_or_else(DomainError::not_found)?;
            let mut requester = stored_requester.record.clone();
            let role = match self.policy {
                JoinRolePolicy::ForceStaff => RoleId::staff(),
                JoinRolePolicy::PreserveExisting => requester.role_id.clone(),
            };
            requester.grant_membership(company_id, role);
            batch.push(DocumentWrite::user(requester, stored_requester.expected()));
        }
        batch.push(DocumentWrite::join_request(request, stored_request.expected()));
        self.store.commit(batch)?;

        tracing::info!(%company_id, %request_id, user_id = %decider, ?decision, "join request decided");
        Ok(())
    }

    /// Pending requests for a company, for its member settings screen.
    ///
    /// Gated the same way as `decide`.
    pub fn pending_requests(
        &self,
        company_id: CompanyId,
        viewer: UserId,
    ) -> DomainResult<Vec<JoinRequest>> {
        self.authorize_decider(company_id, viewer)?;
        Ok(self
            .store
            .list_join_requests(company_id)?
            .into_iter()
            .map(|v| v.record)
            .filter(JoinRequest::is_pending)
            .collect())
    }

    /// All requests a user has filed, in any status. Self-service view.
    pub fn requests_for_user(&self, user: UserId) -> DomainResult<Vec<JoinRequest>> {
        Ok(self
            .store
            .find_join_requests_by_user(user)?
            .into_iter()
            .map(|v| v.record)
            .collect())
    }

    fn authorize_decider(&self, company_id: CompanyId, decider: UserId) -> DomainResult<()> {
        let profile = self
            .store
            .get_user(decider)?
            .ok_or_else(DomainError::not_found)?
            .record;
        if profile.company_id != Some(company_id) {
            return Err(DomainError::permission_denied(
                "join requests are decided by members of the company",
            ));
        }

        // Missing role document fails closed.
        let role = self
            .store
            .get_role(&profile.role_id)?
            .map(|v| v.record)
            .ok_or_else(|| {
                DomainError::permission_denied("decider role could not be resolved")
            })?;
        if !can_access(&role, Permission::SETTINGS_ACCESS) {
            return Err(DomainError::permission_denied(
                "deciding join requests requires settings access",
            ));
        }
        Ok(())
    }
}
