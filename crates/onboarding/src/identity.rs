//! Identity resolution: from an authenticated principal to a profile document.

use chrono::Utc;

use stockflow_core::{DomainError, DomainResult};
use stockflow_infra::document_store::{DocumentStore, DocumentWrite};
use stockflow_infra::Principal;
use stockflow_tenancy::UserProfile;

/// Maps authenticated principals onto profile documents.
///
/// `resolve` has no side effects; a `NotFound` right after signup is
/// transient (the profile write may still be in flight) and safe to retry.
pub struct IdentityResolver<S> {
    store: S,
}

impl<S: DocumentStore> IdentityResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Look up the profile behind a principal.
    pub fn resolve(&self, principal: &Principal) -> DomainResult<UserProfile> {
        let found = self.store.get_user(principal.user_id)?;
        found.map(|v| v.record).ok_or_else(DomainError::not_found)
    }

    /// Create the profile document for a fresh signup.
    ///
    /// Defaults: role `staff`, no company, active. Fails with `Conflict` if
    /// the principal already has a profile.
    pub fn register_profile(
        &self,
        principal: &Principal,
        first_name: &str,
        last_name: &str,
    ) -> DomainResult<UserProfile> {
        if self.store.get_user(principal.user_id)?.is_some() {
            return Err(DomainError::conflict("profile already registered"));
        }

        let profile = UserProfile::new(
            principal.user_id,
            first_name,
            last_name,
            principal.email.clone(),
            Utc::now(),
        )?;
        self.store
            .commit(vec![DocumentWrite::create_user(profile.clone())])?;

        tracing::info!(user_id = %profile.id, "profile registered");
        Ok(profile)
    }

    /// Stamp `last_login` on the principal's profile.
    pub fn record_login(&self, principal: &Principal) -> DomainResult<()> {
        let stored = self
            .store
            .get_user(principal.user_id)?
            .ok_or_else(DomainError::not_found)?;

        let mut profile = stored.record.clone();
        profile.last_login = Some(Utc::now());
        self.store
            .commit(vec![DocumentWrite::user(profile, stored.expected())])?;
        Ok(())
    }
}
