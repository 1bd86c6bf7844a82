use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockflow_auth::RoleId;
use stockflow_core::{CompanyId, DomainError, DomainResult, UserId};

/// User account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Disabled,
}

/// User profile document, keyed by the auth provider's stable uid.
///
/// # Invariants
/// - `email` is immutable post-creation (no mutation path exists).
/// - `company_id` stays absent until the user joins or creates a tenant;
///   it is only set by the company lifecycle manager (on approval) or the
///   join-request broker (on grant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role_id: RoleId,
    pub company_id: Option<CompanyId>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Create a fresh profile at registration time.
    ///
    /// New accounts start with the `staff` role and no company membership.
    pub fn new(
        id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let email = email.into();
        if !email.contains('@') {
            return Err(DomainError::validation("email address is malformed"));
        }

        Ok(Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email,
            role_id: RoleId::staff(),
            company_id: None,
            status: UserStatus::Active,
            created_at,
            last_login: None,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn has_company(&self) -> bool {
        self.company_id.is_some()
    }

    /// Developer status is orthogonal to tenancy: it grants visibility of the
    /// developer-scoped views but never a `company_id`.
    pub fn is_developer(&self) -> bool {
        self.role_id.is_developer()
    }

    /// Grant membership in a company with the given role.
    pub fn grant_membership(&mut self, company_id: CompanyId, role_id: RoleId) {
        self.company_id = Some(company_id);
        self.role_id = role_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_starts_without_company() {
        let profile = UserProfile::new(
            UserId::new(),
            "Amara",
            "Perera",
            "amara@example.com",
            Utc::now(),
        )
        .unwrap();

        assert!(!profile.has_company());
        assert!(!profile.is_developer());
        assert_eq!(profile.role_id.as_str(), "staff");
        assert_eq!(profile.status, UserStatus::Active);
        assert!(profile.last_login.is_none());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err =
            UserProfile::new(UserId::new(), "A", "B", "not-an-email", Utc::now()).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn grant_membership_sets_company_and_role() {
        let mut profile =
            UserProfile::new(UserId::new(), "Amara", "Perera", "a@b.com", Utc::now()).unwrap();
        let company_id = CompanyId::new();

        profile.grant_membership(company_id, RoleId::admin());

        assert_eq!(profile.company_id, Some(company_id));
        assert_eq!(profile.role_id, RoleId::admin());
    }
}
