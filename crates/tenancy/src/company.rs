use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockflow_core::{CompanyId, DomainError, DomainResult, UserId};

/// Company (tenant) lifecycle status.
///
/// Two-phase registration: a company is created in `PendingDetails` when the
/// owner reserves a name, moves to `Pending` once full details are submitted,
/// and only a developer review moves it to `Approved` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    PendingDetails,
    Pending,
    Approved,
    Rejected,
}

/// Developer review outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

/// The second-phase registration payload (owner and business details).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetails {
    pub owner_full_name: String,
    pub owner_contact: String,
    pub owner_nic: String,
    pub owner_address: String,
    pub office_contact: Option<String>,
    pub worker_range: String,
    pub package: String,
    pub is_registered: bool,
    pub registration_number: Option<String>,
}

impl CompanyDetails {
    /// Field-level checks mirroring the registration form contract.
    ///
    /// The cross-field invariant: a registered business must state its
    /// registration number.
    pub fn validate(&self) -> DomainResult<()> {
        if self.owner_full_name.trim().len() < 2 {
            return Err(DomainError::validation("owner full name is required"));
        }
        if self.owner_contact.trim().len() < 10 {
            return Err(DomainError::validation(
                "a valid owner contact number is required",
            ));
        }
        if self.owner_nic.trim().len() < 10 {
            return Err(DomainError::validation("a valid owner NIC is required"));
        }
        if self.owner_address.trim().len() < 5 {
            return Err(DomainError::validation("owner address is required"));
        }
        if self.worker_range.trim().is_empty() {
            return Err(DomainError::validation("worker range is required"));
        }
        if self.package.trim().is_empty() {
            return Err(DomainError::validation("package selection is required"));
        }
        if self.is_registered
            && self
                .registration_number
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
        {
            return Err(DomainError::validation(
                "registration number is required if the business is registered",
            ));
        }
        Ok(())
    }
}

/// Company (tenant) document.
///
/// # Invariants
/// - Exactly one `owner_id`; a user may own at most one company at a time
///   (enforced by the lifecycle manager's query-before-create plus version
///   preconditions on commit).
/// - Status only moves along the two-phase registration path; `Rejected` is
///   terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub owner_id: UserId,
    pub status: CompanyStatus,
    /// Random short code a prospective member types to find this company.
    /// Distinct from the primary key so the document id never doubles as a
    /// shared secret.
    pub join_code: String,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub details: Option<CompanyDetails>,
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// First registration phase: reserve the business name.
    pub fn reserve(
        id: CompanyId,
        owner_id: UserId,
        name: impl Into<String>,
        join_code: impl Into<String>,
        country: Option<String>,
        phone: Option<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().len() < 2 {
            return Err(DomainError::validation(
                "business name must be at least 2 characters",
            ));
        }

        Ok(Self {
            id,
            name,
            owner_id,
            status: CompanyStatus::PendingDetails,
            join_code: join_code.into(),
            country,
            phone,
            details: None,
            created_at,
        })
    }

    /// Second registration phase: attach full details and queue for review.
    ///
    /// Only the owner may submit; the company must still be awaiting details.
    pub fn submit_details(&mut self, caller: UserId, details: CompanyDetails) -> DomainResult<()> {
        if caller != self.owner_id {
            return Err(DomainError::permission_denied(
                "only the company owner may submit registration details",
            ));
        }
        if self.status != CompanyStatus::PendingDetails {
            return Err(DomainError::conflict(format!(
                "company is not awaiting details (status: {:?})",
                self.status
            )));
        }
        details.validate()?;

        self.details = Some(details);
        self.status = CompanyStatus::Pending;
        Ok(())
    }

    /// Apply a developer review decision.
    ///
    /// The reviewer-role check happens at the lifecycle manager, which holds
    /// the reviewer's profile; this method only guards the status transition.
    pub fn review(&mut self, decision: ReviewDecision) -> DomainResult<()> {
        if self.status != CompanyStatus::Pending {
            return Err(DomainError::conflict(format!(
                "company is not under review (status: {:?})",
                self.status
            )));
        }
        self.status = match decision {
            ReviewDecision::Approved => CompanyStatus::Approved,
            ReviewDecision::Rejected => CompanyStatus::Rejected,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> CompanyDetails {
        CompanyDetails {
            owner_full_name: "Amara Perera".to_string(),
            owner_contact: "0771234567".to_string(),
            owner_nic: "991234567V".to_string(),
            owner_address: "12 Galle Road, Colombo".to_string(),
            office_contact: None,
            worker_range: "1-5".to_string(),
            package: "basic".to_string(),
            is_registered: false,
            registration_number: None,
        }
    }

    fn reserved(owner: UserId) -> Company {
        Company::reserve(
            CompanyId::new(),
            owner,
            "Acme Traders",
            "AB12CD",
            Some("Sri Lanka".to_string()),
            None,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn reserve_rejects_short_name() {
        let err = Company::reserve(
            CompanyId::new(),
            UserId::new(),
            " a ",
            "AB12CD",
            None,
            None,
            Utc::now(),
        )
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn reserve_starts_in_pending_details() {
        let company = reserved(UserId::new());
        assert_eq!(company.status, CompanyStatus::PendingDetails);
        assert!(company.details.is_none());
    }

    #[test]
    fn submit_details_transitions_to_pending() {
        let owner = UserId::new();
        let mut company = reserved(owner);

        company.submit_details(owner, details()).unwrap();
        assert_eq!(company.status, CompanyStatus::Pending);
        assert!(company.details.is_some());
    }

    #[test]
    fn submit_details_rejects_non_owner() {
        let mut company = reserved(UserId::new());

        let err = company.submit_details(UserId::new(), details()).unwrap_err();
        match err {
            DomainError::PermissionDenied(_) => {}
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
        assert_eq!(company.status, CompanyStatus::PendingDetails);
    }

    #[test]
    fn registered_business_requires_registration_number() {
        let mut d = details();
        d.is_registered = true;
        d.registration_number = Some("".to_string());
        assert!(matches!(d.validate(), Err(DomainError::Validation(_))));

        d.registration_number = None;
        assert!(matches!(d.validate(), Err(DomainError::Validation(_))));

        d.registration_number = Some("PV-00123".to_string());
        assert!(d.validate().is_ok());
    }

    #[test]
    fn unregistered_business_needs_no_registration_number() {
        let d = details();
        assert!(!d.is_registered);
        assert!(d.registration_number.is_none());
        assert!(d.validate().is_ok());
    }

    #[test]
    fn review_requires_pending_status() {
        let owner = UserId::new();
        let mut company = reserved(owner);

        // Still awaiting details: review is a conflict.
        let err = company.review(ReviewDecision::Approved).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        company.submit_details(owner, details()).unwrap();
        company.review(ReviewDecision::Approved).unwrap();
        assert_eq!(company.status, CompanyStatus::Approved);

        // Terminal: a second decision is a conflict.
        let err = company.review(ReviewDecision::Rejected).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn rejection_is_terminal() {
        let owner = UserId::new();
        let mut company = reserved(owner);
        company.submit_details(owner, details()).unwrap();
        company.review(ReviewDecision::Rejected).unwrap();

        assert_eq!(company.status, CompanyStatus::Rejected);
        assert!(company.review(ReviewDecision::Approved).is_err());
        assert!(company.submit_details(owner, details()).is_err());
    }
}
