use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockflow_core::{CompanyId, DomainError, DomainResult, RequestId, UserId};

/// Join request lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinRequestStatus {
    Pending,
    Approved,
    Denied,
}

/// Decision taken by an admin of the target company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinDecision {
    Approved,
    Denied,
}

/// A prospective member's request to join a company.
///
/// Owned by the target company (stored under its request collection). Created
/// once, decided once; the requester's name/email are denormalized so the
/// reviewing admin can render the request without extra lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub id: RequestId,
    pub company_id: CompanyId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub status: JoinRequestStatus,
    pub created_at: DateTime<Utc>,
}

impl JoinRequest {
    pub fn new(
        id: RequestId,
        company_id: CompanyId,
        user_id: UserId,
        user_name: impl Into<String>,
        user_email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            company_id,
            user_id,
            user_name: user_name.into(),
            user_email: user_email.into(),
            status: JoinRequestStatus::Pending,
            created_at,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == JoinRequestStatus::Pending
    }

    /// Resolve the request. Only pending requests can be decided.
    pub fn decide(&mut self, decision: JoinDecision) -> DomainResult<()> {
        if !self.is_pending() {
            return Err(DomainError::conflict(format!(
                "join request has already been resolved (status: {:?})",
                self.status
            )));
        }
        self.status = match decision {
            JoinDecision::Approved => JoinRequestStatus::Approved,
            JoinDecision::Denied => JoinRequestStatus::Denied,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> JoinRequest {
        JoinRequest::new(
            RequestId::new(),
            CompanyId::new(),
            UserId::new(),
            "Nuwan Silva",
            "nuwan@example.com",
            Utc::now(),
        )
    }

    #[test]
    fn new_request_is_pending() {
        assert!(request().is_pending());
    }

    #[test]
    fn decide_resolves_once() {
        let mut req = request();
        req.decide(JoinDecision::Approved).unwrap();
        assert_eq!(req.status, JoinRequestStatus::Approved);

        let err = req.decide(JoinDecision::Denied).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(req.status, JoinRequestStatus::Approved);
    }

    #[test]
    fn denial_is_recorded() {
        let mut req = request();
        req.decide(JoinDecision::Denied).unwrap();
        assert_eq!(req.status, JoinRequestStatus::Denied);
        assert!(!req.is_pending());
    }
}
