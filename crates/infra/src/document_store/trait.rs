use thiserror::Error;

use stockflow_auth::{Role, RoleId};
use stockflow_core::{CompanyId, DomainError, ExpectedVersion, RequestId, UserId, Versioned};
use stockflow_tenancy::{Company, JoinRequest, UserProfile};

use std::sync::Arc;

/// Document store operation error.
///
/// These are **infrastructure errors** (concurrency, availability) as opposed
/// to domain errors (validation, invariants). Services convert them at the
/// operation boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    #[error("document not found")]
    NotFound,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => DomainError::conflict(msg),
            StoreError::NotFound => DomainError::not_found(),
            StoreError::Unavailable(msg) => {
                DomainError::conflict(format!("store unavailable: {msg}"))
            }
        }
    }
}

/// One document write with its version precondition.
///
/// `ExpectedVersion::Exact(0)` means "must not exist yet" (creates);
/// `Exact(n)` pins an update to the revision the caller read.
#[derive(Debug, Clone)]
pub enum DocumentWrite {
    User {
        record: UserProfile,
        expected: ExpectedVersion,
    },
    Company {
        record: Company,
        expected: ExpectedVersion,
    },
    JoinRequest {
        record: JoinRequest,
        expected: ExpectedVersion,
    },
    Role {
        record: Role,
        expected: ExpectedVersion,
    },
}

impl DocumentWrite {
    pub fn user(record: UserProfile, expected: ExpectedVersion) -> Self {
        Self::User { record, expected }
    }

    pub fn company(record: Company, expected: ExpectedVersion) -> Self {
        Self::Company { record, expected }
    }

    pub fn join_request(record: JoinRequest, expected: ExpectedVersion) -> Self {
        Self::JoinRequest { record, expected }
    }

    pub fn role(record: Role, expected: ExpectedVersion) -> Self {
        Self::Role { record, expected }
    }

    /// Create a fresh document (precondition: does not exist).
    pub fn create_user(record: UserProfile) -> Self {
        Self::user(record, ExpectedVersion::Exact(0))
    }

    pub fn create_company(record: Company) -> Self {
        Self::company(record, ExpectedVersion::Exact(0))
    }

    pub fn create_join_request(record: JoinRequest) -> Self {
        Self::join_request(record, ExpectedVersion::Exact(0))
    }
}

/// The external document database, reduced to what the workflow needs.
///
/// Logical collections: `users`, `companies`, `companies/{id}/joinRequests`,
/// `roles`. All access is full-document read/write or a simple equality
/// query on one field; no joins.
///
/// ## Commit semantics
///
/// `commit()` applies a batch of writes **atomically**: every write's
/// version precondition is checked first, and either all writes land or none
/// do. This is the primitive the lifecycle manager and broker use for their
/// two-document transitions (approval must never leave a company approved
/// while its owner still has no `company_id`).
///
/// ## Implementation requirements
///
/// - Assign versions monotonically per document (fresh documents land at 1).
/// - Reject the whole batch with `Conflict` if any precondition fails.
/// - Reads return the document together with its current version so callers
///   can pin subsequent writes to the revision they saw.
pub trait DocumentStore: Send + Sync {
    // users
    fn get_user(&self, id: UserId) -> Result<Option<Versioned<UserProfile>>, StoreError>;
    fn list_users(&self) -> Result<Vec<Versioned<UserProfile>>, StoreError>;
    fn find_users_by_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Versioned<UserProfile>>, StoreError>;

    // companies
    fn get_company(&self, id: CompanyId) -> Result<Option<Versioned<Company>>, StoreError>;
    fn list_companies(&self) -> Result<Vec<Versioned<Company>>, StoreError>;
    fn find_company_by_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Option<Versioned<Company>>, StoreError>;
    fn find_company_by_join_code(
        &self,
        code: &str,
    ) -> Result<Option<Versioned<Company>>, StoreError>;

    // companies/{id}/joinRequests
    fn get_join_request(
        &self,
        company_id: CompanyId,
        request_id: RequestId,
    ) -> Result<Option<Versioned<JoinRequest>>, StoreError>;
    fn list_join_requests(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Versioned<JoinRequest>>, StoreError>;
    fn find_join_requests_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Versioned<JoinRequest>>, StoreError>;

    // roles
    fn get_role(&self, id: &RoleId) -> Result<Option<Versioned<Role>>, StoreError>;
    fn list_roles(&self) -> Result<Vec<Versioned<Role>>, StoreError>;

    /// Apply a batch of writes atomically (all preconditions hold or nothing
    /// is written).
    fn commit(&self, batch: Vec<DocumentWrite>) -> Result<(), StoreError>;
}

impl<S> DocumentStore for &S
where
    S: DocumentStore + ?Sized,
{
    fn get_user(&self, id: UserId) -> Result<Option<Versioned<UserProfile>>, StoreError> {
        (**self).get_user(id)
    }

    fn list_users(&self) -> Result<Vec<Versioned<UserProfile>>, StoreError> {
        (**self).list_users()
    }

    fn find_users_by_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Versioned<UserProfile>>, StoreError> {
        (**self).find_users_by_company(company_id)
    }

    fn get_company(&self, id: CompanyId) -> Result<Option<Versioned<Company>>, StoreError> {
        (**self).get_company(id)
    }

    fn list_companies(&self) -> Result<Vec<Versioned<Company>>, StoreError> {
        (**self).list_companies()
    }

    fn find_company_by_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Option<Versioned<Company>>, StoreError> {
        (**self).find_company_by_owner(owner_id)
    }

    fn find_company_by_join_code(
        &self,
        code: &str,
    ) -> Result<Option<Versioned<Company>>, StoreError> {
        (**self).find_company_by_join_code(code)
    }

    fn get_join_request(
        &self,
        company_id: CompanyId,
        request_id: RequestId,
    ) -> Result<Option<Versioned<JoinRequest>>, StoreError> {
        (**self).get_join_request(company_id, request_id)
    }

    fn list_join_requests(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Versioned<JoinRequest>>, StoreError> {
        (**self).list_join_requests(company_id)
    }

    fn find_join_requests_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Versioned<JoinRequest>>, StoreError> {
        (**self).find_join_requests_by_user(user_id)
    }

    fn get_role(&self, id: &RoleId) -> Result<Option<Versioned<Role>>, StoreError> {
        (**self).get_role(id)
    }

    fn list_roles(&self) -> Result<Vec<Versioned<Role>>, StoreError> {
        (**self).list_roles()
    }

    fn commit(&self, batch: Vec<DocumentWrite>) -> Result<(), StoreError> {
        (**self).commit(batch)
    }
}

impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn get_user(&self, id: UserId) -> Result<Option<Versioned<UserProfile>>, StoreError> {
        (**self).get_user(id)
    }

    fn list_users(&self) -> Result<Vec<Versioned<UserProfile>>, StoreError> {
        (**self).list_users()
    }

    fn find_users_by_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Versioned<UserProfile>>, StoreError> {
        (**self).find_users_by_company(company_id)
    }

    fn get_company(&self, id: CompanyId) -> Result<Option<Versioned<Company>>, StoreError> {
        (**self).get_company(id)
    }

    fn list_companies(&self) -> Result<Vec<Versioned<Company>>, StoreError> {
        (**self).list_companies()
    }

    fn find_company_by_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Option<Versioned<Company>>, StoreError> {
        (**self).find_company_by_owner(owner_id)
    }

    fn find_company_by_join_code(
        &self,
        code: &str,
    ) -> Result<Option<Versioned<Company>>, StoreError> {
        (**self).find_company_by_join_code(code)
    }

    fn get_join_request(
        &self,
        company_id: CompanyId,
        request_id: RequestId,
    ) -> Result<Option<Versioned<JoinRequest>>, StoreError> {
        (**self).get_join_request(company_id, request_id)
    }

    fn list_join_requests(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Versioned<JoinRequest>>, StoreError> {
        (**self).list_join_requests(company_id)
    }

    fn find_join_requests_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Versioned<JoinRequest>>, StoreError> {
        (**self).find_join_requests_by_user(user_id)
    }

    fn get_role(&self, id: &RoleId) -> Result<Option<Versioned<Role>>, StoreError> {
        (**self).get_role(id)
    }

    fn list_roles(&self) -> Result<Vec<Versioned<Role>>, StoreError> {
        (**self).list_roles()
    }

    fn commit(&self, batch: Vec<DocumentWrite>) -> Result<(), StoreError> {
        (**self).commit(batch)
    }
}
