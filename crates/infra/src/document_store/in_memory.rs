use std::collections::HashMap;
use std::sync::RwLock;

use stockflow_auth::{Role, RoleId, builtin_roles};
use stockflow_core::{CompanyId, RequestId, UserId, Versioned};
use stockflow_tenancy::{Company, JoinRequest, UserProfile};

use super::r#trait::{DocumentStore, DocumentWrite, StoreError};

#[derive(Debug, Default)]
struct Collections {
    users: HashMap<UserId, Versioned<UserProfile>>,
    companies: HashMap<CompanyId, Versioned<Company>>,
    join_requests: HashMap<(CompanyId, RequestId), Versioned<JoinRequest>>,
    roles: HashMap<String, Versioned<Role>>,
}

/// In-memory document store.
///
/// Intended for tests/dev. A single lock guards all collections so `commit`
/// batches are atomic without cross-map coordination.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    inner: RwLock<Collections>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with the built-in role catalog.
    pub fn with_builtin_roles() -> Self {
        let mut collections = Collections::default();
        for role in builtin_roles() {
            collections
                .roles
                .insert(role.id.as_str().to_string(), Versioned::new(role, 1));
        }
        Self {
            inner: RwLock::new(collections),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Collections>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get_user(&self, id: UserId) -> Result<Option<Versioned<UserProfile>>, StoreError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    fn list_users(&self) -> Result<Vec<Versioned<UserProfile>>, StoreError> {
        Ok(self.read()?.users.values().cloned().collect())
    }

    fn find_users_by_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Versioned<UserProfile>>, StoreError> {
        Ok(self
            .read()?
            .users
            .values()
            .filter(|v| v.record.company_id == Some(company_id))
            .cloned()
            .collect())
    }

    fn get_company(&self, id: CompanyId) -> Result<Option<Versioned<Company>>, StoreError> {
        Ok(self.read()?.companies.get(&id).cloned())
    }

    fn list_companies(&self) -> Result<Vec<Versioned<Company>>, StoreError> {
        Ok(self.read()?.companies.values().cloned().collect())
    }

    fn find_company_by_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Option<Versioned<Company>>, StoreError> {
        Ok(self
            .read()?
            .companies
            .values()
            .find(|v| v.record.owner_id == owner_id)
            .cloned())
    }

    fn find_company_by_join_code(
        &self,
        code: &str,
    ) -> Result<Option<Versioned<Company>>, StoreError> {
        // Exact match only; no fuzzy search.
        Ok(self
            .read()?
            .companies
            .values()
            .find(|v| v.record.join_code == code)
            .cloned())
    }

    fn get_join_request(
        &self,
        company_id: CompanyId,
        request_id: RequestId,
    ) -> Result<Option<Versioned<JoinRequest>>, StoreError> {
        Ok(self.read()?.join_requests.get(&(company_id, request_id)).cloned())
    }

    fn list_join_requests(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Versioned<JoinRequest>>, StoreError> {
        Ok(self
            .read()?
            .join_requests
            .iter()
            .filter(|((cid, _), _)| *cid == company_id)
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn find_join_requests_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Versioned<JoinRequest>>, StoreError> {
        Ok(self
            .read()?
            .join_requests
            .values()
            .filter(|v| v.record.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_role(&self, id: &RoleId) -> Result<Option<Versioned<Role>>, StoreError> {
        Ok(self.read()?.roles.get(id.as_str()).cloned())
    }

    fn list_roles(&self) -> Result<Vec<Versioned<Role>>, StoreError> {
        Ok(self.read()?.roles.values().cloned().collect())
    }

    fn commit(&self, batch: Vec<DocumentWrite>) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        // Phase 1: check every precondition before touching anything.
        for (idx, write) in batch.iter().enumerate() {
            let (expected, current) = match write {
                DocumentWrite::User { record, expected } => (
                    expected,
                    inner.users.get(&record.id).map(|v| v.version).unwrap_or(0),
                ),
                DocumentWrite::Company { record, expected } => (
                    expected,
                    inner.companies.get(&record.id).map(|v| v.version).unwrap_or(0),
                ),
                DocumentWrite::JoinRequest { record, expected } => (
                    expected,
                    inner
                        .join_requests
                        .get(&(record.company_id, record.id))
                        .map(|v| v.version)
                        .unwrap_or(0),
                ),
                DocumentWrite::Role { record, expected } => (
                    expected,
                    inner
                        .roles
                        .get(record.id.as_str())
                        .map(|v| v.version)
                        .unwrap_or(0),
                ),
            };

            if !expected.matches(current) {
                return Err(StoreError::Conflict(format!(
                    "write {idx}: expected {expected:?}, found {current}"
                )));
            }
        }

        // Phase 2: apply. No fallible step below this line.
        for write in batch {
            match write {
                DocumentWrite::User { record, .. } => {
                    let next = inner.users.get(&record.id).map(|v| v.version).unwrap_or(0) + 1;
                    inner.users.insert(record.id, Versioned::new(record, next));
                }
                DocumentWrite::Company { record, .. } => {
                    let next =
                        inner.companies.get(&record.id).map(|v| v.version).unwrap_or(0) + 1;
                    inner.companies.insert(record.id, Versioned::new(record, next));
                }
                DocumentWrite::JoinRequest { record, .. } => {
                    let key = (record.company_id, record.id);
                    let next = inner.join_requests.get(&key).map(|v| v.version).unwrap_or(0) + 1;
                    inner.join_requests.insert(key, Versioned::new(record, next));
                }
                DocumentWrite::Role { record, .. } => {
                    let key = record.id.as_str().to_string();
                    let next = inner.roles.get(&key).map(|v| v.version).unwrap_or(0) + 1;
                    inner.roles.insert(key, Versioned::new(record, next));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockflow_core::ExpectedVersion;

    fn profile(id: UserId) -> UserProfile {
        UserProfile::new(id, "Test", "User", "test@example.com", Utc::now()).unwrap()
    }

    fn company(owner: UserId, code: &str) -> Company {
        Company::reserve(
            CompanyId::new(),
            owner,
            "Acme Traders",
            code,
            None,
            None,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn create_assigns_version_one() {
        let store = InMemoryDocumentStore::new();
        let user_id = UserId::new();

        store
            .commit(vec![DocumentWrite::create_user(profile(user_id))])
            .unwrap();

        let stored = store.get_user(user_id).unwrap().unwrap();
        assert_eq!(stored.version, 1);
    }

    #[test]
    fn create_twice_conflicts() {
        let store = InMemoryDocumentStore::new();
        let user_id = UserId::new();

        store
            .commit(vec![DocumentWrite::create_user(profile(user_id))])
            .unwrap();
        let err = store
            .commit(vec![DocumentWrite::create_user(profile(user_id))])
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn stale_version_conflicts() {
        let store = InMemoryDocumentStore::new();
        let user_id = UserId::new();
        store
            .commit(vec![DocumentWrite::create_user(profile(user_id))])
            .unwrap();

        // Version is now 1; writing against 0 must fail.
        let err = store
            .commit(vec![DocumentWrite::user(
                profile(user_id),
                ExpectedVersion::Exact(0),
            )])
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn batch_is_all_or_nothing() {
        let store = InMemoryDocumentStore::new();
        let owner = UserId::new();
        let acme = company(owner, "AB12CD");
        let acme_id = acme.id;

        store
            .commit(vec![
                DocumentWrite::create_user(profile(owner)),
                DocumentWrite::create_company(acme.clone()),
            ])
            .unwrap();

        // Valid company write paired with a stale user write: neither applies.
        let mut renamed = acme;
        renamed.name = "Acme Traders Ltd".to_string();
        let err = store
            .commit(vec![
                DocumentWrite::company(renamed, ExpectedVersion::Exact(1)),
                DocumentWrite::user(profile(owner), ExpectedVersion::Exact(7)),
            ])
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let stored = store.get_company(acme_id).unwrap().unwrap();
        assert_eq!(stored.record.name, "Acme Traders");
        assert_eq!(stored.version, 1);
    }

    #[test]
    fn join_code_lookup_is_exact() {
        let store = InMemoryDocumentStore::new();
        let acme = company(UserId::new(), "AB12CD");
        let acme_id = acme.id;
        store
            .commit(vec![DocumentWrite::create_company(acme)])
            .unwrap();

        let found = store.find_company_by_join_code("AB12CD").unwrap().unwrap();
        assert_eq!(found.record.id, acme_id);

        assert!(store.find_company_by_join_code("ab12cd").unwrap().is_none());
        assert!(store.find_company_by_join_code("AB12C").unwrap().is_none());
    }

    #[test]
    fn owner_query_finds_company() {
        let store = InMemoryDocumentStore::new();
        let owner = UserId::new();
        store
            .commit(vec![DocumentWrite::create_company(company(owner, "AAAA11"))])
            .unwrap();

        assert!(store.find_company_by_owner(owner).unwrap().is_some());
        assert!(store.find_company_by_owner(UserId::new()).unwrap().is_none());
    }

    #[test]
    fn builtin_roles_are_seeded() {
        let store = InMemoryDocumentStore::with_builtin_roles();
        assert_eq!(store.list_roles().unwrap().len(), 3);
        assert!(store.get_role(&RoleId::developer()).unwrap().is_some());
    }
}
