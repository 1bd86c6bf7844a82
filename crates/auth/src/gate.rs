//! The role & permission gate.
//!
//! A pure function from (role, permission key) to allow/deny, used both to
//! decide navigation item visibility and to gate mutating operations.

use stockflow_core::{DomainError, DomainResult};

use crate::role::{Role, RoleId};

/// Fail-closed permission check.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
///
/// Unknown or absent permission keys are denied. The developer super-role is
/// NOT special-cased here; developer-scoped views go through
/// [`can_access_developer_views`] instead of a permission key.
pub fn can_access(role: &Role, permission_key: &str) -> bool {
    role.permissions.allows(permission_key)
}

/// Whether a role may see the developer-scoped views (the company review
/// queue, global user/company listings).
///
/// Modeled as a distinct super-role outside the permission-set mechanism.
pub fn can_access_developer_views(role_id: &RoleId) -> bool {
    role_id.is_developer()
}

/// Gate a mutation: like [`can_access`], but as a typed result for `?`
/// propagation at operation boundaries.
pub fn authorize(role: &Role, permission_key: &str) -> DomainResult<()> {
    if can_access(role, permission_key) {
        Ok(())
    } else {
        Err(DomainError::permission_denied(format!(
            "role '{}' lacks permission '{permission_key}'",
            role.id
        )))
    }
}
