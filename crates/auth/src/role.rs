use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use stockflow_core::{DomainError, DomainResult};

use crate::permissions::{Permission, PermissionSet};

/// Role identifier used for RBAC.
///
/// Roles are opaque string slugs at this layer ("developer", "admin",
/// "staff", ...); the catalog document maps them to permissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Cow<'static, str>);

impl RoleId {
    pub const DEVELOPER: &'static str = "developer";
    pub const ADMIN: &'static str = "admin";
    pub const STAFF: &'static str = "staff";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn developer() -> Self {
        Self::new(Self::DEVELOPER)
    }

    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    pub fn staff() -> Self {
        Self::new(Self::STAFF)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The developer super-role sits outside the permission-set mechanism.
    pub fn is_developer(&self) -> bool {
        self.as_str() == Self::DEVELOPER
    }
}

impl core::fmt::Display for RoleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role catalog document.
///
/// The catalog is global (not tenant-scoped). Roles flagged `system` are
/// immutable at the data level: permission mutation is rejected here rather
/// than by UI convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub permissions: PermissionSet,
    /// System roles reject permission changes (the developer role, notably).
    pub system: bool,
}

impl Role {
    pub fn new(id: RoleId, name: impl Into<String>, permissions: PermissionSet) -> Self {
        Self {
            id,
            name: name.into(),
            permissions,
            system: false,
        }
    }

    pub fn system(id: RoleId, name: impl Into<String>, permissions: PermissionSet) -> Self {
        Self {
            system: true,
            ..Self::new(id, name, permissions)
        }
    }

    /// Toggle a permission on this role.
    ///
    /// Fails with `PermissionDenied` for system roles: the invariant lives
    /// on the record, not in the caller.
    pub fn set_permission(&mut self, key: impl Into<String>, value: bool) -> DomainResult<()> {
        if self.system {
            return Err(DomainError::permission_denied(format!(
                "role '{}' is a system role and cannot be modified",
                self.id
            )));
        }
        self.permissions.set(key, value);
        Ok(())
    }
}

/// The built-in role catalog seeded for every deployment.
///
/// - `developer`: system role, every permission (platform operator).
/// - `admin`: every permission, granted to a company owner on approval.
/// - `staff`: inventory visibility and sales only, granted on join-approval.
pub fn builtin_roles() -> Vec<Role> {
    vec![
        Role::system(RoleId::developer(), "Developer", PermissionSet::all_granted()),
        Role::new(RoleId::admin(), "Admin", PermissionSet::all_granted()),
        Role::new(
            RoleId::staff(),
            "Staff",
            PermissionSet::granting([Permission::VIEW_INVENTORY, Permission::SALES_ACCESS]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_role_rejects_permission_change() {
        let mut developer = builtin_roles()
            .into_iter()
            .find(|r| r.id.is_developer())
            .unwrap();

        let err = developer
            .set_permission(Permission::SETTINGS_ACCESS, false)
            .unwrap_err();
        match err {
            DomainError::PermissionDenied(_) => {}
            other => panic!("expected PermissionDenied, got {other:?}"),
        }

        // Unchanged.
        assert!(developer.permissions.allows(Permission::SETTINGS_ACCESS));
    }

    #[test]
    fn non_system_role_accepts_permission_change() {
        let mut staff = Role::new(RoleId::staff(), "Staff", PermissionSet::new());
        staff
            .set_permission(Permission::REPORTS_ACCESS, true)
            .unwrap();
        assert!(staff.permissions.allows(Permission::REPORTS_ACCESS));
    }

    #[test]
    fn builtin_catalog_shape() {
        let roles = builtin_roles();
        assert_eq!(roles.len(), 3);

        let staff = roles.iter().find(|r| r.id.as_str() == RoleId::STAFF).unwrap();
        assert!(staff.permissions.allows(Permission::VIEW_INVENTORY));
        assert!(staff.permissions.allows(Permission::SALES_ACCESS));
        assert!(!staff.permissions.allows(Permission::SETTINGS_ACCESS));
        assert!(!staff.system);

        let developer = roles.iter().find(|r| r.id.is_developer()).unwrap();
        assert!(developer.system);
    }
}
