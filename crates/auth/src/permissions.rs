use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque strings at this layer so the gate can
/// fail closed on keys it has never seen, rather than failing to compile the
/// caller into correctness. The well-known keys are published as constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const VIEW_INVENTORY: &'static str = "viewInventory";
    pub const MANAGE_PRODUCTS: &'static str = "manageProducts";
    pub const SALES_ACCESS: &'static str = "salesAccess";
    pub const PURCHASE_ACCESS: &'static str = "purchaseAccess";
    pub const REPORTS_ACCESS: &'static str = "reportsAccess";
    pub const SETTINGS_ACCESS: &'static str = "settingsAccess";
    pub const ADVANCED_ACCESS: &'static str = "advancedAccess";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The full catalog of known permission keys, in display order.
    pub fn all() -> [&'static str; 7] {
        [
            Self::VIEW_INVENTORY,
            Self::MANAGE_PRODUCTS,
            Self::SALES_ACCESS,
            Self::PURCHASE_ACCESS,
            Self::REPORTS_ACCESS,
            Self::SETTINGS_ACCESS,
            Self::ADVANCED_ACCESS,
        ]
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Flat, explicit permission set carried by a role document.
///
/// Not hierarchical and not inherited: a role grants exactly the keys set to
/// `true` here. Lookups for absent or unknown keys return `false`
/// (fail-closed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeMap<String, bool>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set granting exactly the given keys.
    pub fn granting<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for key in keys {
            set.0.insert(key.into(), true);
        }
        set
    }

    /// Build a set with every known permission key granted.
    pub fn all_granted() -> Self {
        Self::granting(Permission::all())
    }

    /// Fail-closed lookup: absent and unknown keys are denied.
    pub fn allows(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: impl Into<String>, value: bool) {
        self.0.insert(key.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_is_denied() {
        let set = PermissionSet::granting([Permission::SALES_ACCESS]);
        assert!(set.allows(Permission::SALES_ACCESS));
        assert!(!set.allows(Permission::REPORTS_ACCESS));
    }

    #[test]
    fn unknown_key_is_denied() {
        let set = PermissionSet::all_granted();
        assert!(!set.allows("deleteEverything"));
        assert!(!set.allows(""));
    }

    #[test]
    fn explicit_false_is_denied() {
        let mut set = PermissionSet::all_granted();
        set.set(Permission::SETTINGS_ACCESS, false);
        assert!(!set.allows(Permission::SETTINGS_ACCESS));
        assert!(set.allows(Permission::SALES_ACCESS));
    }
}
