//! `stockflow-auth`: roles, permissions, and the pure access gate.
//!
//! This crate is intentionally decoupled from storage and transport: it holds
//! the global role catalog model and the fail-closed permission check that
//! gates both navigation visibility and mutation authorization.

pub mod gate;
pub mod permissions;
pub mod role;

pub use gate::{authorize, can_access, can_access_developer_views};
pub use permissions::{Permission, PermissionSet};
pub use role::{Role, RoleId, builtin_roles};
