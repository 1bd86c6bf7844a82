//! `stockflow-onboarding`: the membership and access-control services.
//!
//! Ties the tenancy documents, the permission gate, and the document store
//! together: identity resolution, the two-phase company registration with
//! developer review, join-request brokering, and the navigation builders.
//! Services hold injected store handles; nothing here reads ambient globals.

pub mod broker;
pub mod identity;
pub mod lifecycle;
pub mod nav;

pub use broker::{JoinRequestBroker, JoinRolePolicy};
pub use identity::IdentityResolver;
pub use lifecycle::CompanyLifecycle;
pub use nav::{MenuEntry, NavItem, dashboard_nav, home_menu};
