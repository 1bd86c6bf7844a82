//! Navigation builders: the home menu and the dashboard sidebar.
//!
//! Both are pure views over already-resolved documents. The home menu is
//! driven by the tenancy state machine; the sidebar is driven by the
//! permission gate. Neither touches the store.

use stockflow_auth::{Permission, Role, can_access};
use stockflow_tenancy::{TenancyAction, TenancyState, UserProfile};

/// One entry of the home menu, with the reason it is greyed out (if it is).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub enabled: bool,
    pub disabled_reason: Option<&'static str>,
}

impl MenuEntry {
    fn enabled(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            enabled: true,
            disabled_reason: None,
        }
    }

    fn disabled(id: &'static str, label: &'static str, reason: &'static str) -> Self {
        Self {
            id,
            label,
            enabled: false,
            disabled_reason: Some(reason),
        }
    }
}

fn dashboard_block_reason(state: TenancyState) -> &'static str {
    match state {
        TenancyState::NoCompany => "no business membership yet",
        TenancyState::CompanyPendingDetails => "registration details still required",
        TenancyState::CompanyUnderReview => "registration is under review",
        TenancyState::CompanyRejected => "registration was rejected",
        TenancyState::ActiveMember => "",
    }
}

fn onboarding_block_reason(state: TenancyState) -> &'static str {
    match state {
        TenancyState::NoCompany => "",
        TenancyState::CompanyPendingDetails | TenancyState::CompanyUnderReview => {
            "a registration is already in flight"
        }
        TenancyState::CompanyRejected => "registration was rejected",
        TenancyState::ActiveMember => "already a member of a business",
    }
}

/// Build the five home entries for a signed-in user.
///
/// `state` must be freshly derived via `classify`; the menu never caches it.
/// The developer panel leads the list and is the only entry gated by the
/// developer predicate rather than tenancy state.
pub fn home_menu(profile: &UserProfile, state: TenancyState) -> Vec<MenuEntry> {
    let mut entries = Vec::with_capacity(5);

    entries.push(if profile.is_developer() {
        MenuEntry::enabled("developer", "Developer panel")
    } else {
        MenuEntry::disabled("developer", "Developer panel", "developer role required")
    });

    entries.push(if state.permits(TenancyAction::AccessDashboard) {
        MenuEntry::enabled("dashboard", "Dashboard")
    } else {
        MenuEntry::disabled("dashboard", "Dashboard", dashboard_block_reason(state))
    });

    // The register entry also covers finishing a half-done registration.
    let register_open = state.permits(TenancyAction::RegisterBusiness)
        || state.permits(TenancyAction::SubmitDetails);
    entries.push(if register_open {
        MenuEntry::enabled("register", "Register business")
    } else {
        MenuEntry::disabled("register", "Register business", onboarding_block_reason(state))
    });

    entries.push(if state.permits(TenancyAction::JoinBusiness) {
        MenuEntry::enabled("join", "Join business")
    } else {
        MenuEntry::disabled("join", "Join business", onboarding_block_reason(state))
    });

    entries.push(if state.permits(TenancyAction::ViewJoinRequests) {
        MenuEntry::enabled("join_requests", "My join requests")
    } else {
        MenuEntry::disabled(
            "join_requests",
            "My join requests",
            "already a member of a business",
        )
    });

    entries
}

/// One sidebar item of the member dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub id: &'static str,
    pub label: &'static str,
}

/// (id, label, required permission). `None` means visible to every member.
const SIDEBAR: &[(&str, &str, Option<&str>)] = &[
    ("dashboard", "Dashboard", None),
    ("inventory", "Inventory", Some(Permission::VIEW_INVENTORY)),
    ("products", "Products", Some(Permission::MANAGE_PRODUCTS)),
    ("sales", "Sales", Some(Permission::SALES_ACCESS)),
    ("pos", "POS", Some(Permission::SALES_ACCESS)),
    ("purchases", "Purchases", Some(Permission::PURCHASE_ACCESS)),
    ("suppliers", "Suppliers", Some(Permission::PURCHASE_ACCESS)),
    ("reports", "Reports", Some(Permission::REPORTS_ACCESS)),
    ("company", "Company", Some(Permission::SETTINGS_ACCESS)),
    ("settings", "Settings", Some(Permission::SETTINGS_ACCESS)),
    ("subscription", "Subscription", Some(Permission::SETTINGS_ACCESS)),
    ("security", "Security", Some(Permission::ADVANCED_ACCESS)),
];

const DEVELOPER_SIDEBAR: &[(&str, &str)] =
    &[("dev_companies", "All companies"), ("dev_users", "All users")];

/// Build the sidebar for a member, filtered through the permission gate.
///
/// Items whose permission the role does not grant are omitted entirely (the
/// gate fails closed, so an unknown key hides the item). Developer entries
/// appear only when `developer` is set.
pub fn dashboard_nav(role: &Role, developer: bool) -> Vec<NavItem> {
    let mut items: Vec<NavItem> = SIDEBAR
        .iter()
        .filter(|(_, _, required)| required.map_or(true, |key| can_access(role, key)))
        .map(|&(id, label, _)| NavItem { id, label })
        .collect();

    if developer {
        items.extend(
            DEVELOPER_SIDEBAR
                .iter()
                .map(|&(id, label)| NavItem { id, label }),
        );
    }

    items
}
