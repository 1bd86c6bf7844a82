//! `stockflow-tenancy`: tenant membership records and the tenancy state
//! machine.
//!
//! Holds the user profile, company, and join-request documents plus the pure
//! `classify` function that derives a user's tenancy state fresh at every
//! decision point (derived state is never persisted or cached).

pub mod company;
pub mod join_request;
pub mod state;
pub mod user;

pub use company::{Company, CompanyDetails, CompanyStatus, ReviewDecision};
pub use join_request::{JoinDecision, JoinRequest, JoinRequestStatus};
pub use state::{TenancyAction, TenancyState, classify};
pub use user::{UserProfile, UserStatus};
