//! Authentication provider boundary.
//!
//! The engine treats authentication as a black box that yields a stable uid
//! and an email for the signed-in session. Real deployments adapt their
//! identity service behind [`AuthProvider`]; tests inject
//! [`StaticAuthProvider`].

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use stockflow_core::UserId;

/// An authenticated identity, prior to resolution to a profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
    pub display_name: Option<String>,
}

impl Principal {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Session source: who, if anyone, is currently signed in.
pub trait AuthProvider: Send + Sync {
    fn current_principal(&self) -> Option<Principal>;
}

impl<P> AuthProvider for Arc<P>
where
    P: AuthProvider + ?Sized,
{
    fn current_principal(&self) -> Option<Principal> {
        (**self).current_principal()
    }
}

/// Test double holding a settable session.
#[derive(Debug, Default)]
pub struct StaticAuthProvider {
    session: RwLock<Option<Principal>>,
}

impl StaticAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(principal: Principal) -> Self {
        Self {
            session: RwLock::new(Some(principal)),
        }
    }

    pub fn sign_in(&self, principal: Principal) {
        if let Ok(mut session) = self.session.write() {
            *session = Some(principal);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut session) = self.session.write() {
            *session = None;
        }
    }
}

impl AuthProvider for StaticAuthProvider {
    fn current_principal(&self) -> Option<Principal> {
        self.session.read().ok().and_then(|s| s.clone())
    }
}
