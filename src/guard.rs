//! Admin-only screens.
//!
//! The guard decides what an admin page shows from the session alone:
//! 1. Session still resolving → PENDING (show the preloader)
//! 2. Signed-in user with role `admin` → ALLOW
//! 3. Anyone else → DENY ("Accès refusé" toast, redirect to the dashboard)
//!
//! This only spares non-admins a screen they cannot use. The backend
//! enforces roles on every `/api/admin` route; nothing here is a security
//! boundary.

use crate::auth::SessionState;
use crate::config::HOME_ROUTE;
use crate::toast::{Notifier, Toast};

pub const DENIED_TITLE: &str = "Accès refusé";
pub const DENIED_MESSAGE: &str = "Vous n'avez pas les droits d'accès à cette page.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Pending,
    Allow,
    Deny { redirect: String },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AdminRouteGuard;

impl AdminRouteGuard {
    /// Pure decision, no side effects.
    pub fn decide(&self, state: &SessionState) -> GuardDecision {
        match state {
            SessionState::Resolving => GuardDecision::Pending,
            SessionState::Authenticated(user) if user.is_admin() => GuardDecision::Allow,
            _ => GuardDecision::Deny {
                redirect: HOME_ROUTE.to_string(),
            },
        }
    }

    /// Decide and, on denial, push the "Accès refusé" toast.
    pub fn check(&self, state: &SessionState, notifier: &dyn Notifier) -> GuardDecision {
        let decision = self.decide(state);
        if let GuardDecision::Deny { redirect } = &decision {
            tracing::info!(redirect = %redirect, "Admin page refused");
            notifier.notify(Toast::error(DENIED_TITLE, DENIED_MESSAGE));
        }
        decision
    }
}
