//! Cookie session against the backend (Sanctum SPA flow).
//!
//! Login is two requests: `GET /sanctum/csrf-cookie` sets the `XSRF-TOKEN`
//! cookie, then `POST /login` carries it back in `X-XSRF-TOKEN`. The signed-in
//! user is read from `GET /api/user`; 401 there means no session, 409 means
//! the account still has to verify its e-mail.
//!
//! The session state is published on a `watch` channel so layouts and guards
//! can wait for it to resolve.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::ClientError;
use crate::http::ApiClient;
use crate::models::User;

pub const LOGIN_ROUTE: &str = "/login";
pub const VERIFY_EMAIL_ROUTE: &str = "/verify-email";
pub const VERIFICATION_LINK_SENT: &str = "verification-link-sent";
pub const MISSING_CREDENTIALS: &str = "Veuillez saisir votre email et votre mot de passe";

/// What is known about the current visitor.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// `GET /api/user` has not answered yet.
    Resolving,
    Authenticated(User),
    /// Signed in, but the backend refuses access until the e-mail is verified.
    Unverified,
    Anonymous,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Resolving)
    }
}

/// Per-page access policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Middleware {
    /// Signed-in users only. `redirect_if_verified` sends a verified user
    /// away from the verification page.
    Auth { redirect_if_verified: Option<String> },
    /// Visitors only; signed-in users are sent to `redirect_if_authenticated`.
    Guest { redirect_if_authenticated: String },
}

/// What the page should do for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Wait,
    Render,
    Redirect(String),
}

impl Middleware {
    pub fn auth() -> Self {
        Self::Auth {
            redirect_if_verified: None,
        }
    }

    pub fn guest(redirect: &str) -> Self {
        Self::Guest {
            redirect_if_authenticated: redirect.to_string(),
        }
    }

    pub fn decide(&self, state: &SessionState, path: &str) -> RouteDecision {
        match self {
            Self::Guest {
                redirect_if_authenticated,
            } => match state {
                SessionState::Authenticated(_) => {
                    RouteDecision::Redirect(redirect_if_authenticated.clone())
                }
                _ => RouteDecision::Render,
            },
            Self::Auth {
                redirect_if_verified,
            } => match state {
                SessionState::Resolving => RouteDecision::Wait,
                SessionState::Anonymous => RouteDecision::Redirect(LOGIN_ROUTE.to_string()),
                SessionState::Unverified => unverified(path),
                SessionState::Authenticated(user) if !user.is_verified() => unverified(path),
                SessionState::Authenticated(_) => match redirect_if_verified {
                    Some(target) if path == VERIFY_EMAIL_ROUTE => {
                        RouteDecision::Redirect(target.clone())
                    }
                    _ => RouteDecision::Render,
                },
            },
        }
    }
}

fn unverified(path: &str) -> RouteDecision {
    if path == VERIFY_EMAIL_ROUTE {
        RouteDecision::Render
    } else {
        RouteDecision::Redirect(VERIFY_EMAIL_ROUTE.to_string())
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl std::fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct StatusBody {
    #[serde(default)]
    status: Option<String>,
}

// ═══════════════════════════════════════════════════════════
// AuthSession
// ═══════════════════════════════════════════════════════════

pub struct AuthSession {
    api: Arc<ApiClient>,
    state: watch::Sender<SessionState>,
}

impl AuthSession {
    pub fn new(api: Arc<ApiClient>) -> Self {
        let (state, _) = watch::channel(SessionState::Resolving);
        Self { api, state }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn is_admin(&self) -> bool {
        self.state.borrow().user().is_some_and(User::is_admin)
    }

    pub fn is_medecin(&self) -> bool {
        self.state.borrow().user().is_some_and(User::is_medecin)
    }

    /// `GET /api/user`. 401 and 409 are session answers, not failures.
    pub async fn resolve(&self) -> Result<SessionState, ClientError> {
        let next = match self.api.get::<User>("/api/user").await {
            Ok(user) => SessionState::Authenticated(user),
            Err(e) if e.is_unauthenticated() => SessionState::Anonymous,
            Err(e) if e.status() == Some(409) => SessionState::Unverified,
            Err(e) => {
                tracing::error!(error = %e, "Could not resolve session");
                return Err(e);
            }
        };
        self.state.send_replace(next.clone());
        Ok(next)
    }

    /// Fetch the CSRF cookie, post the credentials, then reload the user.
    ///
    /// A 422 comes back as `ClientError::Server` with per-field messages.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionState, ClientError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::validation(MISSING_CREDENTIALS));
        }

        let _: serde_json::Value = self.api.get("/sanctum/csrf-cookie").await?;
        let credentials = Credentials {
            email: email.trim(),
            password,
        };
        let _: serde_json::Value = self.api.post("/login", &credentials).await.inspect_err(|e| {
            tracing::warn!(status = ?e.status(), "Login rejected");
        })?;

        tracing::info!("Signed in");
        self.resolve().await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let _: serde_json::Value = self.api.post("/logout", &serde_json::json!({})).await?;
        tracing::info!("Signed out");
        self.state.send_replace(SessionState::Anonymous);
        Ok(())
    }

    /// Ask for a new verification e-mail. Returns the backend status string.
    pub async fn resend_email_verification(&self) -> Result<String, ClientError> {
        let body: StatusBody = self
            .api
            .post("/email/verification-notification", &serde_json::json!({}))
            .await?;
        Ok(body
            .status
            .unwrap_or_else(|| VERIFICATION_LINK_SENT.to_string()))
    }
}
