//! Session force-reset used by the admin debug panel.
//!
//! Steps run in a fixed order: clear local state, sign out, reload. Clearing
//! first means nothing cached can be read back between sign-out and reload.
//! The reload only happens after a successful sign-out.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::ports::{AuthService, PageReloader, SessionStateStore};

/// Result of a force-reset attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResetOutcome {
    /// Local state cleared, signed out, and reload requested.
    Reloaded,
    /// Local state cleared but the sign-out call failed; no reload issued.
    SignOutFailed { message: String },
}

impl SessionResetOutcome {
    /// Message suitable for showing to the operator.
    pub fn message(&self) -> String {
        match self {
            Self::Reloaded => "Session reset; reloading".to_owned(),
            Self::SignOutFailed { message } => format!("Session reset failed: {message}"),
        }
    }
}

/// Orchestrates the destructive session reset.
#[derive(Clone)]
pub struct SessionResetService<S, A, R> {
    state: Arc<S>,
    auth: Arc<A>,
    reloader: Arc<R>,
}

impl<S, A, R> SessionResetService<S, A, R>
where
    S: SessionStateStore,
    A: AuthService,
    R: PageReloader,
{
    /// Create a reset service over the three collaborating ports.
    pub fn new(state: Arc<S>, auth: Arc<A>, reloader: Arc<R>) -> Self {
        Self {
            state,
            auth,
            reloader,
        }
    }

    /// Clear local state, sign out, then reload on success.
    ///
    /// Sign-out failures are logged and reported, never propagated.
    pub async fn force_reset(&self) -> SessionResetOutcome {
        self.state.clear();
        match self.auth.sign_out().await {
            Ok(()) => {
                info!("session cleared and signed out; reloading");
                self.reloader.reload();
                SessionResetOutcome::Reloaded
            }
            Err(err) => {
                error!(error = %err, "session force-reset sign-out failed");
                SessionResetOutcome::SignOutFailed {
                    message: err.to_string(),
                }
            }
        }
    }
}
