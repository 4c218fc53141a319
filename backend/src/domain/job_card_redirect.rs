//! Hand-off from the portal to the external Job Card system.
//!
//! Once the identity store reports a signed-in user, the controller builds a
//! query string describing that user and performs a single replacing
//! navigation to the Job Card origin. Until then it renders a loading view
//! and waits; an upstream routing guard only sends users here while they are
//! authenticating, so there is no timeout.

use std::fmt;
use std::sync::Arc;

use notify_format::QueryString;
use tracing::{debug, warn};
use url::Url;

use crate::domain::AuthenticatedUser;
use crate::domain::ports::{IdentityStore, Navigator};

/// Default origin of the Job Card system.
pub const DEFAULT_JOB_CARD_ORIGIN: &str = "https://jobcards.pr-system.web.app";

/// Reasons a configured Job Card origin is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobCardOriginError {
    /// The value is not an absolute URL.
    Unparseable { message: String },
    /// Only `http` and `https` targets are navigable.
    UnsupportedScheme { scheme: String },
    /// The origin must not carry its own query or fragment.
    HasQueryOrFragment,
}

impl fmt::Display for JobCardOriginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparseable { message } => write!(f, "job card origin is not a URL: {message}"),
            Self::UnsupportedScheme { scheme } => {
                write!(f, "job card origin must use http or https, not {scheme}")
            }
            Self::HasQueryOrFragment => {
                write!(f, "job card origin must not include a query or fragment")
            }
        }
    }
}

impl std::error::Error for JobCardOriginError {}

/// Validated Job Card origin. The redirect target is this string with the
/// identity query appended verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCardOrigin(String);

impl JobCardOrigin {
    /// Validate an origin supplied by configuration.
    pub fn parse(raw: &str) -> Result<Self, JobCardOriginError> {
        let trimmed = raw.trim();
        let parsed = Url::parse(trimmed).map_err(|err| JobCardOriginError::Unparseable {
            message: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(JobCardOriginError::UnsupportedScheme {
                scheme: parsed.scheme().to_owned(),
            });
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(JobCardOriginError::HasQueryOrFragment);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The origin as written.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Build the hand-off target for `user`.
    pub fn redirect_target(&self, user: &AuthenticatedUser) -> String {
        format!("{}?{}", self.0, identity_query(user))
    }
}

impl Default for JobCardOrigin {
    fn default() -> Self {
        Self(DEFAULT_JOB_CARD_ORIGIN.to_owned())
    }
}

/// Query parameters the Job Card system reads to recognise the session.
///
/// Key names and order are part of the contract with the receiving system.
pub fn identity_query(user: &AuthenticatedUser) -> QueryString {
    QueryString::new()
        .with("uid", user.id.as_str())
        .with("email", user.email.as_str())
        .with("firstName", user.first_name())
        .with("lastName", user.last_name())
        .with("name", user.display_name())
}

/// Controller lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectState {
    /// No authenticated user observed yet.
    Waiting,
    /// Navigation has been issued for `user_id`.
    Redirected { user_id: String, target: String },
}

/// What the redirect page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectView {
    /// Spinner shown while waiting for authentication.
    Loading,
    /// Navigation has been requested.
    Redirecting { target: String },
}

/// Reacts to identity changes and hands the user off exactly once.
pub struct RedirectController<S, N> {
    store: Arc<S>,
    navigator: Arc<N>,
    origin: JobCardOrigin,
    state: RedirectState,
}

impl<S, N> RedirectController<S, N>
where
    S: IdentityStore,
    N: Navigator,
{
    /// Create a controller in the [`RedirectState::Waiting`] state.
    pub fn new(store: Arc<S>, navigator: Arc<N>, origin: JobCardOrigin) -> Self {
        Self {
            store,
            navigator,
            origin,
            state: RedirectState::Waiting,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &RedirectState {
        &self.state
    }

    /// Render the current state.
    pub fn view(&self) -> RedirectView {
        match &self.state {
            RedirectState::Waiting => RedirectView::Loading,
            RedirectState::Redirected { target, .. } => RedirectView::Redirecting {
                target: target.clone(),
            },
        }
    }

    /// Handle a change notification from the identity store.
    ///
    /// Navigates on the first observation of a present user. Repeated
    /// notifications never navigate again.
    pub fn on_identity_change(&mut self) -> RedirectView {
        if let RedirectState::Redirected { user_id, .. } = &self.state {
            if let Some(user) = self.store.current_user().filter(|user| &user.id != user_id) {
                warn!(
                    redirected_user = %user_id,
                    observed_user = %user.id,
                    "identity changed after job card redirect; ignoring"
                );
            }
            return self.view();
        }

        let Some(user) = self
            .store
            .current_user()
            .filter(AuthenticatedUser::is_present)
        else {
            debug!("waiting for authenticated user before job card redirect");
            return RedirectView::Loading;
        };

        let target = self.origin.redirect_target(&user);
        debug!(user_id = %user.id, "redirecting to job card system");
        self.navigator.replace(&target);
        self.state = RedirectState::Redirected {
            user_id: user.id,
            target,
        };
        self.view()
    }
}
