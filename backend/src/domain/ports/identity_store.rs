//! Driven port exposing the signed-in user, if any.
//!
//! Consumers depend on this trait rather than a global session singleton so
//! that the redirect controller and debug panels can be driven from tests.

use std::sync::{Mutex, PoisonError};

use crate::domain::AuthenticatedUser;

/// Read-only view of the external identity/session store.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityStore: Send + Sync {
    /// Current authenticated user, or `None` while nobody is signed in.
    fn current_user(&self) -> Option<AuthenticatedUser>;
}

/// In-memory identity store whose user can be swapped at runtime.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    user: Mutex<Option<AuthenticatedUser>>,
}

impl InMemoryIdentityStore {
    /// Create a store holding `user`.
    pub fn new(user: Option<AuthenticatedUser>) -> Self {
        Self {
            user: Mutex::new(user),
        }
    }

    /// Replace the stored user, mimicking a sign-in or sign-out.
    pub fn set_user(&self, user: Option<AuthenticatedUser>) {
        *self.user.lock().unwrap_or_else(PoisonError::into_inner) = user;
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn current_user(&self) -> Option<AuthenticatedUser> {
        self.user
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn in_memory_store_reflects_updates() {
        let store = InMemoryIdentityStore::default();
        assert!(store.current_user().is_none());

        store.set_user(Some(AuthenticatedUser::new("u1", "a@b.com")));
        assert_eq!(
            store.current_user().map(|user| user.id),
            Some("u1".to_owned())
        );

        store.set_user(None);
        assert!(store.current_user().is_none());
    }
}
