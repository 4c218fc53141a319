//! Driven ports used by the session force-reset panel.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by the external authentication service.
    pub enum AuthServiceError {
        /// The sign-out request could not be completed.
        SignOut { message: String } => "sign-out failed: {message}",
    }
}

/// Local cache of authentication state held by the client.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStateStore: Send + Sync {
    /// Drop every cached credential and user record.
    fn clear(&self);
}

/// External authentication service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// End the session with the identity provider.
    async fn sign_out(&self) -> Result<(), AuthServiceError>;
}

/// Full reload of the client after its state has been reset.
#[cfg_attr(test, mockall::automock)]
pub trait PageReloader: Send + Sync {
    /// Discard in-memory state and start again from persisted state.
    fn reload(&self);
}
