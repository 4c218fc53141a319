//! Read-only view of the current session for the debug panel.

use std::fmt;

use serde::Serialize;

use crate::domain::AuthenticatedUser;

/// Fields shown on the current-session panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionSnapshot {
    /// No user is signed in.
    SignedOut,
    /// A user is signed in.
    SignedIn {
        id: String,
        email: String,
        name: String,
        role: Option<String>,
        permission_level: Option<u8>,
        organization: Option<String>,
        is_procurement: bool,
        is_admin: bool,
        is_active: bool,
    },
}

impl SessionSnapshot {
    /// Project the store's user, if any, into panel fields.
    pub fn from_user(user: Option<&AuthenticatedUser>) -> Self {
        let Some(user) = user.filter(|user| user.is_present()) else {
            return Self::SignedOut;
        };
        Self::SignedIn {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.display_name(),
            role: user.role.clone(),
            permission_level: user.permission_level,
            organization: user.organization.clone(),
            is_procurement: user.is_procurement(),
            is_admin: user.is_admin(),
            is_active: user.is_active,
        }
    }
}

impl fmt::Display for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self::SignedIn {
            id,
            email,
            name,
            role,
            permission_level,
            organization,
            is_procurement,
            is_admin,
            is_active,
        } = self
        else {
            return writeln!(f, "Not signed in");
        };

        let unset = "-".to_owned();
        writeln!(f, "id: {id}")?;
        writeln!(f, "email: {email}")?;
        writeln!(f, "name: {name}")?;
        writeln!(f, "role: {}", role.as_ref().unwrap_or(&unset))?;
        writeln!(
            f,
            "permission level: {}",
            permission_level.map_or_else(|| unset.clone(), |level| level.to_string())
        )?;
        writeln!(f, "organization: {}", organization.as_ref().unwrap_or(&unset))?;
        writeln!(f, "procurement: {is_procurement}")?;
        writeln!(f, "admin: {is_admin}")?;
        writeln!(f, "active: {is_active}")
    }
}
