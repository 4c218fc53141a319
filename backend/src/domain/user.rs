//! Authenticated session user as cached by the identity store.

use serde::{Deserialize, Serialize};

/// Permission levels that grant the procurement role.
pub const PROCUREMENT_PERMISSION_LEVELS: [u8; 2] = [1, 3];

/// Permission level reserved for administrators.
pub const ADMIN_PERMISSION_LEVEL: u8 = 1;

/// Signed-in user read from the external identity store.
///
/// The store owns the lifecycle of this record; the portal only reads it.
/// Optional fields default to `None` so partially populated profiles still
/// deserialise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl AuthenticatedUser {
    /// Minimal user with only an identifier and email.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            first_name: None,
            last_name: None,
            role: None,
            permission_level: None,
            organization: None,
            is_active: true,
        }
    }

    /// Attach first and last names.
    #[must_use]
    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    /// Attach role, permission level, and organisation.
    #[must_use]
    pub fn with_access(
        mut self,
        role: impl Into<String>,
        permission_level: u8,
        organization: impl Into<String>,
    ) -> Self {
        self.role = Some(role.into());
        self.permission_level = Some(permission_level);
        self.organization = Some(organization.into());
        self
    }

    /// Whether the record identifies someone. Empty ids are treated as absent.
    pub fn is_present(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// First name, or an empty string.
    pub fn first_name(&self) -> &str {
        self.first_name.as_deref().unwrap_or_default()
    }

    /// Last name, or an empty string.
    pub fn last_name(&self) -> &str {
        self.last_name.as_deref().unwrap_or_default()
    }

    /// `first last` trimmed, falling back to the email when both are blank.
    pub fn display_name(&self) -> String {
        let composed = format!("{} {}", self.first_name(), self.last_name());
        let trimmed = composed.trim();
        if trimmed.is_empty() {
            self.email.clone()
        } else {
            trimmed.to_owned()
        }
    }

    /// Whether the permission level grants the procurement role.
    pub fn is_procurement(&self) -> bool {
        self.permission_level
            .is_some_and(|level| PROCUREMENT_PERMISSION_LEVELS.contains(&level))
    }

    /// Whether the permission level is the administrator level.
    pub fn is_admin(&self) -> bool {
        self.permission_level == Some(ADMIN_PERMISSION_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Some("A"), Some("B"), "A B")]
    #[case(Some("  Ada "), Some(""), "Ada")]
    #[case(None, Some("Lovelace"), "Lovelace")]
    #[case(None, None, "x@y.com")]
    #[case(Some(" "), Some(" "), "x@y.com")]
    fn display_name_composes_names_or_falls_back_to_email(
        #[case] first: Option<&str>,
        #[case] last: Option<&str>,
        #[case] expected: &str,
    ) {
        let mut user = AuthenticatedUser::new("u1", "x@y.com");
        user.first_name = first.map(str::to_owned);
        user.last_name = last.map(str::to_owned);
        assert_eq!(user.display_name(), expected);
    }

    #[rstest]
    #[case(None, false, false)]
    #[case(Some(1), true, true)]
    #[case(Some(2), false, false)]
    #[case(Some(3), true, false)]
    #[case(Some(5), false, false)]
    fn permission_levels_derive_role_flags(
        #[case] level: Option<u8>,
        #[case] procurement: bool,
        #[case] admin: bool,
    ) {
        let mut user = AuthenticatedUser::new("u1", "a@b.com");
        user.permission_level = level;
        assert_eq!(user.is_procurement(), procurement);
        assert_eq!(user.is_admin(), admin);
    }

    #[rstest]
    fn deserialises_partial_profiles_with_defaults() {
        let user: AuthenticatedUser =
            serde_json::from_value(json!({"id": "u1", "permissionLevel": 3}))
                .expect("partial profile");
        assert_eq!(user.email, "");
        assert!(user.is_active);
        assert!(user.is_procurement());
        assert_eq!(user.first_name(), "");
    }

    #[rstest]
    #[case("", false)]
    #[case("   ", false)]
    #[case("u1", true)]
    fn blank_ids_are_not_present(#[case] id: &str, #[case] expected: bool) {
        assert_eq!(AuthenticatedUser::new(id, "a@b.com").is_present(), expected);
    }
}
