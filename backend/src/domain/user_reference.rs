//! Canonical user references derived from identity-provider profiles.
//!
//! Identity providers hand back loosely shaped JSON. The mapper is total over
//! that input: every output field has a fallback, so a malformed profile
//! degrades to placeholders instead of failing a notification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name used when a profile has neither a display name nor an email.
pub const UNKNOWN_USER_NAME: &str = "Unknown User";

/// Identity-provider user record with every field optional.
///
/// Deserialises from any JSON value. Non-object input and non-string fields
/// are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct ExternalUser {
    pub uid: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl ExternalUser {
    /// Read the known fields out of an arbitrary JSON value.
    ///
    /// `uid` is preferred over `id`; `displayName` over `display_name`.
    pub fn from_value(value: &Value) -> Self {
        let text = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str))
                .map(str::to_owned)
        };
        Self {
            uid: text(&["uid", "id"]),
            display_name: text(&["displayName", "display_name"]),
            email: text(&["email"]),
        }
    }
}

impl From<Value> for ExternalUser {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

/// Reference to a user embedded in PR records and notifications.
///
/// ## Invariants
/// - `name` is never empty: display name, then email, then
///   [`UNKNOWN_USER_NAME`].
/// - `email`, `first_name` and `last_name` default to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReference {
    pub id: String,
    pub name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Normalise an identity-provider profile into a [`UserReference`].
///
/// # Examples
/// ```
/// use pr_portal::domain::{ExternalUser, map_to_user_reference};
///
/// let external = ExternalUser {
///     uid: Some("u1".into()),
///     display_name: Some("Jane Doe".into()),
///     email: Some("jane@example.com".into()),
/// };
/// let reference = map_to_user_reference(&external);
/// assert_eq!(reference.first_name, "Jane");
/// assert_eq!(reference.last_name, "Doe");
/// ```
pub fn map_to_user_reference(external: &ExternalUser) -> UserReference {
    let display_name = external
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let email = external.email.clone().unwrap_or_default();

    let name = display_name
        .map(str::to_owned)
        .or_else(|| Some(email.clone()).filter(|value| !value.is_empty()))
        .unwrap_or_else(|| UNKNOWN_USER_NAME.to_owned());

    let (first_name, last_name) = display_name.map(split_name).unwrap_or_default();

    UserReference {
        id: external.uid.clone().unwrap_or_default(),
        name,
        email,
        first_name,
        last_name,
    }
}

fn split_name(display_name: &str) -> (String, String) {
    let mut tokens = display_name.split_whitespace();
    let first = tokens.next().unwrap_or_default().to_owned();
    let rest = tokens.collect::<Vec<_>>().join(" ");
    (first, rest)
}
