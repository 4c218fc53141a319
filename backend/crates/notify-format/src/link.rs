//! Deep links embedded in outbound notifications.

/// Base URL of the production PR system.
///
/// Links are always built against production, whatever environment the
/// sending code runs in, so that emails stay valid for their recipients.
pub const PRODUCTION_BASE_URL: &str = "https://pr-system.web.app";

/// Build the production deep link for a PR identifier.
///
/// The identifier is not validated; any string is appended verbatim.
///
/// # Examples
/// ```
/// use notify_format::generate_link;
///
/// assert_eq!(generate_link("PR-0042"), "https://pr-system.web.app/pr/PR-0042");
/// ```
#[must_use]
pub fn generate_link(identifier: &str) -> String {
    link_for(PRODUCTION_BASE_URL, identifier)
}

/// Build a PR deep link against an explicit base URL.
///
/// A trailing `/` on `base` is dropped so the path separator is never
/// doubled.
#[must_use]
pub fn link_for(base: &str, identifier: &str) -> String {
    format!("{}/pr/{identifier}", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc123")]
    #[case("PR-2024-0001")]
    #[case("")]
    #[case("with space")]
    fn production_links_concatenate_identifier(#[case] identifier: &str) {
        assert_eq!(
            generate_link(identifier),
            format!("{PRODUCTION_BASE_URL}/pr/{identifier}")
        );
    }

    #[rstest]
    #[case("http://localhost:5173/", "http://localhost:5173/pr/x")]
    #[case("http://localhost:5173", "http://localhost:5173/pr/x")]
    fn explicit_base_never_doubles_separator(#[case] base: &str, #[case] expected: &str) {
        assert_eq!(link_for(base, "x"), expected);
    }
}
