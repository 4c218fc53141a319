//! Query-string encoding compatible with `encodeURIComponent`.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes escaped in a query component: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single query key or value.
///
/// Spaces become `%20` rather than `+`, matching browser
/// `encodeURIComponent` output that receiving systems already parse.
///
/// # Examples
/// ```
/// use notify_format::encode_query_component;
///
/// assert_eq!(encode_query_component("a@b.com"), "a%40b.com");
/// assert_eq!(encode_query_component("A B"), "A%20B");
/// ```
#[must_use]
pub fn encode_query_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// Ordered list of query parameters rendered as `k1=v1&k2=v2`.
///
/// Insertion order is preserved; duplicate keys are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    /// Create an empty query string.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a parameter, returning the builder.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Whether no parameters have been added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Unencoded parameters in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.pairs.iter().enumerate() {
            if index > 0 {
                f.write_str("&")?;
            }
            write!(
                f,
                "{}={}",
                encode_query_component(key),
                encode_query_component(value)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("a@b.com", "a%40b.com")]
    #[case("A B", "A%20B")]
    #[case("x+y=z&w", "x%2By%3Dz%26w")]
    #[case("-_.!~*'()", "-_.!~*'()")]
    #[case("José", "Jos%C3%A9")]
    #[case("a/b?c#d", "a%2Fb%3Fc%23d")]
    fn components_match_browser_encoding(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(encode_query_component(raw), expected);
    }

    #[rstest]
    fn query_string_preserves_order_and_encodes_values() {
        let query = QueryString::new()
            .with("uid", "u1")
            .with("email", "a@b.com")
            .with("name", "A B");
        assert_eq!(query.to_string(), "uid=u1&email=a%40b.com&name=A%20B");
        assert_eq!(query.pairs().len(), 3);
    }

    #[rstest]
    fn empty_query_string_renders_nothing() {
        let query = QueryString::new();
        assert!(query.is_empty());
        assert_eq!(query.to_string(), "");
    }
}
