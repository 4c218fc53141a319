//! Display formatting and deep-link helpers for procurement request (PR)
//! notifications.
//!
//! The rendering helpers are total: absent or falsy input renders as the
//! [`NOT_SPECIFIED`] sentinel instead of failing. [`try_format_date`] is the
//! one fallible entry point, for callers that need to tell an unparseable
//! date apart from a rendered one. Nothing here performs
//! I/O, so the helpers are safe to call from any adapter that composes
//! outbound email bodies.

mod amount;
mod date;
mod link;
mod query;

pub use amount::{CurrencyCode, DEFAULT_CURRENCY, format_amount};
pub use date::{DateFormatError, DateInput, INVALID_DATE, format_date, try_format_date};
pub use link::{PRODUCTION_BASE_URL, generate_link, link_for};
pub use query::{QueryString, encode_query_component};

/// Sentinel rendered for missing dates and falsy amounts.
pub const NOT_SPECIFIED: &str = "Not specified";
