//! Long-form date rendering for notification bodies.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

use crate::NOT_SPECIFIED;

/// Sentinel rendered when a textual date cannot be parsed.
pub const INVALID_DATE: &str = "Invalid date";

const LONG_DATE_FORMAT: &str = "%B %-d, %Y";

/// Date-like value accepted by [`format_date`].
///
/// Callers hand over whatever shape they received from the document store:
/// raw text, a calendar date, a timestamp, or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateInput {
    /// No value was supplied.
    #[default]
    Missing,
    /// Unparsed text such as `2024-01-05` or an RFC 3339 timestamp.
    Text(String),
    /// A calendar date.
    Date(NaiveDate),
    /// A UTC instant; rendered using its UTC calendar date.
    Timestamp(DateTime<Utc>),
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for DateInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Errors raised by [`try_format_date`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateFormatError {
    /// No date was supplied, or the text was blank.
    #[error("date is not specified")]
    Missing,
    /// The text did not match any accepted date layout.
    #[error("unrecognised date text: {input}")]
    Unparseable {
        /// Text that failed to parse.
        input: String,
    },
}

/// Render a date as `January 5, 2024`, or a sentinel when it cannot be.
///
/// Missing and blank values render as [`NOT_SPECIFIED`]; malformed text
/// renders as [`INVALID_DATE`].
///
/// # Examples
/// ```
/// use notify_format::{DateInput, NOT_SPECIFIED, format_date};
///
/// assert_eq!(format_date("2024-01-05"), "January 5, 2024");
/// assert_eq!(format_date(DateInput::Missing), NOT_SPECIFIED);
/// ```
#[must_use]
pub fn format_date(value: impl Into<DateInput>) -> String {
    match try_format_date(value) {
        Ok(rendered) => rendered,
        Err(DateFormatError::Missing) => NOT_SPECIFIED.to_owned(),
        Err(DateFormatError::Unparseable { .. }) => INVALID_DATE.to_owned(),
    }
}

/// Fallible counterpart of [`format_date`].
///
/// # Errors
///
/// Returns [`DateFormatError::Missing`] for absent or blank input and
/// [`DateFormatError::Unparseable`] for text in an unknown layout.
pub fn try_format_date(value: impl Into<DateInput>) -> Result<String, DateFormatError> {
    let date = match value.into() {
        DateInput::Missing => return Err(DateFormatError::Missing),
        DateInput::Text(text) => parse_date_text(&text)?,
        DateInput::Date(date) => date,
        DateInput::Timestamp(instant) => instant.date_naive(),
    };
    Ok(date.format(LONG_DATE_FORMAT).to_string())
}

fn parse_date_text(text: &str) -> Result<NaiveDate, DateFormatError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DateFormatError::Missing);
    }

    // Offsets keep the calendar date the sender wrote down.
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.date_naive());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(parsed.date());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| DateFormatError::Unparseable {
        input: trimmed.to_owned(),
    })
}
