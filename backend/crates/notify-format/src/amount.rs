//! Currency rendering following `en-US` conventions.

use std::fmt;

use crate::NOT_SPECIFIED;

/// Currency used when the caller supplies none, or an unusable code.
pub const DEFAULT_CURRENCY: &str = "LSL";

/// Symbols `en-US` uses in place of the ISO code.
const SYMBOLS: &[(&str, &str)] = &[
    ("AUD", "A$"),
    ("BRL", "R$"),
    ("CAD", "CA$"),
    ("CNY", "CN¥"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("HKD", "HK$"),
    ("ILS", "₪"),
    ("INR", "₹"),
    ("JPY", "¥"),
    ("KRW", "₩"),
    ("MXN", "MX$"),
    ("NZD", "NZ$"),
    ("PHP", "₱"),
    ("TWD", "NT$"),
    ("USD", "$"),
    ("VND", "₫"),
    ("XAF", "FCFA"),
    ("XCD", "EC$"),
    ("XPF", "CFPF"),
];

const ZERO_DECIMAL: &[&str] = &[
    "CLP", "DJF", "GNF", "ISK", "JPY", "KMF", "KRW", "PYG", "RWF", "UGX", "VND", "VUV", "XAF",
    "XOF", "XPF",
];

const THREE_DECIMAL: &[&str] = &["BHD", "JOD", "KWD", "LYD", "OMR", "TND"];

/// Upper-case three-letter ISO 4217 style currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a code, accepting surrounding whitespace and any letter case.
    ///
    /// Returns `None` unless the trimmed input is exactly three ASCII letters.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.len() == 3 && trimmed.bytes().all(|byte| byte.is_ascii_alphabetic()) {
            Some(Self(trimmed.to_ascii_uppercase()))
        } else {
            None
        }
    }

    /// Parse a code, substituting [`DEFAULT_CURRENCY`] for unusable input.
    #[must_use]
    pub fn resolve(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse)
            .unwrap_or_else(|| Self(DEFAULT_CURRENCY.to_owned()))
    }

    /// The upper-case code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Number of minor-unit digits shown for this currency.
    #[must_use]
    pub fn minor_digits(&self) -> usize {
        if ZERO_DECIMAL.contains(&self.as_str()) {
            0
        } else if THREE_DECIMAL.contains(&self.as_str()) {
            3
        } else {
            2
        }
    }

    /// Prefix written before the digits.
    ///
    /// Symbols ending in a letter, and bare codes, are separated from the
    /// digits by a non-breaking space.
    #[must_use]
    pub fn prefix(&self) -> String {
        let symbol = SYMBOLS
            .iter()
            .find(|(code, _)| *code == self.as_str())
            .map_or(self.as_str(), |(_, symbol)| *symbol);
        if symbol.chars().last().is_some_and(char::is_alphabetic) {
            format!("{symbol}\u{a0}")
        } else {
            symbol.to_owned()
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render an amount in `en-US` currency style.
///
/// Falsy amounts (`None`, zero, `NaN`) and non-finite values render as
/// [`NOT_SPECIFIED`], so a genuine zero is indistinguishable from a missing
/// amount. A missing or malformed currency falls back to
/// [`DEFAULT_CURRENCY`].
///
/// # Examples
/// ```
/// use notify_format::{NOT_SPECIFIED, format_amount};
///
/// assert_eq!(format_amount(Some(1234.5), Some("usd")), "$1,234.50");
/// assert_eq!(format_amount(Some(0.0), Some("USD")), NOT_SPECIFIED);
/// ```
#[must_use]
pub fn format_amount(amount: Option<f64>, currency: Option<&str>) -> String {
    let Some(value) = amount.filter(|value| value.is_finite() && *value != 0.0) else {
        return NOT_SPECIFIED.to_owned();
    };

    let code = CurrencyCode::resolve(currency);
    let (whole, fraction) = round_half_expand(value.abs(), code.minor_digits());

    let sign = if value.is_sign_negative() { "-" } else { "" };
    let mut rendered = format!("{sign}{}{}", code.prefix(), group_thousands(&whole));
    if !fraction.is_empty() {
        rendered.push('.');
        rendered.push_str(&fraction);
    }
    rendered
}

/// Round the shortest decimal representation of `magnitude` to `scale`
/// fraction digits, with ties moving away from zero.
///
/// Works on the digits `f64` displays rather than its binary value, so
/// `1.005` rounds up to `1.01` as a reader would expect.
fn round_half_expand(magnitude: f64, scale: usize) -> (String, String) {
    let shortest = magnitude.to_string();
    let (whole, fraction) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));

    let mut digits: Vec<u8> = whole.bytes().collect();
    let mut fraction_digits = fraction.bytes();
    digits.extend((0..scale).map(|_| fraction_digits.next().unwrap_or(b'0')));

    if fraction_digits.next().is_some_and(|digit| digit >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let kept = digits.split_off(digits.len().saturating_sub(scale));
    (
        String::from_utf8_lossy(&digits).into_owned(),
        String::from_utf8_lossy(&kept).into_owned(),
    )
}

fn group_thousands(digits: &str) -> String {
    let mut reversed = Vec::with_capacity(digits.len() * 2);
    let mut run = 0;
    for digit in digits.chars().rev() {
        if run == 3 {
            reversed.push(',');
            run = 0;
        }
        reversed.push(digit);
        run += 1;
    }
    reversed.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some(0.0))]
    #[case(Some(-0.0))]
    #[case(Some(f64::NAN))]
    #[case(Some(f64::INFINITY))]
    fn falsy_amounts_are_not_specified(#[case] amount: Option<f64>) {
        assert_eq!(format_amount(amount, Some("USD")), NOT_SPECIFIED);
        assert_eq!(format_amount(amount, None), NOT_SPECIFIED);
    }

    #[rstest]
    #[case(1234.5, "USD", "$1,234.50")]
    #[case(1_000_000.0, "usd", "$1,000,000.00")]
    #[case(42.0, "EUR", "€42.00")]
    #[case(999.999, "GBP", "£1,000.00")]
    #[case(15000.0, "JPY", "¥15,000")]
    #[case(1.5, "KWD", "KWD\u{a0}1.500")]
    #[case(2500.75, "ZAR", "ZAR\u{a0}2,500.75")]
    #[case(-75.25, "USD", "-$75.25")]
    #[case(0.01, "CAD", "CA$0.01")]
    fn amounts_render_with_currency_prefix(
        #[case] amount: f64,
        #[case] currency: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(format_amount(Some(amount), Some(currency)), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("  "))]
    #[case(Some("dollars"))]
    #[case(Some("U$D"))]
    fn unusable_currency_falls_back_to_default(#[case] currency: Option<&str>) {
        assert_eq!(format_amount(Some(100.0), currency), "LSL\u{a0}100.00");
    }

    #[rstest]
    #[case(0.125, "USD", "$0.13")]
    #[case(1.005, "USD", "$1.01")]
    #[case(2.675, "USD", "$2.68")]
    #[case(10.125, "USD", "$10.13")]
    #[case(2.5, "JPY", "¥3")]
    #[case(999.995, "USD", "$1,000.00")]
    #[case(-1.005, "USD", "-$1.01")]
    fn ties_round_away_from_zero(
        #[case] amount: f64,
        #[case] currency: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(format_amount(Some(amount), Some(currency)), expected);
    }

    #[rstest]
    fn tiny_negative_amounts_keep_their_sign() {
        assert_eq!(format_amount(Some(-0.001), Some("USD")), "-$0.00");
        assert_eq!(format_amount(Some(-0.4), Some("JPY")), "-¥0");
    }

    #[rstest]
    #[case("ILS", "₪5.00")]
    #[case("PHP", "₱5.00")]
    #[case("TWD", "NT$5.00")]
    #[case("VND", "₫5")]
    #[case("XAF", "FCFA\u{a0}5")]
    #[case("XCD", "EC$5.00")]
    fn regional_symbols_replace_codes(#[case] currency: &str, #[case] expected: &str) {
        assert_eq!(format_amount(Some(5.0), Some(currency)), expected);
    }

    #[rstest]
    #[case(0.999, 2, "1", "00")]
    #[case(0.004, 2, "0", "00")]
    #[case(19.5, 0, "20", "")]
    #[case(1.5, 3, "1", "500")]
    fn shortest_digits_round_with_carry(
        #[case] magnitude: f64,
        #[case] scale: usize,
        #[case] whole: &str,
        #[case] fraction: &str,
    ) {
        assert_eq!(
            round_half_expand(magnitude, scale),
            (whole.to_owned(), fraction.to_owned())
        );
    }

    #[rstest]
    #[case("", "")]
    #[case("7", "7")]
    #[case("123", "123")]
    #[case("1234", "1,234")]
    #[case("123456", "123,456")]
    #[case("1234567", "1,234,567")]
    fn thousands_are_grouped(#[case] digits: &str, #[case] expected: &str) {
        assert_eq!(group_thousands(digits), expected);
    }

    #[rstest]
    fn currency_codes_normalise_case_and_whitespace() {
        let code = CurrencyCode::parse(" eur ").expect("valid code");
        assert_eq!(code.as_str(), "EUR");
        assert_eq!(code.to_string(), "EUR");
        assert!(CurrencyCode::parse("EURO").is_none());
    }
}
