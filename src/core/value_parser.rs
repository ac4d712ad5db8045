//! Monetary value parsing into integer minor units
//!
//! Amounts arrive as free text from a best-effort classifier, in either of two
//! numeric conventions: `1.234,56` (comma decimal, period thousands) or
//! `1,234.56` (period decimal, comma thousands). Telling them apart is a
//! heuristic over separator usage, so the parser is a best-effort convention
//! resolver rather than a validating parser: malformed input degrades to 0 or
//! to a partial parse and never raises.
//!
//! The separator policy is isolated in [`resolve_separators`] so it can be
//! tested on its own and swapped without touching anything downstream.
//!
//! # Pipeline
//!
//! 1. Trim; a value wholly wrapped in `(` `)` is negative.
//! 2. Keep only digits, `,`, `.` and `-`.
//! 3. A leading `-` is a second, independent source of negativity. Any other
//!    `-` leaves its digit group unparsable, and that group counts as 0.
//! 4. Resolve decimal vs thousands separators.
//! 5. Combine `integer * 100 + cents`.
//! 6. Apply the sign.

use crate::types::{MinorUnits, RawAmount};
use rust_decimal::Decimal;

/// Integer and fractional digit groups of a cleaned amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitAmount {
    /// Whole-unit digits, separators removed
    pub integer: String,

    /// Fractional digits (0 to 2 characters)
    pub fraction: String,
}

impl SplitAmount {
    fn new(integer: &str, fraction: &str) -> Self {
        SplitAmount {
            integer: integer.replace(['.', ','], ""),
            fraction: fraction.to_string(),
        }
    }

    /// Combine both groups into minor units
    ///
    /// Groups that are not plain digits count as 0. A single fractional digit
    /// is a tenth (`"5"` is 50 cents).
    pub fn to_minor_units(&self) -> MinorUnits {
        let whole = digit_group(&self.integer);
        let cents = match self.fraction.len() {
            0 => 0,
            1 => digit_group(&self.fraction) * 10,
            _ => digit_group(&self.fraction),
        };

        whole.saturating_mul(100).saturating_add(cents)
    }
}

// `str::parse` would accept a sign, and a stray `-` must not flip a group
fn digit_group(group: &str) -> MinorUnits {
    if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    group.parse().unwrap_or(0)
}

/// Decide which separator is the decimal point
///
/// Input must already be reduced to digits, `,` and `.` (no sign).
///
/// - Comma present and at most two characters after the last comma: comma is
///   the decimal separator, everything else in the prefix is a thousands mark.
/// - Otherwise, period present and at most two characters after the last
///   period: period is the decimal separator.
/// - Otherwise the value is whole units and every separator is a thousands
///   mark (`"1.234.567"` is 1234567, never 1.234567).
pub fn resolve_separators(cleaned: &str) -> SplitAmount {
    if let Some((prefix, suffix)) = cleaned.rsplit_once(',') {
        if suffix.len() <= 2 {
            return SplitAmount::new(prefix, suffix);
        }
    }

    if let Some((prefix, suffix)) = cleaned.rsplit_once('.') {
        if suffix.len() <= 2 {
            return SplitAmount::new(prefix, suffix);
        }
    }

    SplitAmount::new(cleaned, "")
}

/// Parse a raw amount of any shape into signed minor units
pub fn parse_amount(raw: &RawAmount) -> MinorUnits {
    match raw {
        RawAmount::Text(text) => parse_text_amount(text),
        RawAmount::Number(value) => parse_numeric_amount(*value),
        RawAmount::Missing => 0,
    }
}

/// Parse an already-numeric major-unit value
///
/// Rounds half away from zero. Non-finite values yield 0.
pub fn parse_numeric_amount(value: f64) -> MinorUnits {
    if !value.is_finite() {
        return 0;
    }

    // `as` saturates at the i64 bounds
    (value * 100.0).round() as MinorUnits
}

/// Parse a free-text amount
pub fn parse_text_amount(raw: &str) -> MinorUnits {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }

    let (parenthesized, body) = match trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    let cleaned: String = body
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let (leading_minus, unsigned) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };

    let magnitude = resolve_separators(unsigned).to_minor_units();

    if parenthesized || leading_minus {
        -magnitude
    } else {
        magnitude
    }
}

/// Render minor units as a major-unit decimal string with two places
///
/// `123456` becomes `"1234.56"`, `-50075` becomes `"-500.75"`.
pub fn format_minor_units(amount: MinorUnits) -> String {
    Decimal::new(amount, 2).to_string()
}
