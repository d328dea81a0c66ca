//! Numeric detection and numeric-aware ordering of display strings.
//!
//! A string is "parsable" when it is a plain decimal literal: an optional sign,
//! digits and an optional fractional part. Exponents, hex and trailing dots are
//! rejected. Two parsable strings order by exact decimal value, anything else
//! orders lexicographically.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

fn decimal_re() -> &'static Regex {
    static DECIMAL_RE: OnceLock<Regex> = OnceLock::new();
    DECIMAL_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)$").expect("decimal regex must compile")
    })
}

/// Returns true if `value` is a plain decimal number literal.
pub fn is_parsable(value: &str) -> bool {
    decimal_re().is_match(value)
}

/// Compare two display strings, numerically when both are decimal literals.
///
/// Literals are compared digit by digit, so precision is unbounded.
pub fn compare_values(left: &str, right: &str) -> Ordering {
    if is_parsable(left) && is_parsable(right) {
        return compare_decimals(&DecimalParts::new(left), &DecimalParts::new(right));
    }
    left.cmp(right)
}

/// A decimal literal split into sign, integer digits without leading zeros
/// and fraction digits without trailing zeros.
struct DecimalParts<'a> {
    negative: bool,
    integer: &'a str,
    fraction: &'a str,
}

impl<'a> DecimalParts<'a> {
    fn new(literal: &'a str) -> Self {
        let (negative, digits) = match literal.as_bytes().first() {
            Some(b'-') => (true, &literal[1..]),
            Some(b'+') => (false, &literal[1..]),
            _ => (false, literal),
        };
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        let integer = integer.trim_start_matches('0');
        let fraction = fraction.trim_end_matches('0');
        let is_zero = integer.is_empty() && fraction.is_empty();
        DecimalParts {
            negative: negative && !is_zero,
            integer,
            fraction,
        }
    }
}

fn compare_decimals(left: &DecimalParts<'_>, right: &DecimalParts<'_>) -> Ordering {
    match (left.negative, right.negative) {
        (false, true) => Ordering::Greater,
        (true, false) => Ordering::Less,
        (false, false) => compare_magnitudes(left, right),
        (true, true) => compare_magnitudes(right, left),
    }
}

fn compare_magnitudes(left: &DecimalParts<'_>, right: &DecimalParts<'_>) -> Ordering {
    left.integer
        .len()
        .cmp(&right.integer.len())
        .then_with(|| left.integer.cmp(right.integer))
        .then_with(|| left.fraction.cmp(right.fraction))
}
