//! Date guessing for numeric cell values.
//!
//! Interpretation depends only on the number of digits:
//!
//! | digits | reading                                   |
//! |--------|-------------------------------------------|
//! | 1-2    | day of the current month                  |
//! | 4      | `DDMM` (leading zero) or `D M YY`         |
//! | 6      | `DDMMYY` (leading zero) or `D M YYYY`     |
//! | 8      | `DDMMYYYY`                                |
//!
//! Lengths 3, 5 and 7 are ambiguous and pass through, as does anything that
//! does not resolve to a real calendar date.

use chrono::{Datelike, NaiveDate};

use super::numeric::is_parsable;

/// Guess a date from a digit string, returning `YYYY-MM-DD` or the input unchanged.
pub fn parse_date(input: &str, today: NaiveDate) -> String {
    if !is_parsable(input) || !input.bytes().all(|b| b.is_ascii_digit()) {
        return input.to_string();
    }

    match guess_date(input, today) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => input.to_string(),
    }
}

fn guess_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let leading_zero = input.starts_with('0');
    match input.len() {
        1 | 2 => day_in_current_month(input, today),
        4 if leading_zero => {
            let day = digits(input, 0, 2)?;
            let month = digits(input, 2, 4)?;
            NaiveDate::from_ymd_opt(today.year(), month, day)
        }
        4 => {
            let day = digits(input, 0, 1)?;
            let month = digits(input, 1, 2)?;
            let year = expand_two_digit_year(digits(input, 2, 4)?, today);
            NaiveDate::from_ymd_opt(year, month, day)
        }
        6 if leading_zero => {
            let day = digits(input, 0, 2)?;
            let month = digits(input, 2, 4)?;
            let year = expand_two_digit_year(digits(input, 4, 6)?, today);
            NaiveDate::from_ymd_opt(year, month, day)
        }
        6 => {
            let day = digits(input, 0, 1)?;
            let month = digits(input, 1, 2)?;
            let year = digits(input, 2, 6)? as i32;
            NaiveDate::from_ymd_opt(year, month, day)
        }
        8 => {
            let day = digits(input, 0, 2)?;
            let month = digits(input, 2, 4)?;
            let year = digits(input, 4, 8)? as i32;
            NaiveDate::from_ymd_opt(year, month, day)
        }
        _ => None,
    }
}

/// Expand a two-digit year into the 100-year window starting 80 years before `today`.
pub fn expand_two_digit_year(short_year: u32, today: NaiveDate) -> i32 {
    let window_start = today.year() - 80;
    let century = window_start - window_start.rem_euclid(100);
    let year = century + short_year as i32;
    if year < window_start { year + 100 } else { year }
}

fn day_in_current_month(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let day: u32 = input.parse().ok()?;
    NaiveDate::from_ymd_opt(today.year(), today.month(), day)
}

fn digits(input: &str, from: usize, to: usize) -> Option<u32> {
    input.get(from..to)?.parse().ok()
}
