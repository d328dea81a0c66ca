use chrono::{Local, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::cell::CellType;
use super::date::parse_date;

/// Locale and clock inputs for formatting.
///
/// `today` anchors the date heuristic. It is never read from the system clock
/// during formatting; the default constructor captures the local date once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatOptions {
    #[serde(skip)]
    pub today: NaiveDate,
    /// Appended to currency values. Fixed to `€` by default, not taken from
    /// the process locale; set `format.currency_symbol` in the config to change it.
    pub currency_symbol: String,
    pub decimal_separator: char,
}

impl FormatOptions {
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_currency_symbol(mut self, symbol: &str) -> Self {
        self.currency_symbol = symbol.to_string();
        self
    }

    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            today: Local::now().date_naive(),
            currency_symbol: "€".to_string(),
            decimal_separator: '.',
        }
    }
}

/// Format a raw value string for display according to its cell type.
///
/// Never fails: any value that cannot be interpreted for the requested type
/// is returned unchanged.
pub fn format_value(value: &str, cell_type: CellType, options: &FormatOptions) -> String {
    match cell_type {
        CellType::Text => value.to_string(),
        CellType::Number => match parse_number(value) {
            Some(n) => fixed(n, 1, options),
            None => value.to_string(),
        },
        CellType::Percentage => match parse_number(value) {
            Some(n) => format!("{} %", fixed(n, 100, options)),
            None => value.to_string(),
        },
        CellType::Currency => match parse_number(value) {
            Some(n) => format!("{} {}", fixed(n, 1, options), options.currency_symbol),
            None => value.to_string(),
        },
        CellType::Date => parse_date(value, options.today),
    }
}

/// Render a float the way aggregate results are stored: shortest round-trip
/// digits, always with a fractional part, scientific notation outside
/// `[1e-3, 1e7)`.
pub fn format_float(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return format!("{:.1}", n);
    }

    let magnitude = n.abs();
    if (1e-3..1e7).contains(&magnitude) {
        let plain = n.to_string();
        if plain.contains('.') {
            plain
        } else {
            plain + ".0"
        }
    } else {
        let scientific = format!("{:e}", n);
        match scientific.split_once('e') {
            Some((mantissa, exponent)) if mantissa.contains('.') => {
                format!("{}E{}", mantissa, exponent)
            }
            Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
            None => scientific,
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

/// `n × factor` with two decimals, rounding the shortest decimal form of `n`
/// half away from zero.
fn fixed(n: f64, factor: i64, options: &FormatOptions) -> String {
    let rounded = Decimal::from_str(&n.to_string())
        .ok()
        .and_then(|d| d.checked_mul(Decimal::from(factor)))
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero));
    let text = match rounded {
        Some(d) => format!("{:.2}", d),
        None => format!("{:.2}", n * factor as f64),
    };
    if options.decimal_separator == '.' {
        text
    } else {
        text.replacen('.', &options.decimal_separator.to_string(), 1)
    }
}
