//! Datasheet engine API.
//!
//! This module provides the value layer underneath a grid:
//!
//! - [`Cell`], [`CellValue`], [`CellType`], [`CellHandle`] - Cell storage and coercions
//! - [`Expression`], [`Operation`] - Aggregates recomputed on every read
//! - [`format_value`], [`FormatOptions`] - Type-aware display formatting
//! - [`parse_date`] - Digit-count driven date guessing
//! - [`is_parsable`], [`compare_values`] - Numeric-aware string comparison

mod cell;
mod date;
mod expr;
mod format;
mod numeric;

pub use cell::{Cell, CellHandle, CellType, CellValue};
pub use date::{expand_two_digit_year, parse_date};
pub use expr::{EXPR_ERROR, Expression, Operation, evaluate};
pub use format::{FormatOptions, format_float, format_value};
pub use numeric::{compare_values, is_parsable};
