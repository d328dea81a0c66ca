//! Cell data structures for the datasheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`CellType`] - Advisory formatting tag (text, number, percentage, currency, date)
//! - [`CellValue`] - The raw value stored in a cell
//! - [`Cell`] - A value plus its type tag
//! - [`CellHandle`] - Shared handle giving a cell a stable identity across rows,
//!   column views and expressions

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use super::expr::Expression;
use super::format::{FormatOptions, format_float, format_value};
use super::numeric::compare_values;

/// How a cell's value is presented. Never changes what is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CellType {
    #[default]
    Text,
    Number,
    Percentage,
    Currency,
    Date,
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellType::Text => "TEXT",
            CellType::Number => "NUMBER",
            CellType::Percentage => "PERCENTAGE",
            CellType::Currency => "CURRENCY",
            CellType::Date => "DATE",
        };
        f.write_str(name)
    }
}

impl FromStr for CellType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TEXT" => Ok(CellType::Text),
            "NUMBER" => Ok(CellType::Number),
            "PERCENTAGE" => Ok(CellType::Percentage),
            "CURRENCY" => Ok(CellType::Currency),
            "DATE" => Ok(CellType::Date),
            _ => Err(format!("Unknown cell type: {}", s)),
        }
    }
}

/// The raw content of a cell.
#[derive(Clone, Debug)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
    Expression(Expression),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(n) => write!(f, "{}", n),
            CellValue::Float(n) => f.write_str(&format_float(*n)),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Expression(expr) => f.write_str(&expr.last_result()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&String> for CellValue {
    fn from(value: &String) -> Self {
        CellValue::Text(value.clone())
    }
}

impl From<char> for CellValue {
    fn from(value: char) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value.into())
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(value.into())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<Expression> for CellValue {
    fn from(value: Expression) -> Self {
        CellValue::Expression(value)
    }
}

/// A cell in the grid: a raw value plus an advisory type tag.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    value: CellValue,
    cell_type: CellType,
}

/// Shared cell identity. Rows, column views and slices hold clones of the same
/// handle, so a value written through one is visible through all of them.
pub type CellHandle = Rc<RefCell<Cell>>;

impl Cell {
    pub fn new_empty() -> Cell {
        Cell::default()
    }

    pub fn new(value: impl Into<CellValue>) -> Cell {
        Cell {
            value: value.into(),
            cell_type: CellType::Text,
        }
    }

    pub fn into_handle(self) -> CellHandle {
        Rc::new(RefCell::new(self))
    }

    /// True when the raw value renders as blank text. Expressions never count
    /// as empty.
    pub fn is_empty(&self) -> bool {
        match &self.value {
            CellValue::Expression(_) => false,
            other => other.to_string().trim().is_empty(),
        }
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn set_cell_type(&mut self, cell_type: CellType) {
        self.cell_type = cell_type;
    }

    pub fn raw_value(&self) -> &CellValue {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<CellValue>) {
        self.value = value.into();
    }

    /// Replace the value with whatever `f` computes from the current cell.
    pub fn apply<F>(&mut self, f: F)
    where
        F: FnOnce(&Cell) -> CellValue,
    {
        let next = f(self);
        self.value = next;
    }

    /// The display value: expressions are re-evaluated, then the result is
    /// formatted according to the cell type.
    pub fn value(&self, options: &FormatOptions) -> String {
        let raw = match &self.value {
            CellValue::Expression(expr) => expr.result(options),
            other => other.to_string(),
        };
        format_value(&raw, self.cell_type, options)
    }

    pub fn value_as_boolean(&self) -> bool {
        matches!(self.value.to_string().as_str(), "true" | "TRUE" | "1")
    }

    /// The display value as a 32-bit integer; anything else, including values
    /// out of `i32` range, is 0.
    pub fn value_as_int(&self, options: &FormatOptions) -> i32 {
        let value = self.value(options);
        match value.as_str() {
            "true" | "TRUE" | "1" => 1,
            other => other.trim().parse().unwrap_or(0),
        }
    }

    pub fn value_as_double(&self, options: &FormatOptions) -> f64 {
        let value = self.value(options);
        match value.as_str() {
            "true" | "TRUE" | "1" => 1.0,
            other => other.trim().parse().unwrap_or(0.0),
        }
    }

    /// Order two cells by their display values, numerically when both look
    /// like decimal numbers.
    pub fn compare(&self, other: &Cell, options: &FormatOptions) -> Ordering {
        compare_values(&self.value(options), &other.value(options))
    }
}
