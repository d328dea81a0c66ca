//! Aggregate expressions over ranges of cells.
//!
//! An [`Expression`] holds weak references to its operand cells and is
//! recomputed every time the owning cell is read. There is no dependency
//! tracking and no cycle detection: an expression that (transitively)
//! references its own cell recurses until the stack is exhausted.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use super::cell::{Cell, CellHandle};
use super::format::{FormatOptions, format_float};

/// Result of evaluating an expression whose operand cells no longer exist.
pub const EXPR_ERROR: &str = "EXPR_ERROR";

/// Aggregate applied over an expression's operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Sum,
    Avg,
    Count,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Sum => "SUM",
            Operation::Avg => "AVG",
            Operation::Count => "COUNT",
        };
        f.write_str(name)
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUM" => Ok(Operation::Sum),
            "AVG" => Ok(Operation::Avg),
            "COUNT" => Ok(Operation::Count),
            _ => Err(format!("Unknown operation: {}", s)),
        }
    }
}

/// A derived value: an aggregate over other cells of the same grid.
#[derive(Clone, Debug)]
pub struct Expression {
    operation: Operation,
    operands: Vec<Weak<RefCell<Cell>>>,
    last_result: RefCell<String>,
}

impl Expression {
    pub fn new(operation: Operation, operands: &[CellHandle]) -> Expression {
        Expression {
            operation,
            operands: operands.iter().map(Rc::downgrade).collect(),
            last_result: RefCell::new(String::new()),
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn operand_count(&self) -> usize {
        self.operands.len()
    }

    /// Operands whose cells are still alive, or `None` if any was removed.
    pub fn operands(&self) -> Option<Vec<CellHandle>> {
        self.operands.iter().map(Weak::upgrade).collect()
    }

    /// The value produced by the most recent read (empty before the first one).
    pub fn last_result(&self) -> String {
        self.last_result.borrow().clone()
    }

    /// Evaluate now and remember the result.
    pub fn result(&self, options: &FormatOptions) -> String {
        let result = evaluate(self, options);
        *self.last_result.borrow_mut() = result.clone();
        result
    }
}

/// Compute an expression's value from the current state of its operands.
pub fn evaluate(expression: &Expression, options: &FormatOptions) -> String {
    let Some(operands) = expression.operands() else {
        tracing::debug!(
            operation = %expression.operation,
            "expression references a removed cell"
        );
        return EXPR_ERROR.to_string();
    };

    match expression.operation {
        Operation::Sum => format_float(sum_values(&operands, options)),
        Operation::Avg => format_float(sum_values(&operands, options) / operands.len() as f64),
        Operation::Count => operands.len().to_string(),
    }
}

/// All-or-nothing: a single unparseable operand makes the whole sum zero.
fn sum_values(operands: &[CellHandle], options: &FormatOptions) -> f64 {
    let mut total = 0.0;
    for cell in operands {
        match cell.borrow().value(options).trim().parse::<f64>() {
            Ok(value) => total += value,
            Err(_) => return 0.0,
        }
    }
    total
}
