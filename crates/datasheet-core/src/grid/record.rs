use datasheet_engine::engine::{Cell, CellHandle, CellType, CellValue, FormatOptions};
use std::fmt;
use std::rc::Rc;

use crate::storage::csv::quote_field;

/// An ordered run of cells: a stored row, a column view or a slice row.
///
/// Records hold handles, so writing to a cell through any record that contains
/// it is visible everywhere. Structural changes (insert/remove) only happen
/// through the owning [`Grid`](super::Grid).
#[derive(Clone, Debug, Default)]
pub struct Record {
    cells: Vec<CellHandle>,
}

impl Record {
    pub(crate) fn from_cells(cells: Vec<CellHandle>) -> Record {
        Record { cells }
    }

    /// Build a record of fresh cells from raw values.
    pub fn from_values<I, V>(values: I) -> Record
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        Record {
            cells: values
                .into_iter()
                .map(|value| Cell::new(value).into_handle())
                .collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&CellHandle> {
        self.cells.get(index)
    }

    pub fn cells(&self) -> &[CellHandle] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CellHandle> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Alias for [`len`](Record::len).
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Number of non-empty cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.borrow().is_empty()).count()
    }

    /// True when no cell holds a non-blank value.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.borrow().is_empty())
    }

    /// The type shared by every cell, or `Text` when they differ.
    pub fn cell_type(&self) -> CellType {
        let mut types = self.cells.iter().map(|cell| cell.borrow().cell_type());
        let Some(first) = types.next() else {
            return CellType::Text;
        };
        if types.all(|t| t == first) {
            first
        } else {
            CellType::Text
        }
    }

    /// Per-index type listing, e.g. `idx 0: TEXT | idx 1: NUMBER`.
    pub fn structure(&self) -> String {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("idx {}: {}", i, cell.borrow().cell_type()))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn apply<F>(&self, mut f: F)
    where
        F: FnMut(&Cell) -> CellValue,
    {
        for cell in &self.cells {
            let next = f(&cell.borrow());
            cell.borrow_mut().set_value(next);
        }
    }

    pub fn apply_if<P, F>(&self, mut predicate: P, mut f: F)
    where
        P: FnMut(&Cell) -> bool,
        F: FnMut(&Cell) -> CellValue,
    {
        for cell in &self.cells {
            let next = {
                let current = cell.borrow();
                if !predicate(&current) {
                    continue;
                }
                f(&current)
            };
            cell.borrow_mut().set_value(next);
        }
    }

    /// Formatted values of every cell, in order.
    pub fn values(&self, options: &FormatOptions) -> Vec<String> {
        self.cells
            .iter()
            .map(|cell| cell.borrow().value(options))
            .collect()
    }

    /// Comma-joined view of the non-blank formatted values.
    pub fn display<'a>(&'a self, options: &'a FormatOptions) -> RecordDisplay<'a> {
        RecordDisplay {
            record: self,
            options,
        }
    }

    pub(crate) fn into_cells(self) -> Vec<CellHandle> {
        self.cells
    }

    pub(crate) fn insert(&mut self, index: usize, cell: CellHandle) {
        let index = index.min(self.cells.len());
        self.cells.insert(index, cell);
    }

    pub(crate) fn set(&mut self, index: usize, cell: CellHandle) {
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = cell;
        }
    }

    pub(crate) fn remove(&mut self, index: usize) {
        if index < self.cells.len() {
            self.cells.remove(index);
        }
    }

    pub(crate) fn push(&mut self, cell: CellHandle) {
        self.cells.push(cell);
    }
}

/// Two records are equal when they hold the same cells in the same order.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.cells.len() == other.cells.len()
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(a, b)| Rc::ptr_eq(a, b))
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a CellHandle;
    type IntoIter = std::slice::Iter<'a, CellHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Display adapter returned by [`Record::display`].
pub struct RecordDisplay<'a> {
    record: &'a Record,
    options: &'a FormatOptions,
}

impl fmt::Display for RecordDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for cell in self.record {
            let value = cell.borrow().value(self.options);
            if value.trim().is_empty() {
                continue;
            }
            if !first {
                f.write_str(",")?;
            }
            f.write_str(&quote_field(&value, ','))?;
            first = false;
        }
        Ok(())
    }
}
