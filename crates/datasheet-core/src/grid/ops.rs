use datasheet_engine::engine::{Cell, CellHandle, CellType, CellValue, Expression, Operation};
use std::collections::HashMap;
use std::hash::Hash;

use super::Grid;
use super::record::Record;

impl Grid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the grid. A grid with names but no rows is as wide as its names.
    pub fn column_count(&self) -> usize {
        match self.rows.first() {
            Some(row) => row.len(),
            None => self.column_names.as_ref().map_or(0, Vec::len),
        }
    }

    /// Total number of cells (`rows × columns`).
    pub fn size(&self) -> usize {
        self.row_count() * self.column_count()
    }

    /// Number of non-empty cells.
    pub fn count(&self) -> usize {
        self.rows.iter().map(Record::count).sum()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// A snapshot view of every column, left to right.
    pub fn columns(&self) -> Vec<Record> {
        (0..self.column_count())
            .map(|index| self.column_at(index))
            .collect()
    }

    pub fn column_names(&self) -> Option<&[String]> {
        self.column_names.as_deref()
    }

    /// Rename a column. Ignored out of range or when the grid has no names.
    pub fn set_column_name(&mut self, index: usize, name: &str) {
        match self.column_names.as_mut().and_then(|names| names.get_mut(index)) {
            Some(slot) => *slot = name.to_string(),
            None => tracing::debug!(index, name, "set_column_name ignored"),
        }
    }

    /// The row at `index`, clamped into range (`-1` gives the first row, a
    /// too-large index the last). Shares the stored row's cells.
    pub fn row(&self, index: isize) -> Record {
        match clamp(index, self.row_count()) {
            Some(index) => self.rows[index].clone(),
            None => Record::default(),
        }
    }

    /// The column at `index`, clamped into range like [`row`](Grid::row).
    ///
    /// The result is a snapshot: writes to its cells show up in the grid, but
    /// later structural changes to the grid do not show up in it.
    pub fn column(&self, index: isize) -> Record {
        match clamp(index, self.column_count()) {
            Some(index) => self.column_at(index),
            None => Record::default(),
        }
    }

    /// The first column called `name`.
    pub fn column_by_name(&self, name: &str) -> Option<Record> {
        self.column_index(name).map(|index| self.column_at(index))
    }

    pub(crate) fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names
            .as_ref()?
            .iter()
            .position(|candidate| candidate == name)
    }

    fn column_at(&self, index: usize) -> Record {
        Record::from_cells(
            self.rows
                .iter()
                .filter_map(|row| row.get(index).cloned())
                .collect(),
        )
    }

    /// Handle to the cell at (`column`, `row`), or `None` outside the grid.
    pub fn cell(&self, column: usize, row: usize) -> Option<CellHandle> {
        self.rows.get(row)?.get(column).cloned()
    }

    /// Formatted value at (`column`, `row`).
    pub fn value(&self, column: usize, row: usize) -> Option<String> {
        self.cell(column, row)
            .map(|cell| cell.borrow().value(&self.options))
    }

    pub fn cell_type(&self, column: usize, row: usize) -> Option<CellType> {
        self.cell(column, row).map(|cell| cell.borrow().cell_type())
    }

    /// Overwrite the value at (`column`, `row`). Ignored outside the grid.
    pub fn set_value(&mut self, column: usize, row: usize, value: impl Into<CellValue>) {
        match self.cell(column, row) {
            Some(cell) => cell.borrow_mut().set_value(value),
            None => tracing::debug!(column, row, "set_value out of range ignored"),
        }
    }

    /// Make (`column`, `row`) an aggregate over the rectangle spanned by
    /// (`from_column`, `from_row`) and (`to_column`, `to_row`), read row by
    /// row. Ignored if the target or any corner is outside the grid.
    #[allow(clippy::too_many_arguments)]
    pub fn set_expression(
        &mut self,
        column: usize,
        row: usize,
        operation: Operation,
        from_column: usize,
        from_row: usize,
        to_column: usize,
        to_row: usize,
    ) {
        let Some(target) = self.cell(column, row) else {
            tracing::debug!(column, row, "set_expression target out of range ignored");
            return;
        };
        if self.cell(from_column, from_row).is_none() || self.cell(to_column, to_row).is_none() {
            tracing::debug!(
                from_column,
                from_row,
                to_column,
                to_row,
                "set_expression range out of range ignored"
            );
            return;
        }

        let mut operands = Vec::new();
        for r in from_row..=to_row {
            for c in from_column..=to_column {
                if let Some(cell) = self.cell(c, r) {
                    operands.push(cell);
                }
            }
        }
        target
            .borrow_mut()
            .set_value(Expression::new(operation, &operands));
    }

    pub fn set_cell_type(&mut self, column: usize, row: usize, cell_type: CellType) {
        match self.cell(column, row) {
            Some(cell) => cell.borrow_mut().set_cell_type(cell_type),
            None => tracing::debug!(column, row, "set_cell_type out of range ignored"),
        }
    }

    pub fn set_cell_type_for_row(&mut self, row: usize, cell_type: CellType) {
        let Some(record) = self.rows.get(row) else {
            tracing::debug!(row, "set_cell_type_for_row out of range ignored");
            return;
        };
        for cell in record {
            cell.borrow_mut().set_cell_type(cell_type);
        }
    }

    pub fn set_cell_type_for_column(&mut self, column: usize, cell_type: CellType) {
        if column >= self.column_count() {
            tracing::debug!(column, "set_cell_type_for_column out of range ignored");
            return;
        }
        for cell in self.column_at(column).iter() {
            cell.borrow_mut().set_cell_type(cell_type);
        }
    }

    /// Rows `from_row..=to_row` cut to columns `from_column..=to_column`.
    ///
    /// `None` unless both ranges span at least two indices and lie inside the
    /// grid. The records share cells with the grid.
    pub fn slice(
        &self,
        from_column: usize,
        from_row: usize,
        to_column: usize,
        to_row: usize,
    ) -> Option<Vec<Record>> {
        if to_column <= from_column || to_row <= from_row {
            return None;
        }
        if to_column >= self.column_count() || to_row >= self.row_count() {
            return None;
        }
        Some(
            self.rows[from_row..=to_row]
                .iter()
                .map(|row| Record::from_cells(row.cells()[from_column..=to_column].to_vec()))
                .collect(),
        )
    }

    /// Replace every cell's value with `f(cell)`.
    pub fn apply<F>(&mut self, mut f: F)
    where
        F: FnMut(&Cell) -> CellValue,
    {
        for row in &self.rows {
            row.apply(&mut f);
        }
    }

    /// Replace the value of every cell matching `predicate` with `f(cell)`.
    pub fn apply_if<P, F>(&mut self, mut predicate: P, mut f: F)
    where
        P: FnMut(&Cell) -> bool,
        F: FnMut(&Cell) -> CellValue,
    {
        for row in &self.rows {
            row.apply_if(&mut predicate, &mut f);
        }
    }

    /// Split the rows into grids by key, in order of first appearance.
    ///
    /// Each grid shares cells with this one and carries its names and options.
    pub fn group_by<K, F>(&self, mut key: F) -> Vec<Grid>
    where
        K: Eq + Hash,
        F: FnMut(&Record) -> K,
    {
        let mut slots: HashMap<K, usize> = HashMap::new();
        let mut groups: Vec<Vec<Record>> = Vec::new();
        for row in &self.rows {
            let slot = *slots.entry(key(row)).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(row.clone());
        }
        groups
            .into_iter()
            .map(|records| self.derived(records))
            .collect()
    }

    /// Split the rows by `predicate`; the group of the first row comes first.
    pub fn partition<P>(&self, predicate: P) -> Vec<Grid>
    where
        P: FnMut(&Record) -> bool,
    {
        self.group_by(predicate)
    }
}

fn clamp(index: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if index < 0 {
        return Some(0);
    }
    Some((index as usize).min(len - 1))
}
