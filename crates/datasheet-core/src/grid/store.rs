//! Structural mutation: inserting, replacing and removing rows and columns.
//!
//! Every operation keeps the grid rectangular. A record longer than the
//! current width (for rows) or height (for columns) grows the whole grid with
//! empty cells first; a shorter one is padded.

use datasheet_engine::engine::{CellHandle, CellType, CellValue, is_parsable};

use super::Grid;
use super::record::Record;
use super::state::{PLACEHOLDER_COLUMN_NAME, empty_cell, empty_record};

/// Axis along which a new record is laid out.
#[derive(Copy, Clone, Debug)]
enum Dimension {
    Row,
    Column,
}

impl Dimension {
    /// Current extent of the grid along this record's length.
    fn extent(&self, grid: &Grid) -> usize {
        match self {
            Dimension::Row => grid.column_count(),
            Dimension::Column => grid.row_count(),
        }
    }
}

impl Grid {
    /// Insert a row at `index` (appends when past the end).
    pub fn add_row<I, V>(&mut self, index: usize, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let cells = self.create_record(values, Dimension::Row);
        let index = index.min(self.rows.len());
        self.rows.insert(index, Record::from_cells(cells));
    }

    /// Append a row.
    pub fn push_row<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.add_row(self.rows.len(), values);
    }

    /// Replace the contents of the row at `index`. Ignored when the row does
    /// not exist.
    ///
    /// The row's cells keep their identity, so expressions reading them see
    /// the new values. Cells without a new value are cleared; every cell is
    /// reset to `Text`.
    pub fn set_row<I, V>(&mut self, index: usize, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        if index >= self.rows.len() {
            tracing::debug!(index, rows = self.rows.len(), "set_row out of range ignored");
            return;
        }
        let values: Vec<CellValue> = values.into_iter().map(Into::into).collect();
        self.widen(values.len());
        let mut values = values.into_iter();
        for cell in self.rows[index].iter() {
            overwrite(cell, values.next().unwrap_or_default());
        }
    }

    /// Insert a column at `index` (appends when past the end).
    ///
    /// When the grid has column names and the first value is non-numeric
    /// text, that value is taken as the new column's name. Otherwise the
    /// column is named `COLUMN`.
    pub fn add_column<I, V>(&mut self, index: usize, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let mut values: Vec<CellValue> = values.into_iter().map(Into::into).collect();

        let name = if self.column_names.is_some() {
            match values.first().map(ToString::to_string) {
                Some(first) if !is_parsable(&first) => {
                    values.remove(0);
                    Some(first)
                }
                _ => Some(PLACEHOLDER_COLUMN_NAME.to_string()),
            }
        } else {
            None
        };

        let width = self.column_count();
        let index = index.min(width);
        let cells = self.create_record(values, Dimension::Column);
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.insert(index, cell);
        }
        if let (Some(names), Some(name)) = (self.column_names.as_mut(), name) {
            let index = index.min(names.len());
            names.insert(index, name);
        }
    }

    /// Append a column.
    pub fn push_column<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.add_column(self.column_count(), values);
    }

    /// Replace the contents of the column at `index`, keeping its cells like
    /// [`set_row`](Grid::set_row). Ignored when the column does not exist.
    pub fn set_column<I, V>(&mut self, index: usize, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        if index >= self.column_count() {
            tracing::debug!(index, columns = self.column_count(), "set_column out of range ignored");
            return;
        }
        let values: Vec<CellValue> = values.into_iter().map(Into::into).collect();
        self.lengthen(values.len());
        let mut values = values.into_iter();
        for row in &self.rows {
            if let Some(cell) = row.get(index) {
                overwrite(cell, values.next().unwrap_or_default());
            }
        }
    }

    /// Remove the row at `index`. Ignored when the row does not exist.
    pub fn remove_row(&mut self, index: usize) {
        if index >= self.rows.len() {
            tracing::debug!(index, "remove_row out of range ignored");
            return;
        }
        self.rows.remove(index);
    }

    /// Remove the column at `index` and its name. Ignored when out of range.
    pub fn remove_column(&mut self, index: usize) {
        if index >= self.column_count() {
            tracing::debug!(index, "remove_column out of range ignored");
            return;
        }
        for row in &mut self.rows {
            row.remove(index);
        }
        if let Some(names) = self.column_names.as_mut() {
            if index < names.len() {
                names.remove(index);
            }
        }
    }

    /// Remove the first column called `name`, if any.
    pub fn remove_column_by_name(&mut self, name: &str) {
        let Some(index) = self.column_index(name) else {
            tracing::debug!(name, "remove_column_by_name: no such column");
            return;
        };
        self.remove_column(index);
    }

    /// Turn `values` into cells sized to the grid, growing the grid first when
    /// the values do not fit.
    fn create_record<I, V>(&mut self, values: I, dimension: Dimension) -> Vec<CellHandle>
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let mut cells = Record::from_values(values).into_cells();
        let extent = dimension.extent(self);
        if cells.len() < extent {
            cells.resize_with(extent, empty_cell);
        } else if cells.len() > extent {
            match dimension {
                Dimension::Row => self.widen(cells.len()),
                Dimension::Column => self.lengthen(cells.len()),
            }
        }
        cells
    }

    /// Add empty columns (and placeholder names) until the grid is `width` wide.
    fn widen(&mut self, width: usize) {
        let current = self.column_count();
        if width <= current {
            return;
        }
        tracing::debug!(from = current, to = width, "widening grid");
        if let Some(names) = self.column_names.as_mut() {
            names.resize(width, PLACEHOLDER_COLUMN_NAME.to_string());
        }
        for row in &mut self.rows {
            for _ in current..width {
                row.push(empty_cell());
            }
        }
    }

    /// Append empty rows until the grid is `height` tall.
    fn lengthen(&mut self, height: usize) {
        let current = self.rows.len();
        if height <= current {
            return;
        }
        tracing::debug!(from = current, to = height, "lengthening grid");
        let width = self.column_count();
        for _ in current..height {
            self.rows.push(empty_record(width));
        }
    }
}

fn overwrite(cell: &CellHandle, value: CellValue) {
    let mut cell = cell.borrow_mut();
    cell.set_value(value);
    cell.set_cell_type(CellType::Text);
}
