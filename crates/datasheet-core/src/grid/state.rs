use datasheet_engine::engine::{Cell, CellHandle, FormatOptions};
use std::fmt;

use super::record::Record;
use crate::storage::frame::render_frame;

/// Rows and columns of a grid created without explicit content.
pub const DEFAULT_CAPACITY: usize = 10;

/// Name given to columns that appear without one.
pub const PLACEHOLDER_COLUMN_NAME: &str = "COLUMN";

/// In-memory table of shared cells.
///
/// Rows are always the same length. When column names are present there is
/// exactly one per column.
#[derive(Clone, Debug)]
pub struct Grid {
    pub(crate) rows: Vec<Record>,
    pub(crate) column_names: Option<Vec<String>>,
    pub(crate) options: FormatOptions,
}

impl Grid {
    /// A 10×10 grid of empty cells.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_options(options: FormatOptions) -> Self {
        Self::with_capacity_and_options(DEFAULT_CAPACITY, options)
    }

    /// An n×n grid of empty cells.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_options(capacity, FormatOptions::default())
    }

    pub fn with_capacity_and_options(capacity: usize, options: FormatOptions) -> Self {
        Grid {
            rows: (0..capacity).map(|_| empty_record(capacity)).collect(),
            column_names: None,
            options,
        }
    }

    /// Build a grid from raw string rows.
    ///
    /// With `with_column_names` the first row becomes the column names. Short
    /// rows are padded to the widest row; an empty input gives the default
    /// 10×10 grid.
    pub fn from_rows(rows: Vec<Vec<String>>, with_column_names: bool) -> Self {
        Self::from_rows_with_options(rows, with_column_names, FormatOptions::default())
    }

    pub fn from_rows_with_options(
        mut rows: Vec<Vec<String>>,
        with_column_names: bool,
        options: FormatOptions,
    ) -> Self {
        if rows.is_empty() {
            return Self::with_options(options);
        }

        let column_names = if with_column_names {
            Some(rows.remove(0))
        } else {
            None
        };

        let width = rows
            .iter()
            .map(Vec::len)
            .chain(column_names.iter().map(Vec::len))
            .max()
            .unwrap_or(0);

        let records = rows
            .into_iter()
            .map(|row| {
                let mut record = Record::from_values(row);
                while record.len() < width {
                    record.push(Cell::new_empty().into_handle());
                }
                record
            })
            .collect();

        let column_names = column_names.map(|mut names| {
            names.resize(width, PLACEHOLDER_COLUMN_NAME.to_string());
            names
        });

        tracing::debug!(width, with_column_names, "built grid from rows");

        Grid {
            rows: records,
            column_names: normalize_names(column_names),
            options,
        }
    }

    /// Build a grid around existing records, sharing their cells.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self::from_records_with_options(records, None, FormatOptions::default())
    }

    pub fn from_records_with_options(
        records: Vec<Record>,
        column_names: Option<Vec<String>>,
        options: FormatOptions,
    ) -> Self {
        Grid {
            rows: records,
            column_names: normalize_names(column_names),
            options,
        }
    }

    /// A new grid over `records` carrying this grid's names and options.
    pub(crate) fn derived(&self, records: Vec<Record>) -> Self {
        Grid {
            rows: records,
            column_names: self.column_names.clone(),
            options: self.options.clone(),
        }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: FormatOptions) {
        self.options = options;
    }

    pub fn has_column_names(&self) -> bool {
        self.column_names.is_some()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_frame(
            self.column_names.as_deref(),
            &self.rows,
            &self.options,
        ))
    }
}

pub(crate) fn empty_record(width: usize) -> Record {
    Record::from_cells((0..width).map(|_| empty_cell()).collect())
}

pub(crate) fn empty_cell() -> CellHandle {
    Cell::new_empty().into_handle()
}

fn normalize_names(names: Option<Vec<String>>) -> Option<Vec<String>> {
    names.filter(|names| !names.is_empty())
}
