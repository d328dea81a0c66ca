//! datasheet-core - Grid model, sorting and delimited-text storage.

pub mod error;
pub mod grid;
pub mod storage;

pub use error::{DatasheetError, Result};
pub use grid::{Grid, Record, SortOrder};
pub use storage::CsvOptions;

pub use datasheet_engine::engine::{
    Cell, CellHandle, CellType, CellValue, EXPR_ERROR, FormatOptions, Operation,
};
