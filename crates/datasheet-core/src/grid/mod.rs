//! The grid: rows of shared cells, optional column names and format options.

mod io;
mod ops;
mod record;
mod sort;
mod state;
mod store;

pub use record::{Record, RecordDisplay};
pub use sort::SortOrder;
pub use state::{DEFAULT_CAPACITY, Grid, PLACEHOLDER_COLUMN_NAME};
