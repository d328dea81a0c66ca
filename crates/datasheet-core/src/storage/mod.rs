//! File format adapters.

pub mod csv;
pub mod frame;

pub use csv::{CsvOptions, format_delimited, parse_delimited, read_delimited, write_delimited};
pub use frame::render_frame;
