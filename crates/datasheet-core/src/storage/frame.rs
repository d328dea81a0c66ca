//! Fixed-width text rendering of a grid.

use datasheet_engine::engine::FormatOptions;

use crate::grid::Record;

const NAME_WIDTH: usize = 8;
const CELL_WIDTH: usize = 10;
const SEPARATOR: &str = " | ";

/// Render names and rows as right-aligned, `" | "`-separated columns.
///
/// Names are shown as `[name]` in 8 characters, cells in 10. Longer values
/// are cut short with `...`. Every line ends with a newline.
pub fn render_frame(names: Option<&[String]>, rows: &[Record], options: &FormatOptions) -> String {
    let mut out = String::new();
    if let Some(names) = names {
        let header: Vec<String> = names
            .iter()
            .map(|name| format!("[{}]", pad(name, NAME_WIDTH)))
            .collect();
        out.push_str(&header.join(SEPARATOR));
        out.push('\n');
    }
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .map(|cell| pad(&cell.borrow().value(options), CELL_WIDTH))
            .collect();
        out.push_str(&line.join(SEPARATOR));
        out.push('\n');
    }
    out
}

fn pad(value: &str, width: usize) -> String {
    format!("{:>width$}", abbreviate(value, width), width = width)
}

/// Shorten `value` to at most `max_width` characters, ending in `...`.
pub fn abbreviate(value: &str, max_width: usize) -> String {
    if value.chars().count() <= max_width || max_width < 4 {
        return value.to_string();
    }
    let mut short: String = value.chars().take(max_width - 3).collect();
    short.push_str("...");
    short
}
