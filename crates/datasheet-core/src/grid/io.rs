use datasheet_engine::engine::{CellValue, FormatOptions};
use std::path::Path;

use super::Grid;
use crate::error::Result;
use crate::storage::csv::{CsvOptions, quote_field, read_delimited, write_delimited};

impl Grid {
    /// The grid as rows of strings, ready to be written out.
    ///
    /// Column names come first when present. Blank rows are left out. With
    /// `raw` the stored values are used instead of the formatted ones.
    /// Fields containing `delimiter` are quoted.
    pub fn printable_content(&self, raw: bool, delimiter: char) -> Vec<Vec<String>> {
        let mut content = Vec::with_capacity(self.rows.len() + 1);
        if let Some(names) = &self.column_names {
            content.push(
                names
                    .iter()
                    .map(|name| quote_field(name, delimiter))
                    .collect(),
            );
        }
        for row in self.rows.iter().filter(|row| !row.is_empty()) {
            content.push(
                row.iter()
                    .map(|cell| {
                        let cell = cell.borrow();
                        let value = if raw {
                            match cell.raw_value() {
                                CellValue::Expression(expr) => expr.result(&self.options),
                                other => other.to_string(),
                            }
                        } else {
                            cell.value(&self.options)
                        };
                        quote_field(&value, delimiter)
                    })
                    .collect(),
            );
        }
        content
    }

    /// Read a delimited file into a new grid.
    pub fn load(path: &Path, csv: &CsvOptions) -> Result<Grid> {
        Self::load_with_options(path, csv, FormatOptions::default())
    }

    pub fn load_with_options(path: &Path, csv: &CsvOptions, options: FormatOptions) -> Result<Grid> {
        let rows = read_delimited(path, csv)?;
        tracing::debug!(path = %path.display(), rows = rows.len(), "loaded delimited file");
        Ok(Grid::from_rows_with_options(rows, csv.with_column_names, options))
    }

    /// Write the grid's printable content to `path`.
    pub fn save(&self, path: &Path, csv: &CsvOptions) -> Result<()> {
        csv.validate()?;
        let content = self.printable_content(csv.raw_values, csv.delimiter);
        write_delimited(path, &content, csv)?;
        tracing::debug!(path = %path.display(), rows = content.len(), "saved delimited file");
        Ok(())
    }
}
