//! Delimited text import/export

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::error::{DatasheetError, Result};

/// How delimited files are read and written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CsvOptions {
    /// Field separator. Use `'\t'` for TSV.
    pub delimiter: char,
    /// Treat the first row as column names.
    pub with_column_names: bool,
    /// Write stored values instead of formatted ones.
    pub raw_values: bool,
    /// Character encoding label of the file, e.g. `utf-8` or `windows-1252`.
    pub encoding: String,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: ',',
            with_column_names: false,
            raw_values: false,
            encoding: "utf-8".to_string(),
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_column_names(mut self, with_column_names: bool) -> Self {
        self.with_column_names = with_column_names;
        self
    }

    pub fn with_raw_values(mut self, raw_values: bool) -> Self {
        self.raw_values = raw_values;
        self
    }

    pub fn with_encoding(mut self, label: &str) -> Self {
        self.encoding = label.to_string();
        self
    }

    /// Reject delimiters that cannot separate fields and unknown encodings.
    pub fn validate(&self) -> Result<()> {
        match self.delimiter {
            '"' | '\n' | '\r' | '\0' => {
                return Err(DatasheetError::Config(format!(
                    "{:?} cannot be used as a delimiter",
                    self.delimiter
                )));
            }
            _ => {}
        }
        self.text_encoding().map(|_| ())
    }

    fn text_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes())
            .ok_or_else(|| DatasheetError::Config(format!("unknown encoding {:?}", self.encoding)))
    }
}

/// Read a delimited file into rows of raw strings.
pub fn read_delimited(path: &Path, options: &CsvOptions) -> Result<Vec<Vec<String>>> {
    options.validate()?;
    let bytes = std::fs::read(path)?;
    let (content, used, had_errors) = options.text_encoding()?.decode(&bytes);
    if had_errors {
        tracing::warn!(
            path = %path.display(),
            encoding = used.name(),
            "malformed input replaced while decoding"
        );
    }
    parse_delimited(&content, options.delimiter)
}

/// Split delimited text into rows of raw strings.
///
/// Lines consisting of a single NUL are skipped and stray NULs are dropped.
/// Fields are not trimmed.
pub fn parse_delimited(content: &str, delimiter: char) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line == "\0" {
            continue;
        }
        let line = line.replace('\0', "");
        let fields = parse_line(&line, delimiter).ok_or_else(|| DatasheetError::Parse {
            line: index + 1,
            message: "unterminated quoted field".to_string(),
        })?;
        rows.push(fields);
    }
    Ok(rows)
}

/// Parse a single line, handling quoted fields and `""` escapes.
///
/// Returns `None` if a quoted field is still open at the end of the line.
pub(crate) fn parse_line(line: &str, delimiter: char) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == '"' && current.is_empty() {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    if in_quotes {
        return None;
    }
    fields.push(current);
    Some(fields)
}

/// Write rows to `path`, one line per row, in the configured encoding.
///
/// UTF-16 labels are written as UTF-8. Characters the encoding cannot
/// represent are written as numeric character references.
pub fn write_delimited(path: &Path, rows: &[Vec<String>], options: &CsvOptions) -> Result<()> {
    let text = format_delimited(rows, options.delimiter);
    let (bytes, _, _) = options.text_encoding()?.encode(&text);
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    file.write_all(&bytes)?;
    file.flush()?;
    Ok(())
}

/// Join rows with `delimiter`, newline-terminating each one.
pub fn format_delimited(rows: &[Vec<String>], delimiter: char) -> String {
    let separator = delimiter.to_string();
    let mut out = String::new();
    for row in rows {
        out.push_str(&row.join(&separator));
        out.push('\n');
    }
    out
}

/// Quote `value` if it contains `delimiter` and is not already quoted.
pub fn quote_field(value: &str, delimiter: char) -> String {
    let already_quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
    if value.contains(delimiter) && !already_quoted {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
