//! Error types for datasheet storage.

use thiserror::Error;

/// Errors raised by the file adapters. Grid operations themselves never fail.
#[derive(Error, Debug)]
pub enum DatasheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DatasheetError>;
