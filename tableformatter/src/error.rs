use std::result;
use thiserror::Error;

/// Errors raised while building or rendering a table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Row {index} has {found} values but the table has {expected} columns")]
    RowWidth {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Value '{value}' in column {column} cannot be rendered as {format}")]
    UnsupportedValue {
        column: String,
        value: String,
        format: &'static str,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rendered output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl TableError {
    pub(crate) fn unsupported<C: Into<String>, V: ToString>(
        column: C,
        value: V,
        format: &'static str,
    ) -> Self {
        TableError::UnsupportedValue {
            column: column.into(),
            value: value.to_string(),
            format,
        }
    }

    /// Get a user-friendly message for command line display
    pub fn user_message(&self) -> String {
        match self {
            TableError::RowWidth { .. } | TableError::UnsupportedValue { .. } => {
                format!("Internal output error: {}", self)
            }
            TableError::Csv(e) => format!("Failed to write CSV output: {}", e),
            TableError::Json(e) => format!("Failed to write JSON output: {}", e),
            _ => format!("{}", self),
        }
    }
}

pub type Result<T> = result::Result<T, TableError>;
