//! FILENAME: core/pivot-engine/src/error.rs

use thiserror::Error;

/// Failures raised while deriving a view from a table.
/// Row numbers are 1-based data rows (the header is not counted).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    #[error("column '{column}' not found in table")]
    MissingColumn { column: String },

    #[error("column '{column}' holds non-numeric value {value:?} at data row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("column '{column}' holds non-date value {value:?} at data row {row}")]
    NotADate {
        column: String,
        row: usize,
        value: String,
    },

    #[error("cannot aggregate '{measure}': table has no rows")]
    NoRows { measure: String },
}
