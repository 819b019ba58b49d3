//! FILENAME: core/persistence/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// The input could not be read as a sales table.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is missing required column(s): {}", path.display(), columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("cannot read workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },
}

/// A date cell could not be parsed. The whole load fails on the first one.
#[derive(Error, Debug)]
#[error("unparseable date {value:?} in column '{column}' at line {line} of {}", path.display())]
pub struct DataFormatError {
    pub path: PathBuf,
    pub line: u64,
    pub column: String,
    pub value: String,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Data(#[from] DataLoadError),

    #[error(transparent)]
    Format(#[from] DataFormatError),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("duplicate sheet name '{name}'")]
    DuplicateSheet { name: String },

    #[error("invalid sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: &'static str },

    #[error("chart on sheet '{owner}' targets nonexistent sheet '{target}'")]
    UnknownEmbedSheet { owner: String, target: String },

    #[error("invalid chart anchor '{anchor}' on sheet '{sheet}'")]
    InvalidAnchor { sheet: String, anchor: String },

    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("report {} failed verification: {message}", path.display())]
    Verification { path: PathBuf, message: String },
}
