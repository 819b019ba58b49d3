//! FILENAME: app/src/error.rs
// PURPOSE: One error type for the whole run, tagged by pipeline stage.

use persistence::{DataFormatError, DataLoadError, ExportError, LoadError};
use pivot_engine::AggregationError;
use charts::RenderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("data load failed: {0}")]
    DataLoad(DataLoadError),

    #[error("data format error: {0}")]
    DataFormat(DataFormatError),

    #[error("aggregation failed for {view}: {source}")]
    Aggregation {
        view: &'static str,
        #[source]
        source: AggregationError,
    },

    #[error("chart rendering failed for {chart}: {source}")]
    Render {
        chart: &'static str,
        #[source]
        source: RenderError,
    },

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<LoadError> for ReportError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Data(e) => ReportError::DataLoad(e),
            LoadError::Format(e) => ReportError::DataFormat(e),
        }
    }
}

impl ReportError {
    /// Pipeline stage name used as the log category.
    pub fn category(&self) -> &'static str {
        match self {
            ReportError::DataLoad(_) | ReportError::DataFormat(_) => "LOAD",
            ReportError::Aggregation { .. } => "AGG",
            ReportError::Render { .. } => "CHART",
            ReportError::Export(_) => "EXPORT",
            ReportError::Config(_) => "SYS",
        }
    }
}
