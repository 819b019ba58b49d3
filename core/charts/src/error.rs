//! FILENAME: core/charts/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

use crate::artifact::ChartKind;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot render {chart} chart: view is empty")]
    EmptyView { chart: ChartKind },

    #[error("cannot render {chart} chart: value for '{label}' is not finite")]
    NonFinite { chart: ChartKind, label: String },

    #[error("cannot render pie chart: slice '{label}' is negative ({value})")]
    NegativeSlice { label: String, value: f64 },

    #[error("cannot render pie chart: values sum to zero")]
    ZeroTotal,

    #[error("PNG encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("cannot write chart to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
