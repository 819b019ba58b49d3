//! FILENAME: core/charts/src/artifact.rs
//! The rendered chart handed from the renderer to the exporter.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
        };
        f.write_str(name)
    }
}

/// An immutable PNG image together with the data it depicts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    kind: ChartKind,
    title: String,
    width: u32,
    height: u32,
    png: Vec<u8>,
    series: Vec<(String, f64)>,
}

impl ChartArtifact {
    pub(crate) fn new(
        kind: ChartKind,
        title: &str,
        (width, height): (u32, u32),
        png: Vec<u8>,
        series: Vec<(String, f64)>,
    ) -> Self {
        ChartArtifact {
            kind,
            title: title.to_string(),
            width,
            height,
            png,
            series,
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Pixel size as (width, height).
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The encoded PNG bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// The (label, value) pairs drawn, in drawing order.
    pub fn series(&self) -> &[(String, f64)] {
        &self.series
    }

    /// Writes the PNG to any sink.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(&self.png)?;
        sink.flush()
    }

    /// Writes the PNG to a file, replacing it if present.
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        let to_io = |source: io::Error| RenderError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::create(path).map_err(to_io)?;
        self.write_to(&mut file).map_err(to_io)
    }
}
