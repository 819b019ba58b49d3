//! FILENAME: core/persistence/src/report.rs
//! The validated, in-memory shape of a report workbook.
//!
//! Callers describe sheets as `SheetEntry` values in workbook order.
//! `ReportDocument::assemble` checks names and chart placements up front so
//! that nothing is written to disk for an invalid layout.

use charts::ChartArtifact;
use engine::{parse_a1, CellCoord, DataTable};

use crate::error::ExportError;

/// Longest sheet name a workbook accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

// ============================================================================
// INPUT
// ============================================================================

/// Where a chart image goes: a sheet (defaults to the owning sheet) and the
/// A1 cell its top-left corner is pinned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedPosition {
    pub sheet: Option<String>,
    pub anchor: String,
}

impl EmbedPosition {
    /// Anchored on the sheet that owns the chart.
    pub fn at(anchor: &str) -> Self {
        EmbedPosition {
            sheet: None,
            anchor: anchor.to_string(),
        }
    }

    /// Anchored on another named sheet.
    pub fn on(sheet: &str, anchor: &str) -> Self {
        EmbedPosition {
            sheet: Some(sheet.to_string()),
            anchor: anchor.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartPlacement {
    pub chart: ChartArtifact,
    pub position: EmbedPosition,
}

#[derive(Debug, Clone)]
pub enum SheetContent {
    Table {
        table: DataTable,
        chart: Option<ChartPlacement>,
    },
    Text(Vec<String>),
}

impl SheetContent {
    pub fn table(table: DataTable) -> Self {
        SheetContent::Table { table, chart: None }
    }

    pub fn table_with_chart(table: DataTable, chart: ChartArtifact, position: EmbedPosition) -> Self {
        SheetContent::Table {
            table,
            chart: Some(ChartPlacement { chart, position }),
        }
    }

    pub fn text<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        SheetContent::Text(lines.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone)]
pub struct SheetEntry {
    pub name: String,
    pub content: SheetContent,
}

impl SheetEntry {
    pub fn new(name: &str, content: SheetContent) -> Self {
        SheetEntry {
            name: name.to_string(),
            content,
        }
    }
}

// ============================================================================
// VALIDATED DOCUMENT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SheetBody {
    Table(DataTable),
    Text(Vec<String>),
}

/// A chart resolved to a concrete (row, col) on its target sheet.
#[derive(Debug, Clone)]
pub struct PlacedImage {
    pub chart: ChartArtifact,
    pub anchor: CellCoord,
}

#[derive(Debug, Clone)]
pub struct ReportSheet {
    pub name: String,
    pub body: SheetBody,
    pub images: Vec<PlacedImage>,
}

/// An ordered set of uniquely named sheets with every chart placed.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    sheets: Vec<ReportSheet>,
}

impl ReportDocument {
    /// Validates `entries` and resolves chart placements.
    ///
    /// Sheet names must be valid worksheet names and unique ignoring ASCII
    /// case. A placement naming a sheet that is not in `entries`, or an
    /// anchor that is not an A1 reference, is an error.
    pub fn assemble(entries: Vec<SheetEntry>) -> Result<Self, ExportError> {
        for (i, entry) in entries.iter().enumerate() {
            validate_sheet_name(&entry.name)?;
            let clash = entries[..i]
                .iter()
                .any(|earlier| earlier.name.to_lowercase() == entry.name.to_lowercase());
            if clash {
                return Err(ExportError::DuplicateSheet {
                    name: entry.name.clone(),
                });
            }
        }

        let mut sheets = Vec::with_capacity(entries.len());
        let mut placements = Vec::new();
        for entry in entries {
            let body = match entry.content {
                SheetContent::Table { table, chart } => {
                    if let Some(placement) = chart {
                        placements.push((entry.name.clone(), placement));
                    }
                    SheetBody::Table(table)
                }
                SheetContent::Text(lines) => SheetBody::Text(lines),
            };
            sheets.push(ReportSheet {
                name: entry.name,
                body,
                images: Vec::new(),
            });
        }

        for (owner, placement) in placements {
            let target = placement.position.sheet.as_deref().unwrap_or(&owner);
            let index = sheets
                .iter()
                .position(|s| s.name.to_lowercase() == target.to_lowercase())
                .ok_or_else(|| ExportError::UnknownEmbedSheet {
                    owner: owner.clone(),
                    target: target.to_string(),
                })?;
            let anchor =
                parse_a1(&placement.position.anchor).ok_or_else(|| ExportError::InvalidAnchor {
                    sheet: sheets[index].name.clone(),
                    anchor: placement.position.anchor.clone(),
                })?;
            sheets[index].images.push(PlacedImage {
                chart: placement.chart,
                anchor,
            });
        }

        Ok(ReportDocument { sheets })
    }

    pub fn sheets(&self) -> &[ReportSheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&ReportSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn chart_count(&self) -> usize {
        self.sheets.iter().map(|s| s.images.len()).sum()
    }
}

/// Checks the worksheet naming rules: 1 to 31 characters, none of
/// `[ ] : * ? / \`, no leading or trailing apostrophe, not "History".
pub fn validate_sheet_name(name: &str) -> Result<(), ExportError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.chars().count() > MAX_SHEET_NAME_LEN {
        Some("name is longer than 31 characters")
    } else if name.contains(&INVALID_SHEET_CHARS[..]) {
        Some("name contains one of [ ] : * ? / \\")
    } else if name.starts_with('\'') || name.ends_with('\'') {
        Some("name begins or ends with an apostrophe")
    } else if name.eq_ignore_ascii_case("History") {
        Some("name is reserved")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ExportError::InvalidSheetName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
