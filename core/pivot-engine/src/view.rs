//! FILENAME: core/pivot-engine/src/view.rs
//! Aggregate Views - the immutable output of the engine.
//!
//! An `AggregateView` is a list of grouped totals; a `PivotView` is a
//! cross-tabulation. Both convert into an `engine::DataTable` for export.

use engine::{CellValue, DataTable};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::definition::AggregationType;

/// Grouping keys of one row (one or two dimensions in practice).
pub type GroupKeys = SmallVec<[String; 2]>;

// ============================================================================
// AGGREGATE VIEW
// ============================================================================

/// One row of an aggregate view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    pub keys: GroupKeys,
    pub value: f64,
}

impl ViewRow {
    /// The keys joined for display, e.g. "East / Furniture".
    pub fn label(&self) -> String {
        self.keys.join(" / ")
    }
}

/// A derived table keyed by one or two grouping dimensions with a single
/// numeric measure column. Row order is defined by the producing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateView {
    key_columns: Vec<String>,
    measure_column: String,
    rows: Vec<ViewRow>,
}

impl AggregateView {
    pub fn new(key_columns: Vec<String>, measure_column: String, rows: Vec<ViewRow>) -> Self {
        AggregateView {
            key_columns,
            measure_column,
            rows,
        }
    }

    /// Renames the measure column header (e.g. "Sales" -> "Total_Sales").
    pub fn with_measure_label(mut self, label: &str) -> Self {
        self.measure_column = label.to_string();
        self
    }

    /// Renames the key column headers, position by position.
    pub fn with_key_labels(mut self, labels: &[&str]) -> Self {
        for (column, label) in self.key_columns.iter_mut().zip(labels) {
            *column = label.to_string();
        }
        self
    }

    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    pub fn measure_column(&self) -> &str {
        &self.measure_column
    }

    pub fn rows(&self) -> &[ViewRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of the measure over all rows.
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.value).sum()
    }

    /// (label, value) pairs in row order, as depicted by charts.
    pub fn series(&self) -> Vec<(String, f64)> {
        self.rows.iter().map(|r| (r.label(), r.value)).collect()
    }

    /// The row with the greatest value; the first one wins a tie.
    pub fn max_row(&self) -> Option<&ViewRow> {
        self.rows.iter().fold(None, |best: Option<&ViewRow>, row| match best {
            Some(b) if b.value >= row.value => Some(b),
            _ => Some(row),
        })
    }

    /// Converts into a table: key columns followed by the measure column.
    pub fn to_table(&self) -> DataTable {
        let mut columns = self.key_columns.clone();
        columns.push(self.measure_column.clone());
        let mut table = DataTable::new(columns);
        for row in &self.rows {
            let mut cells: Vec<CellValue> = row.keys.iter().map(|k| CellValue::text(k.as_str())).collect();
            cells.push(CellValue::Number(row.value));
            table.push_row(cells);
        }
        table
    }
}

// ============================================================================
// PIVOT VIEW
// ============================================================================

/// A cross-tabulation of one measure over a row field and a column field.
/// Labels are sorted ascending. Cells for combinations absent from the
/// source are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotView {
    pub row_field: String,
    pub column_field: String,
    pub measure: String,
    pub aggregation: AggregationType,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    /// `values[row][col]`, aligned with `row_labels` and `column_labels`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl PivotView {
    /// Looks a cell up by its labels.
    pub fn get(&self, row_label: &str, column_label: &str) -> Option<f64> {
        let r = self.row_labels.iter().position(|l| l == row_label)?;
        let c = self.column_labels.iter().position(|l| l == column_label)?;
        self.values[r][c]
    }

    /// Sum over every present cell; absent cells count as zero.
    pub fn grand_total(&self) -> f64 {
        self.values.iter().flatten().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }

    /// Converts into a table: the row field column, then one column per
    /// column label. Absent cells become `Empty`.
    pub fn to_table(&self) -> DataTable {
        let mut columns = vec![self.row_field.clone()];
        columns.extend(self.column_labels.iter().cloned());
        let mut table = DataTable::new(columns);
        for (label, cells) in self.row_labels.iter().zip(&self.values) {
            let mut row = vec![CellValue::text(label.as_str())];
            row.extend(cells.iter().map(|v| match v {
                Some(n) => CellValue::Number(*n),
                None => CellValue::Empty,
            }));
            table.push_row(row);
        }
        table
    }
}
