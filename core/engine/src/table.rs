//! FILENAME: core/engine/src/table.rs
//! PURPOSE: The in-memory table shared by every pipeline stage.
//! CONTEXT: `DataTable` is a dense, row-major table with named columns. The
//! loader produces one from the sales extract, and every aggregate view is
//! converted back into one before it is written to the report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

// ============================================================================
// SOURCE SCHEMA
// ============================================================================

pub const PRODUCT_NAME: &str = "Product Name";
pub const ORDER_DATE: &str = "Order Date";
pub const REGION: &str = "Region";
pub const CATEGORY: &str = "Category";
pub const SALES: &str = "Sales";
pub const PROFIT: &str = "Profit";

/// Columns every sales extract must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [PRODUCT_NAME, ORDER_DATE, REGION, CATEGORY, SALES, PROFIT];

// ============================================================================
// SALES RECORD
// ============================================================================

/// One typed row of the sales extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_name: String,
    pub order_date: NaiveDate,
    pub region: String,
    pub category: String,
    pub sales: f64,
    pub profit: f64,
}

impl SalesRecord {
    pub fn new(
        product_name: &str,
        order_date: NaiveDate,
        region: &str,
        category: &str,
        sales: f64,
        profit: f64,
    ) -> Self {
        SalesRecord {
            product_name: product_name.to_string(),
            order_date,
            region: region.to_string(),
            category: category.to_string(),
            sales,
            profit,
        }
    }

    fn to_row(&self) -> Vec<CellValue> {
        vec![
            CellValue::Text(self.product_name.clone()),
            CellValue::Date(self.order_date),
            CellValue::Text(self.region.clone()),
            CellValue::Text(self.category.clone()),
            CellValue::Number(self.sales),
            CellValue::Number(self.profit),
        ]
    }
}

// ============================================================================
// DATA TABLE
// ============================================================================

/// A table of rows with named columns. Every row has exactly
/// `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl DataTable {
    /// Creates an empty table with the given column names.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        DataTable {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds the canonical six-column sales table.
    pub fn from_sales_records(records: &[SalesRecord]) -> Self {
        let mut table = DataTable::new(REQUIRED_COLUMNS);
        table.rows = records.iter().map(SalesRecord::to_row).collect();
        table
    }

    /// Appends a row, padding with `Empty` or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Finds a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the cell at (row, col), if in bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Iterates over one column's cells in row order.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |r| r.get(col).unwrap_or(&CellValue::Empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_sales_records_uses_canonical_columns() {
        let records = vec![
            SalesRecord::new("Chair", ymd(2023, 1, 3), "East", "Furniture", 100.0, 20.0),
            SalesRecord::new("Desk", ymd(2023, 1, 9), "East", "Furniture", 200.0, 50.0),
        ];
        let table = DataTable::from_sales_records(&records);

        assert_eq!(table.columns(), &REQUIRED_COLUMNS.map(String::from));
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_index(SALES), Some(4));
        assert_eq!(table.cell(1, 0), Some(&CellValue::text("Desk")));
        assert_eq!(table.cell(0, 1), Some(&CellValue::Date(ymd(2023, 1, 3))));
    }

    #[test]
    fn test_push_row_normalizes_width() {
        let mut table = DataTable::new(["a", "b", "c"]);
        table.push_row(vec![CellValue::Number(1.0)]);
        table.push_row(vec![1.0.into(), 2.0.into(), 3.0.into(), 4.0.into()]);

        assert_eq!(table.rows()[0].len(), 3);
        assert_eq!(table.rows()[0][2], CellValue::Empty);
        assert_eq!(table.rows()[1].len(), 3);
    }

    #[test]
    fn test_column_lookup_is_exact() {
        let table = DataTable::new(["Sales", "Profit"]);
        assert_eq!(table.column_index("Profit"), Some(1));
        assert_eq!(table.column_index("profit"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_column_values() {
        let mut table = DataTable::new(["k", "v"]);
        table.push_row(vec!["x".into(), 1.0.into()]);
        table.push_row(vec!["y".into(), 2.0.into()]);
        let values: Vec<_> = table.column_values(1).filter_map(CellValue::as_number).collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }
}
