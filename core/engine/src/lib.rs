//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the shared sales data model.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod cell;
pub mod coord;
pub mod dates;
pub mod table;

// Re-export commonly used types at the crate root
pub use cell::CellValue;
pub use coord::{col_to_index, coord_to_a1, index_to_col, parse_a1, CellCoord};
pub use dates::parse_date;
pub use table::{
    DataTable, SalesRecord, CATEGORY, ORDER_DATE, PRODUCT_NAME, PROFIT, REGION,
    REQUIRED_COLUMNS, SALES,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_builds_tables_from_text_dates() {
        let date = parse_date("1/15/2023").unwrap();
        let record = SalesRecord::new("Lamp", date, "West", "Furniture", 42.0, 4.2);
        let table = DataTable::from_sales_records(&[record]);

        let col = table.column_index(ORDER_DATE).unwrap();
        assert_eq!(table.cell(0, col).unwrap().display_value(), "2023-01-15");
    }

    #[test]
    fn it_serializes_tables() {
        let mut table = DataTable::new(["Region", "Sales"]);
        table.push_row(vec!["East".into(), 10.0.into()]);

        let json = serde_json::to_string(&table).unwrap();
        let back: DataTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
