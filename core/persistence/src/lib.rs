//! FILENAME: core/persistence/src/lib.rs
//! Persistence for the sales report.
//!
//! Reading side: `load_sales_csv` turns a sales extract into a `DataTable`.
//! Writing side: `ReportDocument` describes the workbook and `save_report`
//! writes it as one XLSX file with embedded chart images. `stage_report`
//! splits that into a verified staging step and a final rename.
//! `read_workbook_values` reads a written report back for verification.

mod csv_reader;
mod error;
mod report;
mod xlsx_reader;
mod xlsx_writer;

pub use csv_reader::{load_sales_csv, read_sales_csv};
pub use error::{DataFormatError, DataLoadError, ExportError, LoadError};
pub use report::{
    validate_sheet_name, ChartPlacement, EmbedPosition, PlacedImage, ReportDocument, ReportSheet,
    SheetBody, SheetContent, SheetEntry, MAX_SHEET_NAME_LEN,
};
pub use xlsx_reader::{read_workbook_values, SheetValues};
pub use xlsx_writer::{
    build_workbook, save_report, stage_report, StagedReport, AMOUNT_FORMAT, DATE_FORMAT,
};
