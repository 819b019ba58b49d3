//! FILENAME: core/persistence/src/xlsx_reader.rs
//! Reads cell values back out of a written report.

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::Duration;
use engine::{parse_date, CellValue};

use crate::error::DataLoadError;
use crate::xlsx_writer::excel_epoch;

/// The values of one worksheet, row-major, from its first used cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetValues {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetValues {
    /// Header row followed by data rows, as written for table sheets.
    pub fn header(&self) -> &[CellValue] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Opens the workbook at `path` and returns every sheet in workbook order.
pub fn read_workbook_values(path: &Path) -> Result<Vec<SheetValues>, DataLoadError> {
    let workbook_error = |source: calamine::XlsxError| DataLoadError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook: Xlsx<_> = open_workbook::<Xlsx<_>, _>(path).map_err(workbook_error)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(workbook_error)?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(to_cell_value).collect())
            .collect();
        sheets.push(SheetValues {
            name: sheet_name,
            rows,
        });
    }
    Ok(sheets)
}

fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::Text(format!("{:?}", e)),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if dt.is_datetime() && serial.fract() == 0.0 {
                CellValue::Date(excel_epoch() + Duration::days(serial as i64))
            } else {
                CellValue::Number(serial)
            }
        }
        Data::DateTimeIso(s) => parse_date(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_workbook_is_error() {
        let err = read_workbook_values(Path::new("/nonexistent/report.xlsx")).unwrap_err();
        assert!(matches!(err, DataLoadError::Workbook { .. }));
    }

    #[test]
    fn test_to_cell_value() {
        assert_eq!(to_cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(to_cell_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(to_cell_value(&Data::String("x".into())), CellValue::text("x"));
        assert_eq!(
            to_cell_value(&Data::DateTimeIso("2023-01-05".into())),
            CellValue::Date(chrono::NaiveDate::from_ymd_opt(2023, 1, 5).unwrap())
        );
    }
}
