//! FILENAME: core/persistence/src/xlsx_writer.rs

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use engine::{CellValue, DataTable};
use rust_xlsxwriter::{Format, Image, Workbook as XlsxWorkbook, Worksheet};
use tempfile::NamedTempFile;

use crate::error::ExportError;
use crate::report::{ReportDocument, ReportSheet, SheetBody};
use crate::xlsx_reader::read_workbook_values;

pub const AMOUNT_FORMAT: &str = "#,##0.00";
pub const DATE_FORMAT: &str = "yyyy-mm-dd";

const MIN_COLUMN_WIDTH: usize = 8;
const MAX_COLUMN_WIDTH: usize = 60;
const MAX_TEXT_WIDTH: usize = 100;

/// Writes `document` to `path` as a single XLSX file.
///
/// Equivalent to `stage_report` followed by `StagedReport::commit`.
pub fn save_report(document: &ReportDocument, path: &Path) -> Result<(), ExportError> {
    stage_report(document, path)?.commit()
}

/// A verified report written beside its target, not yet in place.
///
/// Dropping it without `commit` deletes the staged file and leaves the
/// target untouched.
#[derive(Debug)]
pub struct StagedReport {
    staging: NamedTempFile,
    target: PathBuf,
    sheet_names: Vec<String>,
    chart_count: usize,
}

impl StagedReport {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Sheet names as read back from the staged file.
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Renames the staged file over the target.
    pub fn commit(self) -> Result<(), ExportError> {
        let target = self.target;
        self.staging.persist(&target).map_err(|e| ExportError::Io {
            path: target.clone(),
            source: e.error,
        })?;
        log::info!(
            "wrote {} sheets and {} charts to {}",
            self.sheet_names.len(),
            self.chart_count,
            target.display()
        );
        Ok(())
    }
}

/// Serializes `document`, writes it to a temporary file beside `path` and
/// reads it back to check the sheet list.
///
/// Parent directories of `path` are created. Nothing is written at `path`
/// itself until the returned report is committed.
pub fn stage_report(document: &ReportDocument, path: &Path) -> Result<StagedReport, ExportError> {
    let bytes = build_workbook(document)?;
    let staging = write_staging(&bytes, path)?;

    let verification_error = |message: String| ExportError::Verification {
        path: path.to_path_buf(),
        message,
    };
    let sheets = read_workbook_values(staging.path()).map_err(|e| verification_error(e.to_string()))?;
    let found: Vec<String> = sheets.into_iter().map(|s| s.name).collect();
    let expected = document.sheet_names();
    if found != expected {
        return Err(verification_error(format!(
            "expected sheets {:?}, found {:?}",
            expected, found
        )));
    }
    log::debug!("staged and verified {} sheets for {}", found.len(), path.display());

    Ok(StagedReport {
        staging,
        target: path.to_path_buf(),
        sheet_names: found,
        chart_count: document.chart_count(),
    })
}

/// Serializes `document` into XLSX bytes.
pub fn build_workbook(document: &ReportDocument) -> Result<Vec<u8>, ExportError> {
    let mut xlsx = XlsxWorkbook::new();
    let formats = Formats::new();

    for sheet in document.sheets() {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        match &sheet.body {
            SheetBody::Table(table) => write_table(worksheet, table, &formats)?,
            SheetBody::Text(lines) => write_lines(worksheet, lines, &formats)?,
        }
        insert_images(worksheet, sheet)?;
    }

    Ok(xlsx.save_to_buffer()?)
}

struct Formats {
    header: Format,
    amount: Format,
    date: Format,
}

impl Formats {
    fn new() -> Self {
        Formats {
            header: Format::new().set_bold(),
            amount: Format::new().set_num_format(AMOUNT_FORMAT),
            date: Format::new().set_num_format(DATE_FORMAT),
        }
    }
}

fn write_table(worksheet: &mut Worksheet, table: &DataTable, formats: &Formats) -> Result<(), ExportError> {
    let mut widths: Vec<usize> = table.columns().iter().map(|c| c.chars().count()).collect();

    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &formats.header)?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let xl_row = r as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            let xl_col = col as u16;
            match value {
                CellValue::Empty => {}
                CellValue::Number(n) => {
                    worksheet.write_number_with_format(xl_row, xl_col, *n, &formats.amount)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(xl_row, xl_col, s)?;
                }
                CellValue::Date(d) => {
                    worksheet.write_number_with_format(xl_row, xl_col, excel_serial(*d), &formats.date)?;
                }
            }
            let width = display_width(value);
            if let Some(w) = widths.get_mut(col) {
                *w = (*w).max(width);
            }
        }
    }

    for (col, width) in widths.iter().enumerate() {
        let width = (width + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        worksheet.set_column_width(col as u16, width as f64)?;
    }
    Ok(())
}

fn write_lines(worksheet: &mut Worksheet, lines: &[String], formats: &Formats) -> Result<(), ExportError> {
    for (row, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        if row == 0 {
            worksheet.write_string_with_format(0, 0, line, &formats.header)?;
        } else {
            worksheet.write_string(row as u32, 0, line)?;
        }
    }
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = (longest + 2).clamp(MIN_COLUMN_WIDTH, MAX_TEXT_WIDTH);
    worksheet.set_column_width(0, width as f64)?;
    Ok(())
}

fn insert_images(worksheet: &mut Worksheet, sheet: &ReportSheet) -> Result<(), ExportError> {
    for placed in &sheet.images {
        let image = Image::new_from_buffer(placed.chart.png())?;
        let (row, col) = placed.anchor;
        worksheet.insert_image(row, col as u16, &image)?;
        log::debug!(
            "embedded {} chart '{}' on '{}' at ({}, {})",
            placed.chart.kind(),
            placed.chart.title(),
            sheet.name,
            row,
            col
        );
    }
    Ok(())
}

/// Days since the 1900 date system epoch, as Excel stores dates.
pub(crate) fn excel_serial(date: NaiveDate) -> f64 {
    (date - excel_epoch()).num_days() as f64
}

pub(crate) fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default()
}

/// Approximate rendered width in characters.
fn display_width(value: &CellValue) -> usize {
    match value {
        CellValue::Empty => 0,
        // Room for thousands separators and two decimals.
        CellValue::Number(n) => {
            let digits = format!("{:.0}", n.abs()).len();
            digits + digits.saturating_sub(1) / 3 + 4
        }
        CellValue::Text(s) => s.chars().count(),
        CellValue::Date(_) => 10,
    }
}

fn write_staging(bytes: &[u8], path: &Path) -> Result<NamedTempFile, ExportError> {
    let io_error = |source: std::io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(io_error)?;

    let mut staging = NamedTempFile::new_in(parent).map_err(io_error)?;
    staging.write_all(bytes).map_err(io_error)?;
    staging.as_file().sync_all().map_err(io_error)?;
    Ok(staging)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{EmbedPosition, SheetContent, SheetEntry};
    use crate::test_support::{region_chart, region_table};

    fn document() -> ReportDocument {
        ReportDocument::assemble(vec![
            SheetEntry::new(
                "Profit by Region",
                SheetContent::table_with_chart(region_table(), region_chart(), EmbedPosition::at("E2")),
            ),
            SheetEntry::new("Summary", SheetContent::text(["Key Insights", "", "Sales are up"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_excel_serial() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        assert_eq!(excel_serial(date), 44931.0);
        assert_eq!(excel_serial(NaiveDate::from_ymd_opt(1900, 3, 1).unwrap()), 61.0);
    }

    #[test]
    fn test_build_workbook_is_zip() {
        let bytes = build_workbook(&document()).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_save_creates_parent_dirs_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out").join("report.xlsx");
        save_report(&document(), &path).unwrap();

        let sheets = read_workbook_values(&path).unwrap();
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Profit by Region", "Summary"]);

        let table = region_table();
        assert_eq!(sheets[0].rows[0], vec![CellValue::text("Region"), CellValue::text("Profit")]);
        assert_eq!(&sheets[0].rows[1..], table.rows());

        assert_eq!(sheets[1].rows[0], vec![CellValue::text("Key Insights")]);
        assert_eq!(sheets[1].rows[1], vec![CellValue::Empty]);
        assert_eq!(sheets[1].rows[2], vec![CellValue::text("Sales are up")]);
    }

    #[test]
    fn test_dates_round_trip() {
        let mut table = DataTable::new(["Order Date", "Sales"]);
        let date = NaiveDate::from_ymd_opt(2023, 2, 28).unwrap();
        table.push_row(vec![CellValue::Date(date), CellValue::Number(1234.5)]);
        let doc = ReportDocument::assemble(vec![SheetEntry::new("Dates", SheetContent::table(table))]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dates.xlsx");
        save_report(&doc, &path).unwrap();

        let sheets = read_workbook_values(&path).unwrap();
        assert_eq!(sheets[0].rows[1], vec![CellValue::Date(date), CellValue::Number(1234.5)]);
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        fs::write(&path, b"stale").unwrap();
        save_report(&document(), &path).unwrap();
        assert_eq!(&fs::read(&path).unwrap()[..2], b"PK");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_staged_report_is_verified_but_not_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let staged = stage_report(&document(), &path).unwrap();
        assert_eq!(staged.sheet_names(), ["Profit by Region", "Summary"]);
        assert_eq!(staged.target(), path.as_path());
        assert!(!path.exists());

        staged.commit().unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_dropped_staged_report_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        fs::write(&path, b"previous").unwrap();
        drop(stage_report(&document(), &path).unwrap());
        assert_eq!(fs::read(&path).unwrap(), b"previous");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_unwritable_target_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let err = save_report(&document(), &blocker.join("report.xlsx")).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
