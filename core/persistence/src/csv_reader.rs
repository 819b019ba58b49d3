//! FILENAME: core/persistence/src/csv_reader.rs
//! Loads a sales extract from CSV into a `DataTable`.
//!
//! Every column of the file is kept, in file order. The six report columns
//! must be present. `Order Date` cells are parsed as dates and any
//! unparseable value fails the whole load. The grouping keys (`Product
//! Name`, `Region`, `Category`) are kept as text exactly as written, so
//! "007" and "7" stay distinct. Every other cell is inferred as a number
//! when it reads as one, otherwise kept as text.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use engine::{
    parse_date, CellValue, DataTable, CATEGORY, ORDER_DATE, PRODUCT_NAME, REGION, REQUIRED_COLUMNS,
};

use crate::error::{DataFormatError, DataLoadError, LoadError};

const BOM: char = '\u{feff}';

/// Identifier columns: never reinterpreted as numbers.
const KEY_COLUMNS: [&str; 3] = [PRODUCT_NAME, REGION, CATEGORY];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Date,
    Key,
    Inferred,
}

impl ColumnKind {
    fn of(header: &str) -> Self {
        if header == ORDER_DATE {
            ColumnKind::Date
        } else if KEY_COLUMNS.contains(&header) {
            ColumnKind::Key
        } else {
            ColumnKind::Inferred
        }
    }
}

/// Opens `path` and loads it as a sales table.
pub fn load_sales_csv(path: &Path) -> Result<DataTable, LoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_sales_csv(file, path)?;
    log::info!(
        "loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

/// Reads a sales table from any reader. `source` names the input in errors.
pub fn read_sales_csv<R: Read>(input: R, source: &Path) -> Result<DataTable, LoadError> {
    let csv_error = |err: csv::Error| DataLoadError::Csv {
        path: source.to_path_buf(),
        source: err,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim_start_matches(BOM).trim().to_string())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns {
            path: source.to_path_buf(),
            columns: missing,
        }
        .into());
    }

    let kinds: Vec<ColumnKind> = headers.iter().map(|h| ColumnKind::of(h)).collect();
    let mut table = DataTable::new(headers);

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        // Header is line 1.
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(i as u64 + 2);

        let mut row = Vec::with_capacity(record.len());
        for (field, kind) in record.iter().zip(&kinds) {
            let cell = match kind {
                ColumnKind::Date => parse_date_cell(field).ok_or_else(|| DataFormatError {
                    path: source.to_path_buf(),
                    line,
                    column: ORDER_DATE.to_string(),
                    value: field.to_string(),
                })?,
                ColumnKind::Key => key_cell(field),
                ColumnKind::Inferred => infer_cell(field),
            };
            row.push(cell);
        }
        table.push_row(row);
    }

    Ok(table)
}

fn parse_date_cell(field: &str) -> Option<CellValue> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Some(CellValue::Empty);
    }
    parse_date(trimmed).map(CellValue::Date)
}

/// Text exactly as written; blank fields are empty.
fn key_cell(field: &str) -> CellValue {
    if field.trim().is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(field.to_string())
    }
}

/// Number when the field reads as one, otherwise trimmed text.
pub(crate) fn infer_cell(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match parse_amount(trimmed) {
        Some(n) => CellValue::Number(n),
        None => CellValue::Text(trimmed.to_string()),
    }
}

/// Parses plain and currency-style amounts: `1234.5`, `-3`, `1e3`,
/// `$1,234.50`, `-$12`. Thousands separators must group by three.
fn parse_amount(s: &str) -> Option<f64> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest);

    if !rest.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if !rest
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    let digits = if rest.contains(',') {
        let integer = rest.split(&['.', 'e', 'E'][..]).next().unwrap_or(rest);
        let mut groups = integer.split(',');
        let first_ok = groups.next().is_some_and(|g| (1..=3).contains(&g.len()));
        if !first_ok || !groups.all(|g| g.len() == 3) {
            return None;
        }
        if rest[integer.len()..].contains(',') {
            return None;
        }
        rest.replace(',', "")
    } else {
        rest.to_string()
    };

    let value: f64 = digits.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}
