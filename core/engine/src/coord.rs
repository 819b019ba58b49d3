//! FILENAME: core/engine/src/coord.rs
//! PURPOSE: Conversion between A1-style references and 0-based indices.
//! CONTEXT: Chart anchors in the report ("G2", "D2") are given in A1
//! notation while the workbook writer addresses cells by (row, col).
//! Column "A" = 0, "B" = 1, ..., "Z" = 25, "AA" = 26, etc.
//! Row 1 in A1 notation = row 0 internally.

/// A cell coordinate as (row, col) with 0-based indices.
pub type CellCoord = (u32, u32);

/// Largest column index a worksheet can address ("XFD").
pub const MAX_COL: u32 = 16_383;

/// Largest row index a worksheet can address (row 1048576).
pub const MAX_ROW: u32 = 1_048_575;

/// Converts a column string (e.g., "A", "aa", "ABC") to a 0-based column index.
/// Returns None for an empty string, non-letters, or a column past `MAX_COL`.
pub fn col_to_index(col_str: &str) -> Option<u32> {
    if col_str.is_empty() || col_str.len() > 3 {
        return None;
    }
    let mut result: u32 = 0;
    for c in col_str.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        result = result * 26 + digit;
    }
    let index = result - 1;
    (index <= MAX_COL).then_some(index)
}

/// Converts a 0-based column index to a column string.
/// 0 -> "A", 25 -> "Z", 26 -> "AA", 702 -> "AAA".
pub fn index_to_col(mut col_index: u32) -> String {
    let mut result = String::new();
    loop {
        let remainder = col_index % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }
    result
}

/// Parses an A1-style reference ("G2", "$D$2") into a 0-based coordinate.
/// Returns None if the reference is malformed or out of worksheet bounds.
pub fn parse_a1(reference: &str) -> Option<CellCoord> {
    let cleaned: String = reference.trim().chars().filter(|c| *c != '$').collect();
    let split = cleaned.find(|c: char| c.is_ascii_digit())?;
    let (col_part, row_part) = cleaned.split_at(split);
    if row_part.is_empty() || !row_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let col = col_to_index(col_part)?;
    let row_num: u32 = row_part.parse().ok()?;
    if row_num == 0 || row_num - 1 > MAX_ROW {
        return None;
    }
    Some((row_num - 1, col))
}

/// Converts a 0-based (row, col) coordinate to an A1-style reference string.
/// (0, 0) -> "A1", (1, 6) -> "G2"
pub fn coord_to_a1(coord: CellCoord) -> String {
    let (row, col) = coord;
    format!("{}{}", index_to_col(col), row + 1)
}
