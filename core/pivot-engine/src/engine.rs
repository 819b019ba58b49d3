//! FILENAME: core/pivot-engine/src/engine.rs
//! Aggregation Engine - transforms a loaded table into derived views.
//!
//! Every operation is a pure function of its inputs:
//! 1. Resolve the key and measure columns by name
//! 2. Scan rows once, accumulating per group (first-appearance order)
//! 3. Order the groups as the operation defines
//!
//! Null policy: rows whose grouping key (or date) cell is empty are skipped;
//! an empty measure cell places its row in a group but adds nothing.

use std::collections::{BTreeMap, BTreeSet};

use engine::{CellValue, DataTable};
use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};

use crate::accumulator::AggregateAccumulator;
use crate::definition::{AggregationType, Granularity, Period};
use crate::error::AggregationError;
use crate::view::{AggregateView, GroupKeys, PivotView, ViewRow};

// ============================================================================
// COLUMN RESOLUTION
// ============================================================================

fn resolve_column(table: &DataTable, name: &str) -> Result<usize, AggregationError> {
    table
        .column_index(name)
        .ok_or_else(|| AggregationError::MissingColumn {
            column: name.to_string(),
        })
}

fn ensure_rows(table: &DataTable, measure: &str) -> Result<(), AggregationError> {
    if table.is_empty() {
        return Err(AggregationError::NoRows {
            measure: measure.to_string(),
        });
    }
    Ok(())
}

/// Reads a measure cell. `Empty` yields None; text or dates are rejected.
fn measure_value(
    cell: &CellValue,
    column: &str,
    row_index: usize,
) -> Result<Option<f64>, AggregationError> {
    match cell {
        CellValue::Empty => Ok(None),
        CellValue::Number(n) => Ok(Some(*n)),
        other => Err(AggregationError::NonNumeric {
            column: column.to_string(),
            row: row_index + 1,
            value: other.display_value(),
        }),
    }
}

// ============================================================================
// GROUPING
// ============================================================================

/// Groups in first-appearance order with their accumulated measure.
struct Groups {
    index: FxHashMap<GroupKeys, usize>,
    entries: Vec<(GroupKeys, AggregateAccumulator)>,
}

impl Groups {
    fn new() -> Self {
        Groups {
            index: FxHashMap::default(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, keys: GroupKeys) -> &mut AggregateAccumulator {
        let slot = match self.index.get(&keys) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(keys.clone(), slot);
                self.entries.push((keys, AggregateAccumulator::new()));
                slot
            }
        };
        &mut self.entries[slot].1
    }
}

/// Scans the table once, grouping by the named key columns.
fn group_rows(
    table: &DataTable,
    key_names: &[&str],
    measure: &str,
) -> Result<Groups, AggregationError> {
    let key_cols = key_names
        .iter()
        .map(|name| resolve_column(table, name))
        .collect::<Result<SmallVec<[usize; 2]>, _>>()?;
    let measure_col = resolve_column(table, measure)?;
    ensure_rows(table, measure)?;

    let mut groups = Groups::new();
    for (row_index, row) in table.rows().iter().enumerate() {
        if key_cols.iter().any(|&c| row[c].is_empty()) {
            continue;
        }
        let value = measure_value(&row[measure_col], measure, row_index)?;
        let keys: GroupKeys = key_cols.iter().map(|&c| row[c].display_value()).collect();
        let acc = groups.entry(keys);
        if let Some(v) = value {
            acc.add_number(v);
        }
    }

    log::debug!(
        "grouped {} rows by {:?} into {} groups",
        table.row_count(),
        key_names,
        groups.entries.len()
    );
    Ok(groups)
}

fn summed_rows(entries: Vec<(GroupKeys, AggregateAccumulator)>) -> Vec<ViewRow> {
    entries
        .into_iter()
        .map(|(keys, acc)| ViewRow {
            keys,
            value: acc.compute(AggregationType::Sum),
        })
        .collect()
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Sums `measure` per distinct `group_key` and keeps the `n` largest totals,
/// sorted descending. Equal totals keep the order in which their keys first
/// appear in the table.
pub fn top_n_by_sum(
    table: &DataTable,
    group_key: &str,
    measure: &str,
    n: usize,
) -> Result<AggregateView, AggregationError> {
    let groups = group_rows(table, &[group_key], measure)?;
    let mut rows = summed_rows(groups.entries);

    // sort_by is stable, which gives the input-order tie-break.
    rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    rows.truncate(n);

    Ok(AggregateView::new(owned(&[group_key]), measure.to_string(), rows))
}

/// Sums `measure` per distinct `key`, ordered ascending by key.
pub fn sum_by_key(
    table: &DataTable,
    key: &str,
    measure: &str,
) -> Result<AggregateView, AggregationError> {
    let groups = group_rows(table, &[key], measure)?;
    let mut rows = summed_rows(groups.entries);
    rows.sort_by(|a, b| a.keys.cmp(&b.keys));

    Ok(AggregateView::new(owned(&[key]), measure.to_string(), rows))
}

/// Sums `measure` per (key_a, key_b) pair, ordered lexicographically by the
/// pair's display text.
pub fn sum_by_two_keys(
    table: &DataTable,
    key_a: &str,
    key_b: &str,
    measure: &str,
) -> Result<AggregateView, AggregationError> {
    let groups = group_rows(table, &[key_a, key_b], measure)?;
    let mut rows = summed_rows(groups.entries);
    rows.sort_by(|a, b| a.keys.cmp(&b.keys));

    Ok(AggregateView::new(owned(&[key_a, key_b]), measure.to_string(), rows))
}

/// Sums `measure` per time bucket of `date_column`, ascending by period.
/// Each total covers exactly the rows whose date falls in that bucket.
pub fn sum_by_period(
    table: &DataTable,
    date_column: &str,
    measure: &str,
    granularity: Granularity,
) -> Result<AggregateView, AggregationError> {
    let date_col = resolve_column(table, date_column)?;
    let measure_col = resolve_column(table, measure)?;
    ensure_rows(table, measure)?;

    let mut periods: BTreeMap<Period, f64> = BTreeMap::new();
    for (row_index, row) in table.rows().iter().enumerate() {
        let date = match &row[date_col] {
            CellValue::Empty => continue,
            CellValue::Date(d) => *d,
            other => {
                return Err(AggregationError::NotADate {
                    column: date_column.to_string(),
                    row: row_index + 1,
                    value: other.display_value(),
                })
            }
        };
        let value = measure_value(&row[measure_col], measure, row_index)?;
        *periods.entry(Period::of(date, granularity)).or_insert(0.0) += value.unwrap_or(0.0);
    }

    let rows = periods
        .into_iter()
        .map(|(period, total)| ViewRow {
            keys: smallvec![period.label()],
            value: total,
        })
        .collect();

    Ok(AggregateView::new(owned(&[date_column]), measure.to_string(), rows))
}

/// Cross-tabulates `measure` with `row_key` values down and `col_key` values
/// across, reducing each cell with `aggregation`. Labels are sorted
/// ascending; combinations absent from the table are `None`.
pub fn pivot(
    table: &DataTable,
    row_key: &str,
    col_key: &str,
    measure: &str,
    aggregation: AggregationType,
) -> Result<PivotView, AggregationError> {
    let groups = group_rows(table, &[row_key, col_key], measure)?;

    let mut cells: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    let mut column_set: BTreeSet<String> = BTreeSet::new();
    for (keys, acc) in &groups.entries {
        column_set.insert(keys[1].clone());
        cells
            .entry(keys[0].clone())
            .or_default()
            .insert(keys[1].clone(), acc.compute(aggregation));
    }

    let column_labels: Vec<String> = column_set.into_iter().collect();
    let mut row_labels = Vec::with_capacity(cells.len());
    let mut values = Vec::with_capacity(cells.len());
    for (row_label, by_column) in cells {
        values.push(
            column_labels
                .iter()
                .map(|c| by_column.get(c).copied())
                .collect(),
        );
        row_labels.push(row_label);
    }

    Ok(PivotView {
        row_field: row_key.to_string(),
        column_field: col_key.to_string(),
        measure: measure.to_string(),
        aggregation,
        row_labels,
        column_labels,
        values,
    })
}
