//! FILENAME: core/pivot-engine/src/definition.rs
//! Aggregation Definition - the vocabulary used to DESCRIBE a derived view.
//!
//! These types say what is computed (which reduction, which time bucket);
//! the engine decides how.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported reductions for pivot cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationType {
    Sum,
    /// Number of numeric measure values (blank cells are not counted).
    Count,
    Average,
    Min,
    Max,
    /// Sample standard deviation.
    StdDev,
    /// Sample variance.
    Var,
}

impl Default for AggregationType {
    fn default() -> Self {
        AggregationType::Sum
    }
}

impl AggregationType {
    /// Short name used in headers such as "Sum of Sales".
    pub fn label(&self) -> &'static str {
        match self {
            AggregationType::Sum => "Sum",
            AggregationType::Count => "Count",
            AggregationType::Average => "Average",
            AggregationType::Min => "Min",
            AggregationType::Max => "Max",
            AggregationType::StdDev => "StdDev",
            AggregationType::Var => "Var",
        }
    }
}

// ============================================================================
// TIME BUCKETS
// ============================================================================

/// Width of the time bucket used by `sum_by_period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    Day,
    Month,
    Quarter,
    Year,
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Month
    }
}

/// A concrete time bucket. The derived ordering is chronological because
/// every variant of one run shares the same granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year(i32),
}

impl Period {
    /// Buckets a date at the given granularity.
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => Period::Day(date),
            Granularity::Month => Period::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Quarter => Period::Quarter {
                year: date.year(),
                quarter: (date.month() - 1) / 3 + 1,
            },
            Granularity::Year => Period::Year(date.year()),
        }
    }

    /// Display label: `YYYY-MM-DD`, `YYYY-MM`, `YYYY-Qn` or `YYYY`.
    pub fn label(&self) -> String {
        match self {
            Period::Day(date) => date.format("%Y-%m-%d").to_string(),
            Period::Month { year, month } => format!("{:04}-{:02}", year, month),
            Period::Quarter { year, quarter } => format!("{:04}-Q{}", year, quarter),
            Period::Year(year) => format!("{:04}", year),
        }
    }
}
