//! FILENAME: core/pivot-engine/src/lib.rs
//! Aggregation subsystem for the sales report.
//!
//! This crate derives every view the report shows from a loaded
//! `engine::DataTable`. It depends on `engine` only for shared types.
//!
//! Layers:
//! - `definition`: what is computed (reductions, time buckets)
//! - `accumulator`: per-group reduction state
//! - `view`: immutable results, convertible to tables
//! - `engine`: the operations themselves

pub mod accumulator;
pub mod definition;
pub mod engine;
pub mod error;
pub mod view;

pub use accumulator::AggregateAccumulator;
pub use definition::{AggregationType, Granularity, Period};
pub use engine::{pivot, sum_by_key, sum_by_period, sum_by_two_keys, top_n_by_sum};
pub use error::AggregationError;
pub use view::{AggregateView, GroupKeys, PivotView, ViewRow};
