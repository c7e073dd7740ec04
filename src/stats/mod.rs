//! Totals and per-category breakdowns of the records.

mod aggregation;
mod stats_endpoint;

pub use stats_endpoint::get_stats_endpoint;
