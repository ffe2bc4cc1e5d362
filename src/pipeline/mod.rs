//! Run pipeline: job enumeration, bounded compression and reporting.

pub mod orchestrator;

pub use orchestrator::{RunContext, compress_table, measure, measure_with_reporter};
