//! Incremental size report: one reporter core, pluggable rendering strategies, ordered output.

pub mod output;
pub mod reporter;
pub mod row;
pub mod strategy;

pub use output::{Output, OutputQueue};
pub use reporter::{Reporter, ReporterState};
pub use row::{Icons, Layout, Tally, render_row, render_summary};
pub use strategy::{Live, Plain, RenderStrategy, ReportRow, Sequential, UpdateView, select_strategy};
