//! filesize: size budgets for build artifacts, checked with a concurrent compression pipeline

pub mod discovery;
pub mod engine;
pub mod pipeline;
pub mod report;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;
use std::path::Path;

use crate::engine::{DefaultBackend, FsReader};
use crate::pipeline::RunContext;

/// Result alias used by public filesize API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: discover the configuration at `target` (project directory or `.json`
/// config file), measure every configured and tracked file, and return the overall result.
///
/// - **`on_snapshot: None`** → results are only available in the returned [`RunResult`].
/// - **`on_snapshot: Some(f)`** → `f` sees the table after every completed compression. Keep it fast.
///
/// Unlike the CLI, the uncompressed size of every file is always measured when
/// `opts.default_sizes` is set (see [`Opts::for_api`]).
pub fn report<F>(target: &Path, opts: &Opts, on_snapshot: Option<F>) -> Result<RunResult>
where
    F: FnMut(&SizeTable),
{
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    debug!("{}", config_str);

    let discovered = discovery::discover(target)?;
    measure(discovered.table, &discovered.display, opts, on_snapshot)
}

/// Measure an already built table with the default reader and backends.
pub fn measure<F>(
    table: SizeTable,
    display: &DisplayPaths,
    opts: &Opts,
    on_snapshot: Option<F>,
) -> Result<RunResult>
where
    F: FnMut(&SizeTable),
{
    let ctx = RunContext {
        reader: &FsReader::default(),
        backend: &DefaultBackend,
    };
    pipeline::measure(table, display, opts, &ctx, on_snapshot)
}
