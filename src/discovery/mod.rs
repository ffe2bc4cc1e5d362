//! Build the size table from a project: configured budgets first, then tracked globs.

pub mod config;
pub mod project;
pub mod track;

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::{DisplayPaths, SizeTable};

pub use config::{FilesizeConfig, apply_budgets, parse_config, read_config};
pub use project::{ProjectPaths, locate_project};
pub use track::{match_globs, track_globs, tracked_record};

/// Everything a run needs from the project.
#[derive(Clone, Debug)]
pub struct Discovery {
    pub project: PathBuf,
    pub table: SizeTable,
    pub display: DisplayPaths,
}

/// Locate the configuration for `target` (project directory or `.json` file) and build the table.
///
/// Fails before any compression on unreadable or invalid configuration.
pub fn discover(target: &Path) -> Result<Discovery> {
    discover_project(locate_project(target)?)
}

/// Build the table for an already located project.
pub fn discover_project(paths: ProjectPaths) -> Result<Discovery> {
    let ProjectPaths { project, package } = paths;
    debug!("Reading configuration from {}", package.display());
    let config = read_config(&package)?;

    let mut table = SizeTable::new();
    let mut display = DisplayPaths::new();
    apply_budgets(&config, &project, &mut table, &mut display)?;
    track_globs(
        &project,
        &config.track,
        config.track_format.as_deref(),
        &mut table,
        &mut display,
    )?;
    debug!("Discovered {} files", table.len());

    Ok(Discovery {
        project,
        table,
        display,
    })
}
