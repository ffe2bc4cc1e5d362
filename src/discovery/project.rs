//! Locate the project directory and its configuration file.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::engine::tools::resolve_path;
use crate::utils::config::PackagePaths;

/// Absolute project directory and configuration file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectPaths {
    pub project: PathBuf,
    pub package: PathBuf,
}

/// A target ending in `.json` is the configuration itself (its directory is the project);
/// anything else is a project directory that must contain the manifest.
pub fn locate_project(target: &Path) -> Result<ProjectPaths> {
    let cwd = std::env::current_dir().context("Could not read the current directory")?;
    let absolute = resolve_path(&cwd, target);

    if absolute.extension().is_some_and(|ext| ext == "json") {
        let project = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());
        return Ok(ProjectPaths {
            project,
            package: absolute,
        });
    }

    if !absolute.is_dir() {
        bail!(
            "project specified '{}' doesn't exist, is this a valid project?",
            target.display()
        );
    }
    let package = absolute.join(PackagePaths::get().manifest_filename());
    if !package.is_file() {
        bail!("Missing '{}', is this a valid project?", package.display());
    }
    Ok(ProjectPaths {
        project: absolute,
        package,
    })
}
