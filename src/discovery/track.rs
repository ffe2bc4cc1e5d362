//! Track files matched by the `track` globs: measured and shown, never failed.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::engine::tools::{path_relative_to, path_to_display_string};
use crate::{Budget, DisplayPaths, Encoding, SizeRecord, SizeTable};

/// Record for a tracked file. The uncompressed size is always measured; compressed encodings
/// are limited to `formats` when given.
pub fn tracked_record(formats: Option<&[Encoding]>) -> SizeRecord {
    let mut record = SizeRecord::new().with(Encoding::None, Budget::Unbounded);
    for encoding in [Encoding::Brotli, Encoding::Gzip] {
        if formats.is_none_or(|f| f.contains(&encoding)) {
            record.track(encoding, Budget::Unbounded);
        }
    }
    record
}

/// Anchor a project-relative glob at the project root, so `*.js` only matches top-level files
/// and `./dist/*.js` matches like `dist/*.js`. A leading `!` stays in front.
fn anchor_glob(glob: &str) -> String {
    let (negate, mut rest) = match glob.strip_prefix('!') {
        Some(rest) => ("!", rest),
        None => ("", glob),
    };
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    let rest = rest.trim_start_matches('/');
    format!("{negate}/{rest}")
}

/// Files under `project` matching any of `globs`, sorted.
pub fn match_globs(project: &Path, globs: &[String]) -> Result<Vec<PathBuf>> {
    let mut overrides = OverrideBuilder::new(project);
    for glob in globs {
        overrides
            .add(&anchor_glob(glob))
            .with_context(|| format!("Invalid track glob '{glob}'"))?;
    }
    let overrides = overrides.build().context("Could not build track globs")?;

    let mut builder = WalkBuilder::new(project);
    builder.standard_filters(false).hidden(true).overrides(overrides);

    let mut files = Vec::new();
    for result in builder.build() {
        match result {
            Ok(entry) => {
                if entry.file_type().is_some_and(|ft| ft.is_file()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => warn!("Skipping while matching track globs: {}", e),
        }
    }
    files.sort();
    Ok(files)
}

/// Add every file matched by `globs` that has no configured budget. Returns how many were added.
pub fn track_globs(
    project: &Path,
    globs: &[String],
    formats: Option<&[Encoding]>,
    table: &mut SizeTable,
    display: &mut DisplayPaths,
) -> Result<usize> {
    if globs.is_empty() {
        return Ok(0);
    }
    let record = tracked_record(formats);
    let mut added = 0;
    for path in match_globs(project, globs)? {
        if table.contains(&path) {
            debug!("{} has a configured budget, not tracking", path.display());
            continue;
        }
        let shown = path_relative_to(&path, project)
            .map(|rel| path_to_display_string(&rel))
            .unwrap_or_else(|| path_to_display_string(&path));
        table.insert(path.clone(), record);
        display.insert(path, shown);
        added += 1;
    }
    debug!("Tracking {} files from {} globs", added, globs.len());
    Ok(added)
}
