//! Load `.filesize.toml` from the project directory (CLI only). Lib callers pass [`Opts`] directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

use crate::Opts;
use crate::types::ReportMode;
use crate::utils::config::PackagePaths;

#[derive(Debug, Deserialize)]
pub(crate) struct SettingsToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    silent: Option<bool>,
    verbose: Option<bool>,
    concurrency: Option<usize>,
    reporter: Option<ReportMode>,
}

/// Load the settings file from `dir`. `Ok(None)` when there is no file.
pub(crate) fn load_settings_toml(dir: &Path) -> Result<Option<SettingsToml>> {
    let path = dir.join(PackagePaths::get().settings_filename());
    let s = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read '{}'", path.display())),
    };
    parse_settings_toml(&s)
        .map(Some)
        .with_context(|| format!("Ignoring '{}'", path.display()))
}

pub(crate) fn parse_settings_toml(s: &str) -> Result<SettingsToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $section.$field {
            $opts.$field = v;
        }
    };
}

/// Apply file settings to opts (only fields present in the file). Call before applying CLI flags.
pub(crate) fn apply_file_to_opts(file: &SettingsToml, opts: &mut Opts) {
    let section = &file.settings;
    apply_file_opt!(section, opts, silent);
    apply_file_opt!(section, opts, verbose);
    apply_file_opt!(section, opts, reporter);
    if let Some(n) = section.concurrency {
        opts.concurrency = Some(n);
    }
}
