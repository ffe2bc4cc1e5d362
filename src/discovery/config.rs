//! The `filesize` key of the project configuration: per-file budgets plus optional track globs.

use anyhow::{Result, bail};
use serde_json::{Map, Value};
use std::path::Path;

use crate::engine::tools::{parse_size, path_to_display_string, resolve_path};
use crate::utils::config::PackagePaths;
use crate::{Budget, DisplayPaths, Encoding, SizeRecord, SizeTable};

const TRACK_KEY: &str = "track";
const TRACK_FORMAT_KEY: &str = "trackFormat";

/// Parsed `filesize` configuration. Budget entries keep file order.
#[derive(Clone, Debug, Default)]
pub struct FilesizeConfig {
    pub budgets: Vec<(String, Map<String, Value>)>,
    pub track: Vec<String>,
    /// Encodings to measure for tracked files. None means all of them.
    pub track_format: Option<Vec<Encoding>>,
}

/// Read and parse the configuration file at `package`.
pub fn read_config(package: &Path) -> Result<FilesizeConfig> {
    let Ok(content) = std::fs::read_to_string(package) else {
        bail!(
            "Could not read the configuration in '{}'",
            package.display()
        );
    };
    parse_config(&content, package)
}

/// Parse configuration text; `package` only names the file in messages.
pub fn parse_config(content: &str, package: &Path) -> Result<FilesizeConfig> {
    let key = PackagePaths::get().config_key();
    let Ok(json) = serde_json::from_str::<Value>(content) else {
        bail!("Could not parse '{}'", package.display());
    };
    let Some(section) = json.get(key) else {
        bail!(
            "There is no '{}' configuration in '{}'",
            key,
            package.display()
        );
    };
    let Some(section) = section.as_object() else {
        bail!(
            "'{}' configuration is not an object in '{}'",
            key,
            package.display()
        );
    };
    if section.keys().all(|k| k == TRACK_KEY) {
        bail!(
            "There is no data inside the '{}' configuration in '{}'",
            key,
            package.display()
        );
    }

    let budgets = section
        .iter()
        .filter(|(k, _)| *k != TRACK_KEY)
        .filter_map(|(k, v)| v.as_object().map(|obj| (k.clone(), obj.clone())))
        .collect();
    let track = section
        .get(TRACK_KEY)
        .and_then(Value::as_array)
        .map(|globs| {
            globs
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let track_format = section
        .get(TRACK_FORMAT_KEY)
        .and_then(Value::as_array)
        .map(|formats| {
            formats
                .iter()
                .filter_map(|f| match f {
                    Value::String(s) => Encoding::parse(s),
                    other => Encoding::parse(&other.to_string()),
                })
                .collect()
        });

    Ok(FilesizeConfig {
        budgets,
        track,
        track_format,
    })
}

/// Budget for one configured value: a size string like `"10 kB"` or a plain byte count.
fn budget_value(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => parse_size(s),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// Add every budget entry to `table`, resolving paths against `project`.
///
/// Entries naming the same file merge into one record.
pub fn apply_budgets(
    config: &FilesizeConfig,
    project: &Path,
    table: &mut SizeTable,
    display: &mut DisplayPaths,
) -> Result<()> {
    for (original, encodings) in &config.budgets {
        if encodings.is_empty() {
            bail!("Configuration for '{original}' is invalid. (compression values unspecified)");
        }
        let path = resolve_path(project, Path::new(original));
        if !path.is_file() {
            bail!("Configuration for '{original}' is invalid. (path is not a valid file)");
        }

        let mut record = table.get(&path).copied().unwrap_or_default();
        for (name, value) in encodings {
            let Some(encoding) = Encoding::parse(name) else {
                bail!("Configuration for '{original}' is invalid. (Invalid compression value '{name}')");
            };
            let Some(max) = budget_value(value) else {
                bail!("Configuration for '{original}' is invalid. (size unspecified)");
            };
            record.track(encoding, Budget::Bounded(max));
        }

        match table.get_mut(&path) {
            Some(existing) => *existing = record,
            None => {
                table.insert(path.clone(), record);
            }
        }
        display.insert(path, path_to_display_string(Path::new(original)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Slot;

    fn parse(content: &str) -> Result<FilesizeConfig> {
        parse_config(content, Path::new("package.json"))
    }

    #[test]
    fn test_missing_key() {
        let err = parse(r#"{"name": "x"}"#).unwrap_err().to_string();
        assert_eq!(err, "There is no 'filesize' configuration in 'package.json'");
    }

    #[test]
    fn test_unparseable() {
        let err = parse("{ nope").unwrap_err().to_string();
        assert_eq!(err, "Could not parse 'package.json'");
    }

    #[test]
    fn test_empty_section() {
        let err = parse(r#"{"filesize": {"track": ["*.js"]}}"#)
            .unwrap_err()
            .to_string();
        assert_eq!(
            err,
            "There is no data inside the 'filesize' configuration in 'package.json'"
        );
    }

    #[test]
    fn test_budgets_keep_file_order() {
        let config = parse(
            r#"{"filesize": {
                "z.js": {"brotli": "1 kB"},
                "a.js": {"gzip": "2 kB"},
                "track": ["dist/**/*.js"],
                "trackFormat": ["brotli", "NONE", "zstd"]
            }}"#,
        )
        .unwrap();
        let names: Vec<&str> = config.budgets.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["z.js", "a.js"]);
        assert_eq!(config.track, vec!["dist/**/*.js".to_string()]);
        assert_eq!(
            config.track_format,
            Some(vec![Encoding::Brotli, Encoding::None])
        );
    }

    #[test]
    fn test_apply_budgets_builds_records() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.js"), "x").unwrap();
        let config =
            parse(r#"{"filesize": {"./index.js": {"brotli": "3.5 kB", "none": 100}}}"#).unwrap();
        let mut table = SizeTable::new();
        let mut display = DisplayPaths::new();
        apply_budgets(&config, dir.path(), &mut table, &mut display).unwrap();

        let path = dir.path().join("index.js");
        let record = table.get(&path).unwrap();
        assert_eq!(
            *record.slot(Encoding::Brotli),
            Slot::Pending(Budget::Bounded(3_584))
        );
        assert_eq!(*record.slot(Encoding::Gzip), Slot::Excluded);
        assert_eq!(
            *record.slot(Encoding::None),
            Slot::Pending(Budget::Bounded(100))
        );
        assert_eq!(display.display(&path), "./index.js");
    }

    #[test]
    fn test_apply_budgets_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.js"), "x").unwrap();
        let cases = [
            (
                r#"{"filesize": {"index.js": {}}}"#,
                "Configuration for 'index.js' is invalid. (compression values unspecified)",
            ),
            (
                r#"{"filesize": {"missing.js": {"gzip": "1kb"}}}"#,
                "Configuration for 'missing.js' is invalid. (path is not a valid file)",
            ),
            (
                r#"{"filesize": {"index.js": {"zstd": "1kb"}}}"#,
                "Configuration for 'index.js' is invalid. (Invalid compression value 'zstd')",
            ),
            (
                r#"{"filesize": {"index.js": {"gzip": "lots"}}}"#,
                "Configuration for 'index.js' is invalid. (size unspecified)",
            ),
        ];
        for (content, expected) in cases {
            let config = parse(content).unwrap();
            let err = apply_budgets(
                &config,
                dir.path(),
                &mut SizeTable::new(),
                &mut DisplayPaths::new(),
            )
            .unwrap_err();
            assert_eq!(err.to_string(), expected);
        }
    }
}
