//! CLI command handler: discover, measure, map the outcome to an exit code.

use anyhow::Result;
use log::{debug, error, warn};
use std::process::ExitCode;

use crate::Opts;
use crate::discovery::{ProjectPaths, discover_project, locate_project};
use crate::engine::arg_parser::Cli;
use crate::engine::backend::DefaultBackend;
use crate::engine::reader::FsReader;
use crate::pipeline::{RunContext, measure};
use crate::utils::config::ExitCodes;
use crate::utils::settings_toml::{SettingsToml, apply_file_to_opts, load_settings_toml};
use crate::utils::setup_logging;

/// Locate the project for the CLI target and load the settings file next to its configuration.
/// A settings error is returned, not logged: logging is not set up yet.
fn locate_with_settings(cli: &Cli) -> (Result<ProjectPaths>, Result<Option<SettingsToml>>) {
    let located = locate_project(&cli.target());
    let settings = match &located {
        Ok(paths) => load_settings_toml(&paths.project),
        Err(_) => Ok(None),
    };
    (located, settings)
}

/// Settings file first, then CLI flags on top.
fn setup_opts(cli: &Cli, settings: Option<&SettingsToml>) -> Opts {
    let mut opts = Opts::default();
    if let Some(file) = settings {
        apply_file_to_opts(file, &mut opts);
    }
    if let Some(v) = cli.silent {
        opts.silent = v;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if let Some(n) = cli.concurrency {
        opts.concurrency = Some(n);
    }
    if let Some(mode) = cli.reporter {
        opts.reporter = mode;
    }
    opts
}

/// Run the CLI: 0 when every check passed, 5 on discovery failure, 6 when any check failed.
pub fn handle_run(cli: &Cli) -> ExitCode {
    let (located, settings) = locate_with_settings(cli);
    let opts = setup_opts(cli, settings.as_ref().ok().and_then(Option::as_ref));
    setup_logging(opts.verbose);
    if let Err(e) = &settings {
        warn!("{:#}", e);
    }
    debug!("{} CONFIG:{:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);

    let discovery = match located.and_then(discover_project) {
        Ok(d) => d,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(ExitCodes::DISCOVERY_FAILURE);
        }
    };

    let ctx = RunContext {
        reader: &FsReader::default(),
        backend: &DefaultBackend,
    };
    match measure(
        discovery.table,
        &discovery.display,
        &opts,
        &ctx,
        None::<fn(&crate::SizeTable)>,
    ) {
        Ok(result) if result.success => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(ExitCodes::CHECK_FAILURE),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(ExitCodes::DISCOVERY_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportMode;
    use clap::Parser;

    #[test]
    fn test_cli_flags_override_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".filesize.toml"),
            "[settings]\nsilent = true\nconcurrency = 2\nreporter = \"live\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("package.json"), r#"{"filesize": {}}"#).unwrap();
        let project = dir.path().to_str().unwrap();
        let cli = Cli::parse_from(["filesize", "-p", project, "-j", "8", "--reporter", "plain"]);
        let (_, settings) = locate_with_settings(&cli);
        let opts = setup_opts(&cli, settings.unwrap().as_ref());
        assert!(opts.silent);
        assert_eq!(opts.concurrency, Some(8));
        assert_eq!(opts.reporter, ReportMode::Plain);
        assert!(!opts.default_sizes);
    }

    #[test]
    fn test_settings_read_next_to_config_file() {
        let project = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let settings = "[settings]\nsilent = false\n";
        std::fs::write(project.path().join(".filesize.toml"), settings).unwrap();
        let config = elsewhere.path().join("sizes.json");
        std::fs::write(&config, r#"{"filesize": {}}"#).unwrap();
        let settings = "[settings]\nsilent = true\n";
        std::fs::write(elsewhere.path().join(".filesize.toml"), settings).unwrap();

        let cli = Cli::parse_from([
            "filesize",
            "-p",
            project.path().to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ]);
        let (located, settings) = locate_with_settings(&cli);
        assert_eq!(located.unwrap().package, config);
        let opts = setup_opts(&cli, settings.unwrap().as_ref());
        assert!(opts.silent);
    }

    #[test]
    fn test_malformed_settings_returned_as_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), r#"{"filesize": {}}"#).unwrap();
        std::fs::write(dir.path().join(".filesize.toml"), "silent = [").unwrap();
        let cli = Cli::parse_from(["filesize", "-p", dir.path().to_str().unwrap()]);
        let (located, settings) = locate_with_settings(&cli);
        assert!(located.is_ok());
        assert!(settings.is_err());
        assert!(!setup_opts(&cli, None).silent);
    }
}
