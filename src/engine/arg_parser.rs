use clap::Parser;
use std::path::PathBuf;

use crate::ReportMode;

struct DefaultArgs;

impl DefaultArgs {
    pub const PROJECT: &'static str = ".";
}

/// Enforce size budgets on build artifacts.
#[derive(Clone, Debug, Parser)]
#[command(name = "filesize")]
#[command(about = "Compress configured files and check them against their size budgets.")]
pub struct Cli {
    /// Project directory containing package.json. Default: current directory.
    #[arg(long, short = 'p', value_name = "PROJECT", default_value = DefaultArgs::PROJECT)]
    pub project: PathBuf,

    /// Configuration file to read instead of the project's package.json.
    #[arg(long, short = 'c', value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Print nothing; only the exit code reports the result.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub silent: Option<bool>,

    /// Maximum number of files compressed at once. Default: all available threads.
    #[arg(long, short = 'j', value_parser = clap::value_parser!(usize))]
    pub concurrency: Option<usize>,

    /// How results are drawn.
    #[arg(long, value_enum)]
    pub reporter: Option<ReportMode>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

impl Cli {
    /// What discovery starts from: the explicit config file, else the project directory.
    pub fn target(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| self.project.clone())
    }
}
