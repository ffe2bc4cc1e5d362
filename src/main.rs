//! filesize CLI: compress configured files and check them against their size budgets.

use clap::Parser;
use filesize::engine::arg_parser::Cli;
use filesize::engine::handle_run;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let code = handle_run(&cli);
    log::debug!("Total time: {:?}", start_time.elapsed());
    code
}
