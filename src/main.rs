//! CLI binary for taskflow.
//!
//! This binary is a thin wrapper that sets up config and logging, then
//! delegates to the library.

use std::process::ExitCode;

use clap::Parser;
use taskflow::cli::{run, Cli};
use taskflow::{config, logging, paths};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(data_dir) = paths::data_dir() else {
        eprintln!("Error: cannot determine a data directory; set {}", paths::HOME_ENV);
        return ExitCode::from(1);
    };

    let config = match config::TaskflowConfig::load_from(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::from(1);
        }
    };

    let log_file = config.resolved_log_file(&data_dir);
    if let Err(e) = logging::init(&config.log_level, log_file.as_deref()) {
        eprintln!("Warning: could not open log file: {e}");
    }
    logging::install_panic_hook();

    let output = run(cli.command, &config, &data_dir);

    for msg in output.stdout {
        println!("{msg}");
    }
    for msg in output.stderr {
        eprintln!("{msg}");
    }

    output.exit_code
}
