//! Line-oriented bridge for assistant tool calls.
//!
//! Reads one tool-call envelope per stdin line, runs it against the
//! workspace in the data directory and prints one response line per
//! envelope, encoded as a JSON string so multi-line reports stay on one
//! line. Blank input lines are skipped. Logs go to stderr or the configured
//! log file, never stdout.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use taskflow::config::TaskflowConfig;
use taskflow::workspace::Workspace;
use taskflow::{logging, paths};

fn main() -> ExitCode {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = paths::data_dir().ok_or("cannot determine a data directory")?;
    let config = TaskflowConfig::load_from(&data_dir)?;
    let log_file = config.resolved_log_file(&data_dir);
    logging::init(&config.log_level, log_file.as_deref())?;
    logging::install_panic_hook();

    let mut workspace = Workspace::open(&config, &data_dir)?;
    workspace.activate();

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = workspace.dispatch_envelope(&line);
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }

    workspace.deactivate();
    Ok(())
}
