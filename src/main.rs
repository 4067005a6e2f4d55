//! @dose
//! purpose: This is the CLI entry point for launch. It installs logging, parses the command
//!     line with clap, runs the invocation against the freedesktop platform, and schedules
//!     removal of any standard-input temp files.
//!
//! when-editing:
//!     - !Every failure prints "launch: <message>" to stderr and exits 1
//!     - !A bare invocation prints the help text to stderr and exits 1
//!
//! invariants:
//!     - The process exits with 0 on success, 1 on any error
//!     - --help and --version exit 0
//!
//! do-not:
//!     - Never add business logic here - delegate to the library
//!     - Never panic - always use proper error handling
//!
//! gotchas:
//!     - Clap would exit 2 on usage errors; launch exits 1 like every other failure

use clap::{CommandFactory, Parser};
use launch::cli::Cli;
use launch::commands::run_invocation;
use launch::config::Config;
use launch::logging::initialise_tracing;
use launch::platform::XdgPlatform;
use launch::stdin::schedule_cleanup;
use std::io;

fn main() {
    initialise_tracing();

    if std::env::args_os().len() <= 1 {
        let _ = Cli::command().write_help(&mut io::stderr());
        std::process::exit(1);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(e) = run(&cli) {
        eprintln!("launch: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load();
    let platform = XdgPlatform::from_config(&config);
    tracing::debug!("application directories: {:?}", platform.application_dirs());

    let temp_files = {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        run_invocation(cli, &config, &platform, &mut io::stdin().lock(), &mut out)?
    };

    schedule_cleanup(temp_files, &config.stdin)?;
    Ok(())
}
