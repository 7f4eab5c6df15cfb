//! CLI binary for `todo_keeper`.
//!
//! This binary is a thin wrapper that parses arguments and delegates to the library.

use std::process::ExitCode;

use clap::Parser;
use todo_keeper::cli::{self, Cli, StdinPrompter};

fn main() -> ExitCode {
    let args = Cli::parse();
    todo_keeper::logging::init();
    tracing::debug!(dir = %args.dir.display(), command = ?args.command, "running command");

    let output = cli::run(args.command, &args.dir, &StdinPrompter);

    for msg in output.stdout {
        println!("{msg}");
    }
    for msg in output.stderr {
        eprintln!("{msg}");
    }

    output.exit_code
}
