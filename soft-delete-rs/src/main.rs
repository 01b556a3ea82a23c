mod cli;
mod commands;

use clap::Parser;
use soft_delete_core::{system_trash, QuarantineStore};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = cli::Args::parse();
    init_logging(args.verbose);

    let store = match args.store_config().and_then(|config| QuarantineStore::open(&config)) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("soft-delete: failed to open store: {err}");
            return ExitCode::FAILURE;
        }
    };
    let trash = system_trash();

    let output = commands::run(&store, trash.as_ref(), args.command);
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    for line in &output.stdout {
        if writeln!(stdout, "{line}").is_err() {
            return ExitCode::FAILURE;
        }
    }
    for line in &output.stderr {
        eprintln!("{line}");
    }
    ExitCode::from(output.exit_code)
}
