//! PhishGuard CLI binary.

use std::process;

use clap::Parser;
use phishguard::cli::{args::PhishGuardArgs, commands::execute_command};

fn main() {
    // Parse command line arguments using clap
    let args = PhishGuardArgs::parse();

    // Map verbosity onto the log filter; RUST_LOG still wins if set.
    let filter = match args.verbosity() {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .init();

    // Execute the command
    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
