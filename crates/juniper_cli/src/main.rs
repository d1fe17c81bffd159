//! `juniper` command-line front end.
//!
//! # Responsibility
//! - Parse arguments and dispatch to the ledger commands.
//! - Print errors to stderr and exit non-zero on failure.

mod args;
mod commands;
mod errors;
mod output;

use args::Cli;

fn main() {
    if let Err(err) = commands::run(Cli::parse_args()) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
