//! # Atlantis YAML Generator CLI
//!
//! This is the binary entry point for the `atlantis-yaml-generator`
//! command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments and environment variables using `clap`.
//! - Setting up logging on stderr.
//! - Translating library errors into user-friendly output and a non-zero
//!   exit code.
//!
//! The core application logic is defined in the `lib.rs` library crate, ensuring
//! that the binary is a thin wrapper around the reusable library functionality.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
