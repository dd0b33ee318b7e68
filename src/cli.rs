//! CLI argument parsing and logging setup

use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::commands;

/// Atlantis YAML Generator - Generate atlantis.yaml from the Terraform projects of a repository
#[derive(Parser, Debug)]
#[command(name = "atlantis-yaml-generator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    generate: commands::generate::GenerateArgs,

    /// Colorize the summary (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, value_name = "LEVEL", env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level)?;
        commands::generate::execute(self.generate, &self.color)
    }
}

/// Install `env_logger` on stderr so stdout stays a clean YAML document.
fn init_logging(level: &str) -> Result<()> {
    let mut builder = Builder::new();
    builder.target(Target::Stderr);

    if std::env::var_os("RUST_LOG").is_some() {
        builder.parse_default_env();
    } else {
        builder.filter_level(parse_level(level)?);
    }

    // A logger installed by an embedding test harness is left alone.
    let _ = builder.try_init();
    Ok(())
}

fn parse_level(level: &str) -> Result<LevelFilter> {
    level.parse().map_err(|_| {
        anyhow::anyhow!(
            "Invalid log level: {level}\n\n\
             hint: Use one of error, warn, info, debug, trace, off"
        )
    })
}
