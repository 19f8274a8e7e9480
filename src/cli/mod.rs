//! CLI argument parsing for n8n-launch.
//!
//! Uses clap derive macros for declarative argument definitions. Running with
//! no arguments launches `n8n start` with the default environment.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Launch the n8n workflow server with defaulted environment variables.
///
/// The child inherits stdin/stdout/stderr. Its exit code becomes ours;
/// a failure to start it exits with status 1.
#[derive(Parser, Debug)]
#[command(name = "n8n-launch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML file overriding the child command and environment defaults.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase diagnostic output (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Command to run instead of the configured one.
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
