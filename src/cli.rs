use clap::Parser;
use std::path::PathBuf;

use crate::config::FailurePolicy;

pub const USAGE: &str = "stringsutil <file> <includes/!excludes>...";

#[derive(Debug, Clone, Parser)]
#[command(name = "stringsutil", version)]
#[command(about = "Print the string constants of class files in a file, directory or archive")]
pub struct Cli {
    /// Class file, archive or directory to scan
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Include globs; prefix with `!` to exclude
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Stop at the first unreadable resource, or report it and keep going
    #[arg(long, value_enum, value_name = "POLICY", default_value_t = FailurePolicy::Abort)]
    pub on_error: FailurePolicy,

    /// Print a JSON run summary to stderr when done
    #[arg(long)]
    pub summary: bool,

    /// Log debug details to stderr (overrides RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}
