use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufWriter};
use std::path::Path;
use std::process::ExitCode;
use stringsutil::cli::{Cli, USAGE};
use stringsutil::config::RunConfig;
use stringsutil::output::Output;
use stringsutil::traverse::{self, Summary};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(path) = cli.path.as_deref() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };
    if !path.exists() {
        eprintln!("File {} does not exist", path.display());
        return ExitCode::FAILURE;
    }

    match run(&cli, path) {
        Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("[stringsutil] {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli, path: &Path) -> Result<Summary> {
    let config = RunConfig::from_cli(cli)?;
    tracing::debug!(
        includes = ?config.includes,
        excludes = ?config.excludes,
        policy = ?config.policy,
        "starting"
    );

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut output = Output::new(BufWriter::new(stdout.lock()), stderr.lock());
    let summary = traverse::run(&config, path, &mut output)?;

    if cli.summary {
        output
            .diagnostic(serde_json::to_string_pretty(&summary)?)
            .context("failed to write summary")?;
    }
    Ok(summary)
}
