use anyhow::Result;
use clap::ValueEnum;

use crate::cli::Cli;
use crate::filter::PathFilter;

/// What to do when one resource cannot be processed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Stop the whole run at the first failure.
    #[default]
    Abort,
    /// Report the failure, skip that resource and keep going.
    Skip,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub filter: PathFilter,
    pub policy: FailurePolicy,
}

impl RunConfig {
    pub fn new(patterns: &[String], policy: FailurePolicy) -> Result<Self> {
        let (includes, excludes) = split_patterns(patterns);
        let filter = PathFilter::compile(&includes, &excludes)?;
        Ok(Self {
            includes,
            excludes,
            filter,
            policy,
        })
    }

    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Self::new(&cli.patterns, cli.on_error)
    }
}

/// Splits `!`-prefixed exclude globs from include globs.
pub fn split_patterns(patterns: &[String]) -> (Vec<String>, Vec<String>) {
    let mut includes = Vec::new();
    let mut excludes = Vec::new();
    for pattern in patterns {
        match pattern.strip_prefix('!') {
            Some(exclude) => excludes.push(exclude.to_string()),
            None => includes.push(pattern.clone()),
        }
    }
    (includes, excludes)
}
