use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Include/exclude glob matcher over relative `/`-separated paths.
///
/// `*` and `?` stay within one path segment; only `**` spans directories.
/// No includes means every path is included. A path matching an exclude is
/// rejected even when it also matches an include.
#[derive(Debug, Clone)]
pub struct PathFilter {
    includes: Option<GlobSet>,
    excludes: Option<GlobSet>,
}

impl PathFilter {
    pub fn compile<S: AsRef<str>>(includes: &[S], excludes: &[S]) -> Result<Self> {
        Ok(Self {
            includes: compile_set(includes)?,
            excludes: compile_set(excludes)?,
        })
    }

    pub fn matches_all() -> Self {
        Self {
            includes: None,
            excludes: None,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        if let Some(excludes) = &self.excludes
            && excludes.is_match(path)
        {
            return false;
        }
        match &self.includes {
            Some(includes) => includes.is_match(path),
            None => true,
        }
    }
}

fn compile_set<S: AsRef<str>>(globs: &[S]) -> Result<Option<GlobSet>> {
    if globs.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        let glob = glob.as_ref();
        let compiled = GlobBuilder::new(glob)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {glob}"))?;
        builder.add(compiled);
    }
    let set = builder.build().context("failed to compile glob patterns")?;
    Ok(Some(set))
}
