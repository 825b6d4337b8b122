//! Top-level traversal.
//!
//! Files are visited in walk order. Archives become frames on an explicit
//! stack, so a jar nested inside a jar costs one heap frame instead of one
//! call level. A frame is dropped, releasing its bytes, as soon as its last
//! member has been visited.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::archive::ArchiveFrame;
use crate::class_file;
use crate::config::{FailurePolicy, RunConfig};
use crate::error::Error;
use crate::output::Output;
use crate::resource::{FileResource, Resource};
use crate::scan::scan_files;
use crate::sniff::{self, Kind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub root: String,
    pub files: usize,
    pub classes: usize,
    pub archives: usize,
    pub strings: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Runs over `root`, a single file or a directory, writing to `output`.
pub fn run<O: Write, E: Write>(
    config: &RunConfig,
    root: &Path,
    output: &mut Output<O, E>,
) -> Result<Summary> {
    let mut traversal = Traversal {
        config,
        output,
        summary: Summary {
            root: root.display().to_string(),
            ..Summary::default()
        },
    };

    if root.is_dir() {
        let files = scan_files(root, &config.filter)
            .with_context(|| format!("failed to walk {}", root.display()))?;
        for path in files {
            traversal.process_file(&path)?;
        }
    } else {
        traversal.process_file(root)?;
    }

    traversal.output.flush().context("failed to flush output")?;
    Ok(traversal.summary)
}

struct Traversal<'a, O, E> {
    config: &'a RunConfig,
    output: &'a mut Output<O, E>,
    summary: Summary,
}

impl<O: Write, E: Write> Traversal<'_, O, E> {
    fn process_file(&mut self, path: &Path) -> Result<()> {
        self.summary.files += 1;
        let mut resource = FileResource::new(path);
        let mut stack: Vec<ArchiveFrame> = Vec::new();
        if let Some(frame) = self.visit(&mut resource)? {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let visited = match frame.next_member() {
                Some(mut member) => Some(self.visit(&mut member)?),
                None => None,
            };
            match visited {
                Some(Some(nested)) => stack.push(nested),
                Some(None) => {}
                None => {
                    if let Some(done) = stack.pop() {
                        tracing::debug!(archive = done.label(), "archive done");
                    }
                }
            }
        }
        Ok(())
    }

    /// Dispatches one resource and applies the failure policy to its outcome.
    fn visit(&mut self, resource: &mut dyn Resource) -> Result<Option<ArchiveFrame>> {
        let err = match self.dispatch(resource) {
            Ok(frame) => return Ok(frame),
            Err(err) => err,
        };

        match self.config.policy {
            FailurePolicy::Abort => {
                Err(err.context(format!("failed to process {}", resource.label())))
            }
            FailurePolicy::Skip => {
                self.summary.failed += 1;
                tracing::debug!(resource = resource.label(), error = %err, "skipping failed resource");
                self.output
                    .failure(resource.label(), format_args!("{err:#}"))
                    .context("failed to write diagnostic")?;
                Ok(None)
            }
        }
    }

    fn dispatch(&mut self, resource: &mut dyn Resource) -> Result<Option<ArchiveFrame>> {
        let kind = sniff::classify(resource).map_err(Error::ResourceRead)?;
        match kind {
            Kind::ClassFile => {
                let written = class_file::process(resource, &mut *self.output)?;
                self.summary.classes += 1;
                self.summary.strings += written;
                Ok(None)
            }
            Kind::Archive => {
                let frame = ArchiveFrame::open(resource, &self.config.filter)?;
                tracing::debug!(
                    archive = frame.label(),
                    members = frame.members().len(),
                    "opened archive"
                );
                self.summary.archives += 1;
                Ok(Some(frame))
            }
            Kind::Unknown | Kind::TooSmall => {
                tracing::debug!(resource = resource.label(), ?kind, "not a class file or archive");
                self.summary.skipped += 1;
                Ok(None)
            }
        }
    }
}
