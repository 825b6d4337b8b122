//! Archive containers.
//!
//! An `ArchiveFrame` owns the bytes of one opened archive and the sorted list
//! of members that passed the path filter. Members are handed out one at a
//! time so nested archives can be pushed as new frames by the caller.

use std::io::Cursor;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::filter::PathFilter;
use crate::resource::{Resource, ResourceBytes, ZipMember};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    pub index: usize,
    pub name: String,
    pub size: u64,
}

pub struct ArchiveFrame {
    label: String,
    archive: ZipArchive<Cursor<ResourceBytes>>,
    members: Vec<MemberEntry>,
    next: usize,
}

impl ArchiveFrame {
    pub fn open(resource: &mut dyn Resource, filter: &PathFilter) -> Result<Self> {
        let bytes = resource.load().map_err(Error::ResourceRead)?;
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(Error::ArchiveOpen)?;
        let members = list_matching(&mut archive, filter)?;
        Ok(Self {
            label: resource.label().to_string(),
            archive,
            members,
            next: 0,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn members(&self) -> &[MemberEntry] {
        &self.members
    }

    /// Next member in path order, labelled `<archive>!/<member path>`.
    pub fn next_member(&mut self) -> Option<ZipMember<'_>> {
        let entry = self.members.get(self.next)?;
        self.next += 1;
        let label = format!("{}!/{}", self.label, entry.name);
        Some(ZipMember::new(
            &mut self.archive,
            entry.index,
            entry.size,
            label,
        ))
    }
}

fn list_matching(
    archive: &mut ZipArchive<Cursor<ResourceBytes>>,
    filter: &PathFilter,
) -> Result<Vec<MemberEntry>> {
    let mut members = Vec::new();
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index).map_err(Error::ArchiveOpen)?;
        if entry.is_dir() || !filter.matches(entry.name()) {
            continue;
        }
        members.push(MemberEntry {
            index,
            name: entry.name().to_string(),
            size: entry.size(),
        });
    }
    members.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(members)
}
