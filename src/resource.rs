//! Byte sources the traversal hands to the sniffer and processors.
//!
//! A resource reports its length and opens fresh streams from offset 0.
//! `load` yields the whole content for containers that need random access,
//! either mapped straight from disk or buffered from an archive member.

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

pub trait Resource {
    /// Name used in diagnostics.
    fn label(&self) -> &str;

    fn size(&self) -> io::Result<u64>;

    fn open(&mut self) -> io::Result<Box<dyn Read + '_>>;

    fn load(&mut self) -> io::Result<ResourceBytes>;
}

/// Full content of a resource.
pub enum ResourceBytes {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for ResourceBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            ResourceBytes::Mapped(mmap) => mmap,
            ResourceBytes::Owned(bytes) => bytes,
        }
    }
}

impl AsRef<[u8]> for ResourceBytes {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

pub struct FileResource {
    path: PathBuf,
    label: String,
}

impl FileResource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            label: path.display().to_string(),
        }
    }
}

impl Resource for FileResource {
    fn label(&self) -> &str {
        &self.label
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.path.metadata()?.len())
    }

    fn open(&mut self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(BufReader::new(File::open(&self.path)?)))
    }

    fn load(&mut self) -> io::Result<ResourceBytes> {
        let file = File::open(&self.path)?;
        // SAFETY: The file is opened read-only and the map owns its own handle
        // to the pages; it is dropped when processing of this resource ends.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(ResourceBytes::Mapped(mmap))
    }
}

pub struct BytesResource {
    label: String,
    bytes: Vec<u8>,
}

impl BytesResource {
    pub fn new(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            bytes,
        }
    }
}

impl Resource for BytesResource {
    fn label(&self) -> &str {
        &self.label
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.bytes.len() as u64)
    }

    fn open(&mut self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(self.bytes.as_slice()))
    }

    fn load(&mut self) -> io::Result<ResourceBytes> {
        Ok(ResourceBytes::Owned(self.bytes.clone()))
    }
}

/// One member of an open archive. Every `open` decompresses from the start.
pub struct ZipMember<'a> {
    archive: &'a mut ZipArchive<Cursor<ResourceBytes>>,
    index: usize,
    size: u64,
    label: String,
}

impl<'a> ZipMember<'a> {
    pub(crate) fn new(
        archive: &'a mut ZipArchive<Cursor<ResourceBytes>>,
        index: usize,
        size: u64,
        label: String,
    ) -> Self {
        Self {
            archive,
            index,
            size,
            label,
        }
    }
}

impl Resource for ZipMember<'_> {
    fn label(&self) -> &str {
        &self.label
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.size)
    }

    fn open(&mut self) -> io::Result<Box<dyn Read + '_>> {
        let file = self.archive.by_index(self.index).map_err(io::Error::from)?;
        Ok(Box::new(file))
    }

    fn load(&mut self) -> io::Result<ResourceBytes> {
        let capacity = usize::try_from(self.size).unwrap_or(0);
        let mut bytes = Vec::with_capacity(capacity);
        self.open()?.read_to_end(&mut bytes)?;
        Ok(ResourceBytes::Owned(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{temp_path, zip_bytes};

    #[test]
    fn file_resource_reports_size_and_maps_content() -> anyhow::Result<()> {
        let path = temp_path("resource.bin");
        std::fs::write(&path, b"0123456789")?;

        let mut resource = FileResource::new(&path);
        assert_eq!(resource.size()?, 10);

        let mut head = [0u8; 4];
        resource.open()?.read_exact(&mut head)?;
        assert_eq!(&head, b"0123");

        let bytes = resource.load()?;
        assert_eq!(&bytes[..], b"0123456789");

        drop(bytes);
        std::fs::remove_file(path)?;
        Ok(())
    }

    #[test]
    fn zip_member_reopens_from_start() -> anyhow::Result<()> {
        let data = zip_bytes(&[("a.txt", b"payload")]);
        let mut archive = ZipArchive::new(Cursor::new(ResourceBytes::Owned(data)))?;
        let mut member = ZipMember::new(&mut archive, 0, 7, "x.zip!/a.txt".to_string());

        let mut first = String::new();
        member.open()?.read_to_string(&mut first)?;
        let loaded = member.load()?;
        assert_eq!(first, "payload");
        assert_eq!(&loaded[..], b"payload");
        assert_eq!(member.label(), "x.zip!/a.txt");
        Ok(())
    }
}
