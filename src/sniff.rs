use std::io::{self, Read};

use crate::resource::Resource;

pub const CLASS_MAGIC: u32 = 0xCAFE_BABE;
/// `PK`, shared by the local file header and the empty-archive record.
pub const ARCHIVE_PREFIX: u16 = 0x504B;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    ClassFile,
    Archive,
    Unknown,
    TooSmall,
}

pub fn classify_header(header: u32) -> Kind {
    if header == CLASS_MAGIC {
        Kind::ClassFile
    } else if (header >> 16) as u16 == ARCHIVE_PREFIX {
        Kind::Archive
    } else {
        Kind::Unknown
    }
}

/// Reads the first four bytes of `resource`; the stream is dropped right after.
pub fn classify(resource: &mut dyn Resource) -> io::Result<Kind> {
    if resource.size()? < 4 {
        return Ok(Kind::TooSmall);
    }
    let mut header = [0u8; 4];
    resource.open()?.read_exact(&mut header)?;
    Ok(classify_header(u32::from_be_bytes(header)))
}
