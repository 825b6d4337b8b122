use std::io;
use thiserror::Error;

use crate::constant_pool::Tag;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not a class file (magic {magic:#010x}, expected 0xcafebabe)")]
    NotAClassFile { magic: u32 },

    #[error("malformed constant pool: {0}")]
    MalformedPool(#[from] Malformed),

    #[error("constant pool entry {index} is {found}, expected {expected}")]
    WrongEntryKind {
        index: u16,
        expected: Tag,
        found: Tag,
    },

    #[error("constant pool index {index} does not name an entry")]
    DanglingReference { index: u16 },

    #[error("cannot open archive: {0}")]
    ArchiveOpen(#[source] zip::result::ZipError),

    #[error("cannot read resource: {0}")]
    ResourceRead(#[source] io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Malformed {
    #[error("stream ended inside a declared structure")]
    Truncated,

    #[error("unknown tag {tag} at index {index}")]
    UnknownTag { tag: u8, index: u16 },

    #[error("invalid modified UTF-8 at index {index}")]
    BadUtf8 { index: u16 },
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::MalformedPool(Malformed::Truncated)
        } else {
            Error::ResourceRead(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_maps_to_truncated() {
        let err = Error::from(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(err, Error::MalformedPool(Malformed::Truncated)));

        let err = Error::from(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, Error::ResourceRead(_)));
    }
}
