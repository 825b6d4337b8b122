//! Constant pool reader.
//!
//! Every tag of the class file format is decoded to its exact payload width
//! so the stream stays aligned, but only `Utf8`, `String` and `Class`
//! entries keep their contents. Long and Double entries take two slots;
//! the second one is left as an unusable placeholder.

use std::fmt;
use std::io::Read;

use crate::error::{Error, Malformed, Result};
use crate::mutf8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Utf8 = 1,
    Integer = 3,
    Float = 4,
    Long = 5,
    Double = 6,
    Class = 7,
    String = 8,
    FieldRef = 9,
    MethodRef = 10,
    InterfaceMethodRef = 11,
    NameAndType = 12,
    MethodHandle = 15,
    MethodType = 16,
    Dynamic = 17,
    InvokeDynamic = 18,
    Module = 19,
    Package = 20,
}

impl Tag {
    pub fn from_byte(byte: u8) -> Option<Self> {
        let tag = match byte {
            1 => Tag::Utf8,
            3 => Tag::Integer,
            4 => Tag::Float,
            5 => Tag::Long,
            6 => Tag::Double,
            7 => Tag::Class,
            8 => Tag::String,
            9 => Tag::FieldRef,
            10 => Tag::MethodRef,
            11 => Tag::InterfaceMethodRef,
            12 => Tag::NameAndType,
            15 => Tag::MethodHandle,
            16 => Tag::MethodType,
            17 => Tag::Dynamic,
            18 => Tag::InvokeDynamic,
            19 => Tag::Module,
            20 => Tag::Package,
            _ => return None,
        };
        Some(tag)
    }

    /// Payload width in bytes after the tag byte. `None` for `Utf8`, whose
    /// payload is length-prefixed.
    pub fn payload_width(self) -> Option<usize> {
        match self {
            Tag::Utf8 => None,
            Tag::Class | Tag::String | Tag::MethodType | Tag::Module | Tag::Package => Some(2),
            Tag::MethodHandle => Some(3),
            Tag::Integer
            | Tag::Float
            | Tag::FieldRef
            | Tag::MethodRef
            | Tag::InterfaceMethodRef
            | Tag::NameAndType
            | Tag::Dynamic
            | Tag::InvokeDynamic => Some(4),
            Tag::Long | Tag::Double => Some(8),
        }
    }

    /// Long and Double occupy two pool slots.
    pub fn is_wide(self) -> bool {
        matches!(self, Tag::Long | Tag::Double)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Utf8 => "Utf8",
            Tag::Integer => "Integer",
            Tag::Float => "Float",
            Tag::Long => "Long",
            Tag::Double => "Double",
            Tag::Class => "Class",
            Tag::String => "String",
            Tag::FieldRef => "Fieldref",
            Tag::MethodRef => "Methodref",
            Tag::InterfaceMethodRef => "InterfaceMethodref",
            Tag::NameAndType => "NameAndType",
            Tag::MethodHandle => "MethodHandle",
            Tag::MethodType => "MethodType",
            Tag::Dynamic => "Dynamic",
            Tag::InvokeDynamic => "InvokeDynamic",
            Tag::Module => "Module",
            Tag::Package => "Package",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Utf8(String),
    String { utf8_index: u16 },
    Class { name_index: u16 },
    Other(Tag),
    Unusable,
}

impl Entry {
    fn tag(&self) -> Option<Tag> {
        match self {
            Entry::Utf8(_) => Some(Tag::Utf8),
            Entry::String { .. } => Some(Tag::String),
            Entry::Class { .. } => Some(Tag::Class),
            Entry::Other(tag) => Some(*tag),
            Entry::Unusable => None,
        }
    }
}

/// Position of the next entry to read, out of the declared pool count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolCursor {
    index: u16,
    count: u16,
}

impl PoolCursor {
    pub fn new(count: u16) -> Self {
        Self { index: 1, count }
    }

    pub fn index(self) -> u16 {
        self.index
    }

    pub fn has_next(self) -> bool {
        self.index < self.count
    }

    /// Moves past an entry with `tag`, skipping the dead slot after a wide entry.
    pub fn advance(self, tag: Tag) -> Self {
        let step = if tag.is_wide() { 2 } else { 1 };
        Self {
            index: self.index.saturating_add(step),
            count: self.count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstantPool {
    entries: Vec<Entry>,
}

impl ConstantPool {
    /// Reads `constant_pool_count` and the entries that follow it. The stream
    /// must already be past the magic and version fields.
    pub fn read<R: Read>(reader: &mut ClassReader<R>) -> Result<Self> {
        let count = reader.read_u2()?;
        let mut entries = vec![Entry::Unusable; usize::from(count)];

        let mut cursor = PoolCursor::new(count);
        while cursor.has_next() {
            let index = cursor.index();
            let byte = reader.read_u1()?;
            let tag = Tag::from_byte(byte).ok_or(Malformed::UnknownTag { tag: byte, index })?;
            entries[usize::from(index)] = read_entry(reader, tag, index)?;
            cursor = cursor.advance(tag);
        }

        Ok(Self { entries })
    }

    /// Declared `constant_pool_count`; valid indices are `1..len()`.
    pub fn len(&self) -> u16 {
        // entries was sized from a u16 count
        self.entries.len() as u16
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Tag of the entry at `index`, `None` for index 0, a wide entry's second
    /// slot, or anything out of range.
    pub fn tag_of(&self, index: u16) -> Option<Tag> {
        self.entries.get(usize::from(index)).and_then(Entry::tag)
    }

    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Entry::Utf8(text) => Ok(text),
            other => Err(wrong_kind(index, Tag::Utf8, other)),
        }
    }

    /// Text referenced by the `String` entry at `index`.
    pub fn string_value(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Entry::String { utf8_index } => self.utf8(*utf8_index),
            other => Err(wrong_kind(index, Tag::String, other)),
        }
    }

    /// Binary name of the `Class` entry at `index`.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Entry::Class { name_index } => self.utf8(*name_index),
            other => Err(wrong_kind(index, Tag::Class, other)),
        }
    }

    /// Resolved text of every `String` constant, in ascending index order.
    pub fn strings(&self) -> impl Iterator<Item = Result<&str>> + '_ {
        (1..self.len())
            .filter(move |&index| self.tag_of(index) == Some(Tag::String))
            .map(move |index| self.string_value(index))
    }

    fn get(&self, index: u16) -> Result<&Entry> {
        match self.entries.get(usize::from(index)) {
            None | Some(Entry::Unusable) => Err(Error::DanglingReference { index }),
            Some(entry) => Ok(entry),
        }
    }
}

fn wrong_kind(index: u16, expected: Tag, found: &Entry) -> Error {
    match found.tag() {
        Some(found) => Error::WrongEntryKind {
            index,
            expected,
            found,
        },
        None => Error::DanglingReference { index },
    }
}

fn read_entry<R: Read>(reader: &mut ClassReader<R>, tag: Tag, index: u16) -> Result<Entry> {
    let entry = match tag {
        Tag::Utf8 => {
            let length = reader.read_u2()?;
            let bytes = reader.read_bytes(usize::from(length))?;
            let text = mutf8::decode(&bytes).ok_or(Malformed::BadUtf8 { index })?;
            Entry::Utf8(text)
        }
        Tag::String => Entry::String {
            utf8_index: reader.read_u2()?,
        },
        Tag::Class => Entry::Class {
            name_index: reader.read_u2()?,
        },
        other => {
            // every non-Utf8 tag has a fixed width
            let width = other.payload_width().unwrap_or_default();
            reader.skip(width)?;
            Entry::Other(other)
        }
    };
    Ok(entry)
}

/// Big-endian reader over a class file stream.
pub struct ClassReader<R> {
    inner: R,
}

impl<R: Read> ClassReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn read_u1(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u2(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub fn read_u4(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Skips a fixed-width payload of at most eight bytes.
    pub fn skip(&mut self, width: usize) -> Result<()> {
        let mut buf = [0u8; 8];
        self.inner.read_exact(&mut buf[..width])?;
        Ok(())
    }
}
