//! Builders for class files and archives used by unit tests.

use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use zip::write::{FileOptions, ZipWriter};

static COUNTER: AtomicU64 = AtomicU64::new(0);

pub(crate) fn temp_path(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "stringsutil_test_{}_{}_{}_{}",
        std::process::id(),
        nanos,
        n,
        name
    ))
}

pub(crate) struct PoolBuilder {
    bytes: Vec<u8>,
    next: u16,
}

impl PoolBuilder {
    pub(crate) fn new() -> Self {
        Self {
            bytes: Vec::new(),
            next: 1,
        }
    }

    pub(crate) fn raw(&mut self, tag: u8, payload: &[u8]) -> u16 {
        let index = self.next;
        self.bytes.push(tag);
        self.bytes.extend_from_slice(payload);
        self.next += if tag == 5 || tag == 6 { 2 } else { 1 };
        index
    }

    pub(crate) fn utf8(&mut self, text: &str) -> u16 {
        let encoded = mutf8_encode(text);
        let mut payload = (encoded.len() as u16).to_be_bytes().to_vec();
        payload.extend_from_slice(&encoded);
        self.raw(1, &payload)
    }

    pub(crate) fn integer(&mut self, value: i32) -> u16 {
        self.raw(3, &value.to_be_bytes())
    }

    pub(crate) fn long(&mut self, value: i64) -> u16 {
        self.raw(5, &value.to_be_bytes())
    }

    pub(crate) fn double(&mut self, value: f64) -> u16 {
        self.raw(6, &value.to_be_bytes())
    }

    pub(crate) fn class(&mut self, name_index: u16) -> u16 {
        self.raw(7, &name_index.to_be_bytes())
    }

    pub(crate) fn string(&mut self, utf8_index: u16) -> u16 {
        self.raw(8, &utf8_index.to_be_bytes())
    }

    /// `constant_pool_count` followed by the entries.
    pub(crate) fn pool_bytes(&self) -> Vec<u8> {
        let mut out = self.next.to_be_bytes().to_vec();
        out.extend_from_slice(&self.bytes);
        out
    }

    /// A complete class file with empty interfaces, fields, methods and attributes.
    pub(crate) fn class_bytes(&self, this_class: u16) -> Vec<u8> {
        let mut out = 0xCAFEBABEu32.to_be_bytes().to_vec();
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&52u16.to_be_bytes());
        out.extend_from_slice(&self.pool_bytes());
        out.extend_from_slice(&0x0021u16.to_be_bytes());
        out.extend_from_slice(&this_class.to_be_bytes());
        out.extend_from_slice(&[0u8; 10]);
        out
    }
}

/// Modified UTF-8: NUL as `C0 80`, supplementary characters as encoded surrogates.
pub(crate) fn mutf8_encode(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for unit in text.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}

/// Class `name` whose pool holds one String constant per entry of `strings`.
pub(crate) fn class_with_strings(name: &str, strings: &[&str]) -> Vec<u8> {
    let mut b = PoolBuilder::new();
    let name_index = b.utf8(name);
    let this_class = b.class(name_index);
    for s in strings {
        let text = b.utf8(s);
        b.string(text);
    }
    b.class_bytes(this_class)
}

pub(crate) fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap().into_inner()
}
