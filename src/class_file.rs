//! Class file processing.
//!
//! Only the header and the constant pool are read, followed by
//! `access_flags` and `this_class`. Interfaces, fields, methods and
//! attributes are never touched.

use anyhow::Context;
use std::io::{Read, Write};

use crate::constant_pool::{ClassReader, ConstantPool};
use crate::error::{Error, Result};
use crate::output::Output;
use crate::resource::Resource;
use crate::sniff::CLASS_MAGIC;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassStrings {
    pub class_name: String,
    pub strings: Vec<String>,
}

pub fn extract<R: Read>(input: R) -> Result<ClassStrings> {
    let mut reader = ClassReader::new(input);
    let magic = reader.read_u4()?;
    if magic != CLASS_MAGIC {
        return Err(Error::NotAClassFile { magic });
    }
    let _minor_version = reader.read_u2()?;
    let _major_version = reader.read_u2()?;
    let pool = ConstantPool::read(&mut reader)?;

    let _access_flags = reader.read_u2()?;
    let this_class = reader.read_u2()?;
    let class_name = pool.class_name(this_class)?.to_string();

    let strings = pool
        .strings()
        .map(|s| s.map(str::to_string))
        .collect::<Result<Vec<_>>>()?;

    Ok(ClassStrings {
        class_name,
        strings,
    })
}

/// Extracts `resource` and writes its class line and strings. Nothing is
/// written when extraction fails. Returns the number of strings written.
pub fn process<O: Write, E: Write>(
    resource: &mut dyn Resource,
    output: &mut Output<O, E>,
) -> anyhow::Result<usize> {
    let extracted = {
        let input = resource.open().map_err(Error::ResourceRead)?;
        extract(input)?
    };

    output
        .class_entered(&extracted.class_name)
        .context("failed to write diagnostic")?;
    for s in &extracted.strings {
        output.string(s).context("failed to write output")?;
    }
    Ok(extracted.strings.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Malformed;
    use crate::resource::BytesResource;
    use crate::testutil::{PoolBuilder, class_with_strings};

    #[test]
    fn extracts_class_name_and_strings() -> Result<()> {
        let bytes = class_with_strings("org/example/Greeter", &["hello", "", "two words"]);
        let extracted = extract(bytes.as_slice())?;
        assert_eq!(extracted.class_name, "org/example/Greeter");
        assert_eq!(extracted.strings, vec!["hello", "", "two words"]);
        Ok(())
    }

    #[test]
    fn utf8_entries_without_string_constants_are_not_reported() -> Result<()> {
        let mut b = PoolBuilder::new();
        let name = b.utf8("Foo");
        let class = b.class(name);
        b.utf8("descriptor only");
        let extracted = extract(b.class_bytes(class).as_slice())?;
        assert_eq!(extracted.class_name, "Foo");
        assert!(extracted.strings.is_empty());
        Ok(())
    }

    #[test]
    fn ignores_everything_after_this_class() -> Result<()> {
        let mut bytes = class_with_strings("Foo", &["x"]);
        bytes.truncate(bytes.len() - 10);
        bytes.extend_from_slice(&[0xFF; 3]);
        assert_eq!(extract(bytes.as_slice())?.strings, vec!["x"]);
        Ok(())
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut bytes = class_with_strings("Foo", &[]);
        bytes[3] = 0xBF;
        assert!(matches!(
            extract(bytes.as_slice()),
            Err(Error::NotAClassFile { magic: 0xCAFE_BABF })
        ));
    }

    #[test]
    fn this_class_must_be_a_class_entry() {
        let mut b = PoolBuilder::new();
        let name = b.utf8("Foo");
        let bytes = b.class_bytes(name);
        assert!(matches!(
            extract(bytes.as_slice()),
            Err(Error::WrongEntryKind { .. })
        ));
    }

    #[test]
    fn truncated_header_is_malformed() {
        let bytes = class_with_strings("Foo", &[]);
        assert!(matches!(
            extract(&bytes[..6]),
            Err(Error::MalformedPool(Malformed::Truncated))
        ));
    }

    #[test]
    fn failed_class_writes_nothing() {
        let mut b = PoolBuilder::new();
        let name = b.utf8("Foo");
        let class = b.class(name);
        let ok = b.utf8("fine");
        b.string(ok);
        b.string(class);
        let mut resource = BytesResource::new("Foo.class", b.class_bytes(class));

        let mut output = Output::new(Vec::new(), Vec::new());
        assert!(process(&mut resource, &mut output).is_err());
        let (out, err) = output.into_inner();
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn process_writes_class_line_then_strings() -> anyhow::Result<()> {
        let mut resource =
            BytesResource::new("Foo.class", class_with_strings("pkg/Foo", &["a", "b"]));
        let mut output = Output::new(Vec::new(), Vec::new());
        assert_eq!(process(&mut resource, &mut output)?, 2);
        let (out, err) = output.into_inner();
        assert_eq!(out, b"a\nb\n");
        assert_eq!(err, b">> CLASS: pkg/Foo\n");
        Ok(())
    }
}
