//! Decoder for the modified UTF-8 encoding used by `CONSTANT_Utf8` entries.
//!
//! Differences from standard UTF-8: NUL is encoded as the two bytes `C0 80`,
//! and characters outside the BMP are stored as two three-byte encoded
//! surrogates instead of one four-byte sequence.

/// Decodes modified UTF-8. Returns `None` for byte sequences the class file
/// format does not allow. Unpaired surrogates become U+FFFD.
pub fn decode(bytes: &[u8]) -> Option<String> {
    if bytes.is_ascii() {
        return String::from_utf8(bytes.to_vec()).ok();
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b >> 4 {
            0..=7 => {
                units.push(u16::from(b));
                i += 1;
            }
            12 | 13 => {
                let b2 = continuation(bytes, i + 1)?;
                units.push((u16::from(b & 0x1F) << 6) | b2);
                i += 2;
            }
            14 => {
                let b2 = continuation(bytes, i + 1)?;
                let b3 = continuation(bytes, i + 2)?;
                units.push((u16::from(b & 0x0F) << 12) | (b2 << 6) | b3);
                i += 3;
            }
            _ => return None,
        }
    }

    Some(String::from_utf16_lossy(&units))
}

fn continuation(bytes: &[u8], at: usize) -> Option<u16> {
    let b = *bytes.get(at)?;
    (b & 0xC0 == 0x80).then_some(u16::from(b & 0x3F))
}
