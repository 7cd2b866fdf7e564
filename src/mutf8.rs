//! Modified UTF-8 strings as the emitter expects them: U+0000 is encoded as
//! two bytes and supplementary code points stay split into their surrogate
//! halves, each encoded as a three-byte unit.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{BuildError, Result};

/// A byte-exact MUTF-8 string. Not necessarily valid UTF-8, so it carries
/// its own byte buffer instead of a `String`.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MUtf8String(Vec<u8>);

impl MUtf8String {
    /// Re-encodes a UTF-8 string without the unicode-escape rewrite.
    pub fn encode(data: &str) -> Self {
        let mut bytes = Vec::with_capacity(data.len());
        for unit in data.encode_utf16() {
            push_unit(&mut bytes, unit);
        }
        MUtf8String(bytes)
    }

    pub fn from_units(units: impl IntoIterator<Item = u16>) -> Self {
        let mut bytes = Vec::new();
        for unit in units {
            push_unit(&mut bytes, unit);
        }
        MUtf8String(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes back to a `String`, mapping ill-formed sequences to U+FFFD.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.to_units())
    }

    fn to_units(&self) -> Vec<u16> {
        let bytes = &self.0;
        let mut units = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b < 0x80 {
                units.push(u16::from(b));
                i += 1;
            } else if b & 0xe0 == 0xc0 && i + 1 < bytes.len() {
                units.push((u16::from(b & 0x1f) << 6) | u16::from(bytes[i + 1] & 0x3f));
                i += 2;
            } else if b & 0xf0 == 0xe0 && i + 2 < bytes.len() {
                units.push(
                    (u16::from(b & 0x0f) << 12)
                        | (u16::from(bytes[i + 1] & 0x3f) << 6)
                        | u16::from(bytes[i + 2] & 0x3f),
                );
                i += 3;
            } else {
                units.push(0xfffd);
                i += 1;
            }
        }
        units
    }
}

impl From<&str> for MUtf8String {
    fn from(data: &str) -> Self {
        MUtf8String::encode(data)
    }
}

impl fmt::Display for MUtf8String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for MUtf8String {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl Serialize for MUtf8String {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

fn push_unit(bytes: &mut Vec<u8>, unit: u16) {
    match unit {
        // U+0000 uses the two-byte form so the encoded string stays NUL-free.
        0 => bytes.extend_from_slice(&[0xc0, 0x80]),
        0x0001..=0x007f => bytes.push(unit as u8),
        0x0080..=0x07ff => {
            bytes.push(0xc0 | (unit >> 6) as u8);
            bytes.push(0x80 | (unit & 0x3f) as u8);
        }
        _ => {
            bytes.push(0xe0 | (unit >> 12) as u8);
            bytes.push(0x80 | ((unit >> 6) & 0x3f) as u8);
            bytes.push(0x80 | (unit & 0x3f) as u8);
        }
    }
}

/// Normalizes a wire string into the IR representation. A `\uXXXX` sequence
/// with no preceding backslash decodes to one UTF-16 code unit; `\\u` loses
/// one backslash and passes the `\u` through undecoded.
pub fn normalize(data: &str) -> Result<MUtf8String> {
    if !data.contains("\\u") {
        return Ok(MUtf8String::encode(data));
    }

    let mut out = Vec::new();
    let mut start = 0;
    while let Some(offset) = data[start..].find("\\u") {
        let index = start + offset;
        if index != 0 && data.as_bytes()[index - 1] == b'\\' {
            append_encoded(&mut out, &data[start..index - 1]);
            append_encoded(&mut out, "\\u");
            start = index + 2;
        } else {
            append_encoded(&mut out, &data[start..index]);
            let unit = decode_escape(data, index)?;
            push_unit(&mut out, unit);
            start = index + 6;
        }
    }
    if start != data.len() {
        append_encoded(&mut out, &data[start..]);
    }
    Ok(MUtf8String(out))
}

fn append_encoded(out: &mut Vec<u8>, data: &str) {
    for unit in data.encode_utf16() {
        push_unit(out, unit);
    }
}

fn decode_escape(data: &str, index: usize) -> Result<u16> {
    let rest = &data.as_bytes()[index + 2..];
    if rest.len() < 4 || !rest[..4].iter().all(u8::is_ascii_hexdigit) {
        return Err(BuildError::UnicodeEscape(data.to_string()));
    }
    u16::from_str_radix(&data[index + 2..index + 6], 16)
        .map_err(|_| BuildError::UnicodeEscape(data.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_is_identity() {
        assert_eq!(normalize("foo").unwrap().as_bytes(), b"foo");
    }

    #[test]
    fn plain_strings_match_reencoding() {
        for s in ["", "bar", "héllo", "日本語"] {
            assert_eq!(normalize(s).unwrap(), MUtf8String::encode(s));
        }
    }

    #[test]
    fn nul_uses_two_bytes() {
        assert_eq!(MUtf8String::encode("\0").as_bytes(), &[0xc0, 0x80]);
    }

    #[test]
    fn supplementary_code_point_keeps_surrogate_halves() {
        // U+1F600 is D83D DE00 in UTF-16; each half encodes as three bytes.
        let encoded = MUtf8String::encode("\u{1F600}");
        assert_eq!(encoded.as_bytes().len(), 6);
        assert_eq!(encoded.to_string_lossy(), "\u{1F600}");
    }

    #[test]
    fn unicode_escape_is_decoded() {
        assert_eq!(normalize("a\\u0041b").unwrap().as_bytes(), b"aAb");
    }

    #[test]
    fn double_backslash_escape_passes_through() {
        assert_eq!(normalize("\\\\u0041").unwrap().as_bytes(), b"\\u0041");
    }

    #[test]
    fn truncated_escape_is_rejected() {
        assert!(normalize("x\\u00").is_err());
        assert!(normalize("x\\u00zz").is_err());
    }

    #[test]
    fn lone_surrogate_escape_encodes() {
        let s = normalize("\\ud83d").unwrap();
        assert_eq!(s.as_bytes(), &[0xed, 0xa0, 0xbd]);
    }
}
