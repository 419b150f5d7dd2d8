//! Binary tag-tree decoding.
//!
//! The on-disk encoding is little-endian: one type byte, a u16 name length
//! and name for named tags, then the payload. Lists carry an element type
//! byte and an i32 count; compounds terminate at type 0. Files may be
//! wrapped in a gzip stream, detected by magic.

use crate::value::Tag;
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::io::Read;
use thiserror::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Maximum tag nesting depth, so a malformed file cannot overflow the stack
const MAX_DEPTH: usize = 64;

const TAG_END: u8 = 0;
const TAG_BYTE: u8 = 1;
const TAG_SHORT: u8 = 2;
const TAG_INT: u8 = 3;
const TAG_LONG: u8 = 4;
const TAG_FLOAT: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_BYTE_ARRAY: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_LIST: u8 = 9;
const TAG_COMPOUND: u8 = 10;
const TAG_INT_ARRAY: u8 = 11;
const TAG_LONG_ARRAY: u8 = 12;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated data: expected {expected} bytes, only {available} available")]
    Truncated { expected: usize, available: usize },

    #[error("invalid tag type: {0}")]
    InvalidTagType(u8),

    #[error("root tag must be a compound, found type {0}")]
    RootNotCompound(u8),

    #[error("tag name is not valid UTF-8")]
    InvalidUtf8,

    #[error("nesting depth exceeds {0}")]
    DepthLimit(usize),

    #[error("negative length: {0}")]
    NegativeLength(i32),

    #[error("gzip stream error: {0}")]
    Gzip(String),
}

type Result<T> = std::result::Result<T, DecodeError>;

/// Decode a binary tag tree, transparently unwrapping a gzip stream.
///
/// The root tag must be a compound; its name is discarded.
pub fn decode(data: &[u8]) -> Result<Tag> {
    if data.starts_with(&GZIP_MAGIC) {
        let mut plain = Vec::new();
        GzDecoder::new(data)
            .read_to_end(&mut plain)
            .map_err(|e| DecodeError::Gzip(e.to_string()))?;
        return TagReader::new(&plain).read_root();
    }
    TagReader::new(data).read_root()
}

struct TagReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> TagReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_root(&mut self) -> Result<Tag> {
        let tag_type = self.read_u8()?;
        if tag_type != TAG_COMPOUND {
            return Err(DecodeError::RootNotCompound(tag_type));
        }
        // Root name is present but unused
        self.read_string()?;
        self.read_payload(TAG_COMPOUND, 0)
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let available = self.data.len() - self.pos;
        if count > available {
            return Err(DecodeError::Truncated {
                expected: count,
                available,
            });
        }
        let slice = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_i16(&mut self) -> Result<i16> {
        let bytes = self.take(2)?;
        Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i64(&mut self) -> Result<i64> {
        let bytes = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(i64::from_le_bytes(buf))
    }

    fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_i32()? as u32))
    }

    fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_i64()? as u64))
    }

    fn read_len(&mut self) -> Result<usize> {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(DecodeError::NegativeLength(len));
        }
        Ok(len as usize)
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8)
    }

    fn read_payload(&mut self, tag_type: u8, depth: usize) -> Result<Tag> {
        if depth >= MAX_DEPTH {
            return Err(DecodeError::DepthLimit(MAX_DEPTH));
        }

        match tag_type {
            TAG_BYTE => Ok(Tag::Byte(self.read_u8()? as i8)),
            TAG_SHORT => Ok(Tag::Short(self.read_i16()?)),
            TAG_INT => Ok(Tag::Int(self.read_i32()?)),
            TAG_LONG => Ok(Tag::Long(self.read_i64()?)),
            TAG_FLOAT => Ok(Tag::Float(self.read_f32()?)),
            TAG_DOUBLE => Ok(Tag::Double(self.read_f64()?)),
            TAG_BYTE_ARRAY => {
                let len = self.read_len()?;
                let bytes = self.take(len)?;
                Ok(Tag::ByteArray(bytes.iter().map(|&b| b as i8).collect()))
            }
            TAG_STRING => Ok(Tag::String(self.read_string()?)),
            TAG_LIST => {
                let elem_type = self.read_u8()?;
                let len = self.read_len()?;
                if elem_type == TAG_END && len > 0 {
                    return Err(DecodeError::InvalidTagType(elem_type));
                }
                let mut items = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    items.push(self.read_payload(elem_type, depth + 1)?);
                }
                Ok(Tag::List(items))
            }
            TAG_COMPOUND => {
                let mut map = HashMap::new();
                loop {
                    let child_type = self.read_u8()?;
                    if child_type == TAG_END {
                        break;
                    }
                    let name = self.read_string()?;
                    let value = self.read_payload(child_type, depth + 1)?;
                    map.insert(name, value);
                }
                Ok(Tag::Compound(map))
            }
            TAG_INT_ARRAY => {
                let len = self.read_len()?;
                let mut items = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    items.push(self.read_i32()?);
                }
                Ok(Tag::IntArray(items))
            }
            TAG_LONG_ARRAY => {
                let len = self.read_len()?;
                let mut items = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    items.push(self.read_i64()?);
                }
                Ok(Tag::LongArray(items))
            }
            other => Err(DecodeError::InvalidTagType(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    /// Wrap compound entries in a nameless root compound
    fn root(entries: &[u8]) -> Vec<u8> {
        let mut data = vec![TAG_COMPOUND, 0, 0];
        data.extend_from_slice(entries);
        data.push(TAG_END);
        data
    }

    fn named(tag_type: u8, name: &str, payload: &[u8]) -> Vec<u8> {
        let mut data = vec![tag_type];
        data.extend_from_slice(&(name.len() as u16).to_le_bytes());
        data.extend_from_slice(name.as_bytes());
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn test_decode_int() {
        let data = root(&named(TAG_INT, "width", &42i32.to_le_bytes()));
        let tag = decode(&data).unwrap();
        assert_eq!(tag.child("width").unwrap().int().unwrap(), 42);
    }

    #[test]
    fn test_decode_string() {
        let mut payload = (9u16).to_le_bytes().to_vec();
        payload.extend_from_slice(b"some text");
        let data = root(&named(TAG_STRING, "label", &payload));
        let tag = decode(&data).unwrap();
        assert_eq!(tag.child("label").unwrap().string().unwrap(), "some text");
    }

    #[test]
    fn test_decode_int_list() {
        let mut payload = vec![TAG_INT];
        payload.extend_from_slice(&3i32.to_le_bytes());
        for v in [1i32, -1, 7] {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        let data = root(&named(TAG_LIST, "indices", &payload));
        let tag = decode(&data).unwrap();
        let items = tag.child("indices").unwrap().list().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].int().unwrap(), -1);
    }

    #[test]
    fn test_decode_empty_list() {
        let mut payload = vec![TAG_END];
        payload.extend_from_slice(&0i32.to_le_bytes());
        let data = root(&named(TAG_LIST, "empty", &payload));
        let tag = decode(&data).unwrap();
        assert!(tag.child("empty").unwrap().list().unwrap().is_empty());
    }

    #[test]
    fn test_decode_nested_compound() {
        let inner = named(TAG_BYTE, "flag", &[1]);
        let mut payload = inner;
        payload.push(TAG_END);
        let data = root(&named(TAG_COMPOUND, "nested", &payload));
        let tag = decode(&data).unwrap();
        let nested = tag.child("nested").unwrap();
        assert_eq!(nested.child("flag").unwrap().int().unwrap(), 1);
    }

    #[test]
    fn test_decode_numeric_tags() {
        let mut entries = named(TAG_SHORT, "s", &(-5i16).to_le_bytes());
        entries.extend(named(TAG_LONG, "l", &123456789i64.to_le_bytes()));
        entries.extend(named(TAG_FLOAT, "f", &1.5f32.to_le_bytes()));
        entries.extend(named(TAG_DOUBLE, "d", &2.25f64.to_le_bytes()));
        let data = root(&entries);
        let tag = decode(&data).unwrap();
        assert_eq!(tag.child("s").unwrap().int().unwrap(), -5);
        assert_eq!(tag.child("l").unwrap().as_f64().unwrap(), 123456789.0);
        assert_eq!(tag.child("f").unwrap().as_f64().unwrap(), 1.5);
        assert_eq!(tag.child("d").unwrap().as_f64().unwrap(), 2.25);
    }

    #[test]
    fn test_truncated_data() {
        let data = root(&named(TAG_INT, "width", &42i32.to_le_bytes()));
        let result = decode(&data[..data.len() - 3]);
        assert!(matches!(result, Err(DecodeError::Truncated { .. })));
    }

    #[test]
    fn test_invalid_tag_type() {
        let data = root(&named(13, "bogus", &[]));
        assert_eq!(decode(&data), Err(DecodeError::InvalidTagType(13)));
    }

    #[test]
    fn test_root_must_be_compound() {
        let data = named(TAG_INT, "x", &1i32.to_le_bytes());
        assert_eq!(decode(&data), Err(DecodeError::RootNotCompound(TAG_INT)));
    }

    #[test]
    fn test_depth_limit() {
        // 70 nested compounds, each named "a"
        let mut data = vec![TAG_COMPOUND, 0, 0];
        for _ in 0..70 {
            data.extend_from_slice(&named(TAG_COMPOUND, "a", &[]));
        }
        // Innermost payload never terminates, but the depth cap fires first
        assert_eq!(decode(&data), Err(DecodeError::DepthLimit(MAX_DEPTH)));
    }

    #[test]
    fn test_gzip_wrapped() {
        let plain = root(&named(TAG_INT, "width", &9i32.to_le_bytes()));
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&plain).unwrap();
        let compressed = encoder.finish().unwrap();

        let tag = decode(&compressed).unwrap();
        assert_eq!(tag.child("width").unwrap().int().unwrap(), 9);
    }
}
