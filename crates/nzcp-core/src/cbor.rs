//! # CBOR — Minimal RFC 7049 Reader and Writer
//!
//! Implements exactly the CBOR subset an NZCP pass uses: major types 0-5.
//! Tags (major type 6) and simple/float values (major type 7) are rejected
//! as [`DecodeError::UnsupportedCborType`].
//!
//! Decoding produces an owned [`CborValue`] tree. Maps keep their entries
//! in wire order; duplicate keys are not rejected, and lookups resolve to
//! the **last** occurrence (last write wins). Text strings are decoded
//! lossily — invalid UTF-8 sequences become U+FFFD rather than failing.
//!
//! The writer emits minimal-length arguments. It exists for the COSE
//! `Sig_structure` reconstruction, where the payload's byte-string length
//! header must be recomputed per input, and for building envelopes in
//! tests.

use crate::cursor::ByteCursor;
use crate::error::DecodeError;

/// Nesting depth cap for arrays and maps. NZCP payloads nest four levels
/// deep; the cap only bounds recursion on hostile input.
const MAX_DEPTH: usize = 64;

/// A decoded CBOR data item.
#[derive(Debug, Clone, PartialEq)]
pub enum CborValue {
    /// Major type 0, an unsigned integer.
    Unsigned(u64),
    /// Major type 1, a negative integer. Holds the logical value
    /// (`-1 - n` for encoded argument `n`).
    Negative(i64),
    /// Major type 2, a byte string.
    Bytes(Vec<u8>),
    /// Major type 3, a UTF-8 text string (decoded lossily).
    Text(String),
    /// Major type 4, an array.
    Array(Vec<CborValue>),
    /// Major type 5, a map in wire order.
    Map(Vec<(CborValue, CborValue)>),
}

impl CborValue {
    /// The unsigned integer value, if this is one.
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            Self::Unsigned(n) => Some(*n),
            _ => None,
        }
    }

    /// The negative integer value, if this is one.
    pub fn as_negative(&self) -> Option<i64> {
        match self {
            Self::Negative(n) => Some(*n),
            _ => None,
        }
    }

    /// The byte string, if this is one.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The text string, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The array elements, if this is an array.
    pub fn as_array(&self) -> Option<&[CborValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The map entries in wire order, if this is a map.
    pub fn as_map(&self) -> Option<&[(CborValue, CborValue)]> {
        match self {
            Self::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Look up a map value by unsigned integer key. Duplicate keys resolve
    /// to the last occurrence.
    pub fn map_get_unsigned(&self, key: u64) -> Option<&CborValue> {
        self.as_map()?
            .iter()
            .rev()
            .find(|(k, _)| k.as_unsigned() == Some(key))
            .map(|(_, v)| v)
    }

    /// Look up a map value by text key. Duplicate keys resolve to the last
    /// occurrence.
    pub fn map_get_text(&self, key: &str) -> Option<&CborValue> {
        self.as_map()?
            .iter()
            .rev()
            .find(|(k, _)| k.as_text() == Some(key))
            .map(|(_, v)| v)
    }
}

/// Decode exactly one CBOR data item, leaving the cursor positioned after
/// it.
pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<CborValue, DecodeError> {
    decode_at_depth(cursor, 0)
}

/// Decode one CBOR data item from a complete buffer. Trailing bytes after
/// the item are ignored.
pub fn decode_slice(bytes: &[u8]) -> Result<CborValue, DecodeError> {
    let mut cursor = ByteCursor::new(bytes);
    decode(&mut cursor)
}

fn decode_at_depth(cursor: &mut ByteCursor<'_>, depth: usize) -> Result<CborValue, DecodeError> {
    if depth > MAX_DEPTH {
        return Err(DecodeError::NestingTooDeep);
    }
    let initial = cursor.read_u8()?;
    let major = initial >> 5;
    let info = initial & 0x1f;
    match major {
        0 => Ok(CborValue::Unsigned(decode_argument(cursor, initial)?)),
        1 => {
            let n = decode_argument(cursor, initial)?;
            let n = i64::try_from(n)
                .map_err(|_| DecodeError::UnsupportedCborType { major, info })?;
            Ok(CborValue::Negative(-1 - n))
        }
        2 => {
            let len = decode_length(cursor, initial)?;
            Ok(CborValue::Bytes(cursor.take(len)?.to_vec()))
        }
        3 => {
            let len = decode_length(cursor, initial)?;
            let raw = cursor.take(len)?;
            Ok(CborValue::Text(String::from_utf8_lossy(raw).into_owned()))
        }
        4 => {
            let count = decode_argument(cursor, initial)?;
            let mut items = Vec::new();
            for _ in 0..count {
                items.push(decode_at_depth(cursor, depth + 1)?);
            }
            Ok(CborValue::Array(items))
        }
        5 => {
            let count = decode_argument(cursor, initial)?;
            let mut pairs = Vec::new();
            for _ in 0..count {
                let key = decode_at_depth(cursor, depth + 1)?;
                let value = decode_at_depth(cursor, depth + 1)?;
                pairs.push((key, value));
            }
            Ok(CborValue::Map(pairs))
        }
        _ => Err(DecodeError::UnsupportedCborType { major, info }),
    }
}

/// Decode the argument of an initial byte: additional-information values
/// 0-23 are the argument itself; 24/25/26/27 select a 1/2/4/8-byte
/// big-endian extension; anything else is unsupported.
fn decode_argument(cursor: &mut ByteCursor<'_>, initial: u8) -> Result<u64, DecodeError> {
    let info = initial & 0x1f;
    match info {
        0..=23 => Ok(u64::from(info)),
        24 => Ok(u64::from(cursor.read_u8()?)),
        25 => {
            let raw = cursor.take(2)?;
            Ok(u64::from(u16::from_be_bytes([raw[0], raw[1]])))
        }
        26 => {
            let raw = cursor.take(4)?;
            Ok(u64::from(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]])))
        }
        27 => {
            let raw = cursor.take(8)?;
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(raw);
            Ok(u64::from_be_bytes(bytes))
        }
        _ => Err(DecodeError::UnsupportedCborType {
            major: initial >> 5,
            info,
        }),
    }
}

/// Decode a byte/text string length. A length that does not fit in `usize`
/// cannot fit in the buffer either, so it surfaces as truncation.
fn decode_length(cursor: &mut ByteCursor<'_>, initial: u8) -> Result<usize, DecodeError> {
    let n = decode_argument(cursor, initial)?;
    usize::try_from(n).map_err(|_| DecodeError::TruncatedInput)
}

/// Encode a CBOR data item with minimal-length arguments.
pub fn encode(value: &CborValue) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(value, &mut out);
    out
}

fn encode_into(value: &CborValue, out: &mut Vec<u8>) {
    match value {
        CborValue::Unsigned(n) => encode_header(0, *n, out),
        CborValue::Negative(n) => {
            debug_assert!(*n < 0, "Negative must hold a value below zero");
            encode_header(1, (-1 - n) as u64, out);
        }
        CborValue::Bytes(bytes) => {
            encode_header(2, bytes.len() as u64, out);
            out.extend_from_slice(bytes);
        }
        CborValue::Text(text) => {
            encode_header(3, text.len() as u64, out);
            out.extend_from_slice(text.as_bytes());
        }
        CborValue::Array(items) => {
            encode_header(4, items.len() as u64, out);
            for item in items {
                encode_into(item, out);
            }
        }
        CborValue::Map(pairs) => {
            encode_header(5, pairs.len() as u64, out);
            for (key, value) in pairs {
                encode_into(key, out);
                encode_into(value, out);
            }
        }
    }
}

/// Write an initial byte plus argument using the shortest encoding.
pub fn encode_header(major: u8, argument: u64, out: &mut Vec<u8>) {
    let high = major << 5;
    if argument < 24 {
        out.push(high | argument as u8);
    } else if argument <= 0xff {
        out.push(high | 24);
        out.push(argument as u8);
    } else if argument <= 0xffff {
        out.push(high | 25);
        out.extend_from_slice(&(argument as u16).to_be_bytes());
    } else if argument <= 0xffff_ffff {
        out.push(high | 26);
        out.extend_from_slice(&(argument as u32).to_be_bytes());
    } else {
        out.push(high | 27);
        out.extend_from_slice(&argument.to_be_bytes());
    }
}
