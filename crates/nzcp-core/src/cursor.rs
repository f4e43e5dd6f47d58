//! # Byte Cursor — Forward-Only Buffer Reader
//!
//! The CBOR decoder and the COSE envelope parser both consume their input
//! strictly front to back. `ByteCursor` gives them a shared, bounds-checked
//! read position over a borrowed buffer; any read past the end fails with
//! [`DecodeError::TruncatedInput`] rather than panicking.

use crate::error::DecodeError;

/// A forward-only cursor over a borrowed byte buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Read a single byte and advance.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = *self.data.get(self.pos).ok_or(DecodeError::TruncatedInput)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or(DecodeError::TruncatedInput)?;
        if end > self.data.len() {
            return Err(DecodeError::TruncatedInput);
        }
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Current read position from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True when the cursor has consumed the whole buffer.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
