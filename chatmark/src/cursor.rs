//! Code point cursor over raw message bytes.
//!
//! Messages arrive as bytes and are decoded one code point at a time while
//! scanning. Any byte sequence that is not valid UTF-8 stops the scan with a
//! [`DecodeError`] carrying the offending byte offset.

use crate::error::DecodeError;

/// Decode the code point starting at `position`, returning it with its
/// encoded width in bytes.
pub fn decode_at(text: &[u8], position: usize) -> Result<(char, usize), DecodeError> {
    let err = DecodeError { position };
    let lead = *text.get(position).ok_or(err)?;
    let width = match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Err(err),
    };
    let bytes = text.get(position..position + width).ok_or(err)?;
    // from_utf8 rejects overlong forms and surrogates for us
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.chars().next())
        .map(|ch| (ch, width))
        .ok_or(err)
}

/// Decode the code point that ends exactly at `position`, if any.
pub fn decode_before(text: &[u8], position: usize) -> Option<char> {
    if position > text.len() {
        return None;
    }
    let floor = position.saturating_sub(4);
    let mut start = position.checked_sub(1)?;
    while start > floor && is_continuation(text[start]) {
        start -= 1;
    }
    match decode_at(text, start) {
        Ok((ch, width)) if start + width == position => Some(ch),
        _ => None,
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

/// Forward-only position over a message buffer
#[derive(Debug, Clone)]
pub struct CodePointCursor<'a> {
    text: &'a [u8],
    position: usize,
}

impl<'a> CodePointCursor<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Self { text, position: 0 }
    }

    /// Byte offset of the next code point
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.text.len()
    }

    /// Decode the code point at the current position without moving
    pub fn current(&self) -> Result<(char, usize), DecodeError> {
        decode_at(self.text, self.position)
    }

    /// The code point immediately before the current position
    pub fn previous(&self) -> Option<char> {
        decode_before(self.text, self.position)
    }

    /// Bytes from the current position to the end of the message
    pub fn remaining(&self) -> &'a [u8] {
        &self.text[self.position.min(self.text.len())..]
    }

    /// Move forward by `width` bytes, clamped to the end of the message
    pub fn advance(&mut self, width: usize) {
        self.position = (self.position + width).min(self.text.len());
    }
}
