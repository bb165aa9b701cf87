//! Conversion between UTF-8 byte offsets and UTF-16 code-unit offsets.
//!
//! Recognizers work on `&str` byte positions while every range handed to a
//! caller is expressed in UTF-16 code units, the unit the host editor uses.

use super::types::TextRange;

/// Saturating `usize` to `u32` conversion for offsets.
pub(crate) fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Number of UTF-16 code units needed to encode `text`.
pub fn utf16_len(text: &str) -> u32 {
    if text.is_ascii() {
        return to_u32(text.len());
    }
    to_u32(text.chars().map(char::len_utf16).sum())
}

/// Byte-to-UTF-16 lookup table for one text.
///
/// ASCII text maps one-to-one and stores nothing.
#[derive(Debug, Clone)]
pub struct Utf16Index {
    /// UTF-16 offset of every byte position, `len + 1` entries. Continuation
    /// bytes share the offset of their character's first byte.
    units: Option<Vec<u32>>,
    byte_len: usize,
    utf16_len: u32,
}

impl Utf16Index {
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self {
                units: None,
                byte_len: text.len(),
                utf16_len: to_u32(text.len()),
            };
        }
        let mut units = Vec::with_capacity(text.len() + 1);
        let mut offset = 0u32;
        for ch in text.chars() {
            for _ in 0..ch.len_utf8() {
                units.push(offset);
            }
            offset += to_u32(ch.len_utf16());
        }
        units.push(offset);
        Self {
            units: Some(units),
            byte_len: text.len(),
            utf16_len: offset,
        }
    }

    /// Total length in UTF-16 code units.
    pub const fn utf16_len(&self) -> u32 {
        self.utf16_len
    }

    /// UTF-16 offset of a byte offset. Offsets past the end clamp to the end.
    pub fn to_utf16(&self, byte: usize) -> u32 {
        let byte = byte.min(self.byte_len);
        self.units
            .as_ref()
            .map_or_else(|| to_u32(byte), |units| units[byte])
    }

    /// UTF-16 range of a byte range.
    pub fn range(&self, bytes: std::ops::Range<usize>) -> TextRange {
        TextRange::new(self.to_utf16(bytes.start), self.to_utf16(bytes.end))
    }

    /// Byte offset of a UTF-16 offset.
    ///
    /// Returns `None` past the end of the text or in the middle of a
    /// surrogate pair.
    pub fn to_byte(&self, offset: u32) -> Option<usize> {
        if offset > self.utf16_len {
            return None;
        }
        let Some(units) = &self.units else {
            return Some(offset as usize);
        };
        let byte = units.partition_point(|&u| u < offset);
        (units.get(byte) == Some(&offset)).then_some(byte)
    }
}

/// One line of a text together with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// Zero-based line number.
    pub index: u32,
    /// Line content without the line terminator.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub byte_start: usize,
    /// UTF-16 range of `text`, terminator excluded.
    pub range: TextRange,
}

/// Iterate over the lines of `text` with their UTF-16 ranges.
///
/// Lines end at `\n`; a trailing `\r` is excluded from the line. Empty text
/// yields no lines, and a trailing newline does not produce an extra empty
/// line.
pub fn source_lines(text: &str) -> SourceLines<'_> {
    SourceLines {
        rest: text,
        byte_start: 0,
        utf16_start: 0,
        index: 0,
    }
}

#[derive(Debug, Clone)]
pub struct SourceLines<'a> {
    rest: &'a str,
    byte_start: usize,
    utf16_start: u32,
    index: u32,
}

impl<'a> Iterator for SourceLines<'a> {
    type Item = SourceLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let (raw, consumed) = match self.rest.find('\n') {
            Some(pos) => (&self.rest[..pos], pos + 1),
            None => (self.rest, self.rest.len()),
        };
        let line_text = raw.strip_suffix('\r').unwrap_or(raw);
        let line_units = utf16_len(line_text);
        let line = SourceLine {
            index: self.index,
            text: line_text,
            byte_start: self.byte_start,
            range: TextRange::new(self.utf16_start, self.utf16_start + line_units),
        };

        self.utf16_start += utf16_len(&self.rest[..consumed]);
        self.byte_start += consumed;
        self.rest = &self.rest[consumed..];
        self.index += 1;
        Some(line)
    }
}
