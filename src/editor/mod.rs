//! Text buffers the models write their edits into.
//!
//! Every edit the document models request goes through [`TextBuffer`], which
//! addresses text in UTF-16 code units. `String` implements it directly; the
//! rope-backed [`EditorBuffer`] is the buffer a long-lived editor session uses.

mod buffer;

use std::borrow::Cow;

pub use buffer::EditorBuffer;

use crate::document::{TextRange, Utf16Index};

/// A mutable text addressed by UTF-16 code-unit ranges.
pub trait TextBuffer {
    /// Length in UTF-16 code units.
    fn len_utf16(&self) -> u32;

    /// The text covered by `range`, or `None` when the range is out of
    /// bounds or splits a surrogate pair.
    fn text_in(&self, range: TextRange) -> Option<String>;

    /// Replace `range` with `replacement`.
    ///
    /// Returns `false` and leaves the buffer untouched when the range is out
    /// of bounds or splits a surrogate pair.
    fn replace(&mut self, range: TextRange, replacement: &str) -> bool;

    /// The full contents.
    fn to_text(&self) -> Cow<'_, str>;
}

impl TextBuffer for String {
    fn len_utf16(&self) -> u32 {
        crate::document::utf16_len(self)
    }

    fn text_in(&self, range: TextRange) -> Option<String> {
        let index = Utf16Index::new(self);
        let start = index.to_byte(range.start)?;
        let end = index.to_byte(range.end)?;
        Some(self[start..end].to_string())
    }

    fn replace(&mut self, range: TextRange, replacement: &str) -> bool {
        let index = Utf16Index::new(self);
        let (Some(start), Some(end)) = (index.to_byte(range.start), index.to_byte(range.end))
        else {
            return false;
        };
        self.replace_range(start..end, replacement);
        true
    }

    fn to_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}
