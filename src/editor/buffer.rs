use std::borrow::Cow;

use ropey::Rope;

use super::TextBuffer;
use crate::document::{TextRange, to_u32};

/// A text buffer backed by a rope data structure.
///
/// Offsets are UTF-16 code units so ranges produced by the document models
/// apply directly. The caret follows edits made before it.
pub struct EditorBuffer {
    rope: Rope,
    caret: u32,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            caret: 0,
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Caret position in UTF-16 code units.
    pub const fn caret(&self) -> u32 {
        self.caret
    }

    /// Move the caret, clamped to the buffer and snapped off surrogate pairs.
    pub fn set_caret(&mut self, offset: u32) {
        let offset = offset.min(self.len_utf16());
        let char_idx = self.rope.utf16_cu_to_char(offset as usize);
        self.caret = to_u32(self.rope.char_to_utf16_cu(char_idx));
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Insert a string at the caret and move the caret past it.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let caret = self.caret;
        self.replace(TextRange::empty_at(caret), s);
    }

    /// Char index of a UTF-16 offset, `None` past the end or inside a
    /// surrogate pair.
    fn char_idx(&self, offset: u32) -> Option<usize> {
        if offset > self.len_utf16() {
            return None;
        }
        let char_idx = self.rope.utf16_cu_to_char(offset as usize);
        (self.rope.char_to_utf16_cu(char_idx) == offset as usize).then_some(char_idx)
    }
}

impl TextBuffer for EditorBuffer {
    fn len_utf16(&self) -> u32 {
        to_u32(self.rope.len_utf16_cu())
    }

    fn text_in(&self, range: TextRange) -> Option<String> {
        let start = self.char_idx(range.start)?;
        let end = self.char_idx(range.end)?;
        Some(self.rope.slice(start..end).to_string())
    }

    fn replace(&mut self, range: TextRange, replacement: &str) -> bool {
        let (Some(start), Some(end)) = (self.char_idx(range.start), self.char_idx(range.end))
        else {
            return false;
        };
        self.rope.remove(start..end);
        self.rope.insert(start, replacement);

        let inserted = crate::document::utf16_len(replacement);
        if self.caret >= range.end {
            self.caret = self.caret - range.len() + inserted;
        } else if self.caret > range.start {
            self.caret = range.start + inserted;
        }
        self.dirty = true;
        true
    }

    fn to_text(&self) -> Cow<'_, str> {
        Cow::Owned(self.rope.to_string())
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("caret", &self.caret)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert_eq!(buf.len_utf16(), 0);
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = EditorBuffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some("world".to_string()));
        assert_eq!(buf.text(), "hello\nworld");
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buf = EditorBuffer::from_text("hello");
        assert_eq!(buf.line_at(1), None);
    }

    #[test]
    fn test_len_counts_utf16_units() {
        let buf = EditorBuffer::from_text("a😀é");
        assert_eq!(buf.len_utf16(), 4);
    }

    // --- Range access ---

    #[test]
    fn test_text_in_respects_surrogates() {
        let buf = EditorBuffer::from_text("a😀b");
        assert_eq!(buf.text_in(TextRange::new(1, 3)), Some("😀".to_string()));
        assert_eq!(buf.text_in(TextRange::new(2, 4)), None);
        assert_eq!(buf.text_in(TextRange::new(0, 5)), None);
    }

    #[test]
    fn test_replace_marks_dirty() {
        let mut buf = EditorBuffer::from_text("- [ ] a");
        assert!(!buf.is_dirty());
        assert!(buf.replace(TextRange::new(3, 4), "x"));
        assert_eq!(buf.text(), "- [x] a");
        assert!(buf.is_dirty());
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_replace_out_of_bounds_is_noop() {
        let mut buf = EditorBuffer::from_text("abc");
        assert!(!buf.replace(TextRange::new(2, 7), "x"));
        assert_eq!(buf.text(), "abc");
        assert!(!buf.is_dirty());
    }

    // --- Caret tracking ---

    #[test]
    fn test_caret_shifts_after_edit_before_it() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.set_caret(8);
        buf.replace(TextRange::new(0, 5), "hi");
        assert_eq!(buf.caret(), 5);
    }

    #[test]
    fn test_caret_inside_replaced_range_moves_to_end_of_insert() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.set_caret(3);
        buf.replace(TextRange::new(0, 5), "hey");
        assert_eq!(buf.caret(), 3);
        buf.replace(TextRange::new(0, 3), "");
        assert_eq!(buf.caret(), 0);
    }

    #[test]
    fn test_caret_before_edit_stays() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.set_caret(2);
        buf.replace(TextRange::new(6, 11), "there");
        assert_eq!(buf.caret(), 2);
    }

    #[test]
    fn test_set_caret_clamps_and_snaps() {
        let mut buf = EditorBuffer::from_text("a😀");
        buf.set_caret(99);
        assert_eq!(buf.caret(), 3);
        buf.set_caret(2);
        assert_eq!(buf.caret(), 1, "inside a surrogate pair snaps to its start");
    }

    #[test]
    fn test_insert_str_advances_caret() {
        let mut buf = EditorBuffer::from_text("ac");
        buf.set_caret(1);
        buf.insert_str("b");
        assert_eq!(buf.text(), "abc");
        assert_eq!(buf.caret(), 2);
    }

    #[test]
    fn test_insert_str_empty_is_noop() {
        let mut buf = EditorBuffer::from_text("abc");
        buf.insert_str("");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_toggle_through_rope() {
        let mut buf = EditorBuffer::from_text("# 😀\n- [ ] task");
        assert!(crate::tasks::toggle_at(&mut buf, 9));
        assert_eq!(buf.line_at(1), Some("- [x] task".to_string()));
    }
}
