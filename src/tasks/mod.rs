//! Task-list model.
//!
//! Derives checkbox items from text line by line and toggles them through a
//! [`TextBuffer`]. Nothing is retained between calls: every query re-parses
//! the text it is given.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::document::{SourceLine, TextRange, utf16_len};
use crate::editor::TextBuffer;
use crate::highlight::fence_aware_lines;

static TASK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)[-*+] \[([ xX])\](?: (.*))?$").unwrap());

/// Columns a tab contributes to indentation.
const TAB_WIDTH: u32 = 4;

/// Byte-level view of a task line, relative to the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TaskLineMatch {
    /// Length of the leading indentation in bytes.
    pub indent: usize,
    /// Indentation width in columns.
    pub columns: u32,
    /// Byte offset of the state character inside the brackets.
    pub checkbox: usize,
    /// Byte offset where the item text starts, if any.
    pub content: Option<usize>,
    pub completed: bool,
}

impl TaskLineMatch {
    /// Byte range of the `[ ]` token, brackets included.
    pub(crate) const fn brackets(&self) -> std::ops::Range<usize> {
        self.checkbox - 1..self.checkbox + 2
    }
}

/// Match one line (without its terminator) against the task-item pattern.
pub(crate) fn match_task_line(line: &str) -> Option<TaskLineMatch> {
    let caps = TASK_LINE.captures(line)?;
    let indent = caps.get(1).map_or("", |m| m.as_str());
    let state = caps.get(2)?;
    let columns = indent
        .chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum();
    Some(TaskLineMatch {
        indent: indent.len(),
        columns,
        checkbox: state.start(),
        content: caps.get(3).map(|m| m.start()),
        completed: state.as_str() != " ",
    })
}

/// One checkbox line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskItem {
    /// Zero-based line number.
    pub line: u32,
    /// The whole line, terminator excluded.
    pub line_range: TextRange,
    /// The single state character between the brackets.
    pub checkbox_range: TextRange,
    /// The item text after the checkbox; empty at line end when absent.
    pub content_range: TextRange,
    pub completed: bool,
    pub indent_level: u32,
    pub text: String,
}

impl TaskItem {
    fn from_line(line: &SourceLine<'_>) -> Option<Self> {
        let matched = match_task_line(line.text)?;
        let start = line.range.start;
        // Everything up to the content is ASCII, so bytes equal UTF-16 units.
        let checkbox = start + matched.checkbox as u32;
        let (content_range, text) = match matched.content {
            Some(offset) => (
                TextRange::new(start + utf16_len(&line.text[..offset]), line.range.end),
                line.text[offset..].to_string(),
            ),
            None => (TextRange::empty_at(line.range.end), String::new()),
        };
        Some(Self {
            line: line.index,
            line_range: line.range,
            checkbox_range: TextRange::new(checkbox, checkbox + 1),
            content_range,
            completed: matched.completed,
            indent_level: matched.columns / 2,
            text,
        })
    }
}

/// A maximal run of consecutive task lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskList {
    /// First line of the run (zero-based).
    pub start_line: u32,
    /// Last line of the run, inclusive.
    pub end_line: u32,
    pub items: Vec<TaskItem>,
}

impl TaskList {
    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    /// Fraction of completed items, 0.0 for an empty list.
    pub fn progress(&self) -> f64 {
        fraction(self.completed_count(), self.total_count())
    }
}

/// Totals across every task list of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStatistics {
    pub total: usize,
    pub completed: usize,
}

impl TaskStatistics {
    pub fn progress(&self) -> f64 {
        fraction(self.completed, self.total)
    }
}

#[allow(clippy::cast_precision_loss)]
fn fraction(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Parse every task list in `text`.
///
/// Blank or non-task lines end the current list. Lines inside fenced code
/// blocks are never tasks.
pub fn parse_all(text: &str) -> Vec<TaskList> {
    let mut lists = Vec::new();
    let mut current: Option<TaskList> = None;

    for (line, in_code) in fence_aware_lines(text) {
        let item = if in_code {
            None
        } else {
            TaskItem::from_line(&line)
        };
        match item {
            Some(item) => match current.as_mut() {
                Some(list) => {
                    list.end_line = item.line;
                    list.items.push(item);
                }
                None => {
                    current = Some(TaskList {
                        start_line: item.line,
                        end_line: item.line,
                        items: vec![item],
                    });
                }
            },
            None => lists.extend(current.take()),
        }
    }
    lists.extend(current);
    tracing::trace!(lists = lists.len(), "parsed task lists");
    lists
}

/// The task item on the line containing `offset`, if that line is one.
///
/// A caret at the very end of a line belongs to that line.
pub fn item_at(text: &str, offset: u32) -> Option<TaskItem> {
    let (line, in_code) = fence_aware_lines(text)
        .take_while(|(line, _)| line.range.start <= offset)
        .find(|(line, _)| offset <= line.range.end)?;
    if in_code {
        return None;
    }
    TaskItem::from_line(&line)
}

/// Flip the checkbox character at `checkbox_range`.
///
/// `x` and `X` become a space, anything else becomes `x`, so `[X]` comes
/// back as `[x]` after two toggles. Returns `false` without touching the
/// buffer when the range is not a single in-bounds code unit, which is what
/// a range held across an edit usually looks like.
pub fn toggle<B: TextBuffer + ?Sized>(buffer: &mut B, checkbox_range: TextRange) -> bool {
    if checkbox_range.len() != 1 {
        return false;
    }
    let Some(current) = buffer.text_in(checkbox_range) else {
        tracing::debug!(range = %checkbox_range, "stale checkbox range");
        return false;
    };
    let replacement = if matches!(current.as_str(), "x" | "X") {
        " "
    } else {
        "x"
    };
    buffer.replace(checkbox_range, replacement)
}

/// Toggle the task on the line containing `offset`.
///
/// Returns `false` when that line is not a task item.
pub fn toggle_at<B: TextBuffer + ?Sized>(buffer: &mut B, offset: u32) -> bool {
    let item = item_at(&buffer.to_text(), offset);
    item.is_some_and(|item| toggle(buffer, item.checkbox_range))
}

/// Count items and completed items across all task lists.
pub fn statistics(text: &str) -> TaskStatistics {
    parse_all(text)
        .iter()
        .fold(TaskStatistics::default(), |acc, list| TaskStatistics {
            total: acc.total + list.total_count(),
            completed: acc.completed + list.completed_count(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_all("").is_empty());
    }

    #[test]
    fn test_parse_single_item_ranges() {
        let lists = parse_all("- [ ] Buy milk");
        assert_eq!(lists.len(), 1);
        let item = &lists[0].items[0];
        assert_eq!(item.line_range, TextRange::new(0, 14));
        assert_eq!(item.checkbox_range, TextRange::new(3, 4));
        assert_eq!(item.content_range, TextRange::new(6, 14));
        assert_eq!(item.text, "Buy milk");
        assert!(!item.completed);
        assert_eq!(item.indent_level, 0);
    }

    #[test]
    fn test_parse_checked_states() {
        let lists = parse_all("- [x] a\n* [X] b\n+ [ ] c");
        let states: Vec<bool> = lists[0].items.iter().map(|i| i.completed).collect();
        assert_eq!(states, vec![true, true, false]);
    }

    #[test]
    fn test_tasks_inside_fence_are_ignored() {
        let text = "- [ ] real\n```md\n- [ ] sample\n```\n- [x] after";
        let lists = parse_all(text);
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].items[0].text, "real");
        assert_eq!(lists[1].items[0].text, "after");
        assert_eq!(statistics(text).total, 2);
        assert!(item_at(text, 20).is_none());

        let mut buffer = text.to_string();
        assert!(!toggle_at(&mut buffer, 20));
        assert_eq!(buffer, text);
    }

    #[test]
    fn test_blank_line_splits_lists() {
        let lists = parse_all("- [ ] a\n- [x] b\n\n- [ ] c");
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].start_line, 0);
        assert_eq!(lists[0].end_line, 1);
        assert_eq!(lists[1].start_line, 3);
        assert_eq!(lists[1].end_line, 3);
    }

    #[test]
    fn test_plain_list_line_splits_lists() {
        let lists = parse_all("- [ ] a\n- plain\n- [ ] b");
        assert_eq!(lists.len(), 2);
    }

    #[test]
    fn test_indent_level_is_half_the_columns() {
        let lists = parse_all("- [ ] a\n  - [ ] b\n     - [ ] c\n\t- [ ] d");
        let levels: Vec<u32> = lists[0].items.iter().map(|i| i.indent_level).collect();
        assert_eq!(levels, vec![0, 1, 2, 2]);
    }

    #[test]
    fn test_malformed_checkbox_is_not_an_item() {
        assert!(parse_all("- [ a").is_empty());
        assert!(parse_all("- [] a").is_empty());
        assert!(parse_all("-[ ] a").is_empty());
        assert!(parse_all("- [y] a").is_empty());
        assert!(parse_all("- [ ]a").is_empty());
    }

    #[test]
    fn test_item_without_text() {
        let lists = parse_all("- [ ]");
        let item = &lists[0].items[0];
        assert_eq!(item.text, "");
        assert_eq!(item.content_range, TextRange::empty_at(5));
    }

    #[test]
    fn test_ranges_are_utf16() {
        let text = "# 😀\n- [x] café";
        let item = &parse_all(text)[0].items[0];
        // "# 😀\n" is 5 UTF-16 units
        assert_eq!(item.line_range, TextRange::new(5, 15));
        assert_eq!(item.checkbox_range, TextRange::new(8, 9));
        assert_eq!(item.content_range, TextRange::new(11, 15));
    }

    #[test]
    fn test_item_ranges_nest_in_line() {
        for list in parse_all("- [ ] one\n    - [x] two\n- [ ]") {
            for item in list.items {
                assert!(item.line_range.contains_range(item.checkbox_range));
                assert!(item.line_range.contains_range(item.content_range));
            }
        }
    }

    #[test]
    fn test_item_at_offsets() {
        let text = "intro\n- [ ] task\nafter";
        assert!(item_at(text, 2).is_none());
        let item = item_at(text, 8).unwrap();
        assert_eq!(item.text, "task");
        assert!(item_at(text, 16).is_some(), "caret at end of line");
        assert!(item_at(text, 18).is_none());
        assert!(item_at(text, 500).is_none());
    }

    #[test]
    fn test_item_at_empty_text() {
        assert!(item_at("", 0).is_none());
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut buffer = String::from("- [ ] a");
        let range = TextRange::new(3, 4);
        assert!(toggle(&mut buffer, range));
        assert_eq!(buffer, "- [x] a");
        assert!(toggle(&mut buffer, range));
        assert_eq!(buffer, "- [ ] a");
    }

    #[test]
    fn test_toggle_uppercase_comes_back_lowercase() {
        let mut buffer = String::from("- [X] a");
        let range = TextRange::new(3, 4);
        assert!(toggle(&mut buffer, range));
        assert_eq!(buffer, "- [ ] a");
        assert!(toggle(&mut buffer, range));
        assert_eq!(buffer, "- [x] a");
    }

    #[test]
    fn test_toggle_stale_range_is_rejected() {
        let mut buffer = String::from("- [ ]");
        assert!(!toggle(&mut buffer, TextRange::new(9, 10)));
        assert!(!toggle(&mut buffer, TextRange::new(3, 5)));
        assert_eq!(buffer, "- [ ]");
    }

    #[test]
    fn test_toggle_at_uses_line_under_caret() {
        let mut buffer = String::from("- [ ] a\n- [ ] b");
        assert!(toggle_at(&mut buffer, 12));
        assert_eq!(buffer, "- [ ] a\n- [x] b");
        assert!(!toggle_at(&mut buffer, 40));
    }

    #[test]
    fn test_statistics_counts_all_lists() {
        let stats = statistics("- [ ] A\n- [x] B\n- [ ] C\n- [x] D\n- [x] E");
        assert_eq!(stats, TaskStatistics { total: 5, completed: 3 });
        assert!((stats.progress() - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_of_empty_list_is_zero() {
        let list = TaskList {
            start_line: 0,
            end_line: 0,
            items: Vec::new(),
        };
        assert!(list.progress().abs() < f64::EPSILON);
        assert!(TaskStatistics::default().progress().abs() < f64::EPSILON);
    }
}
