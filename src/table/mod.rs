//! GFM pipe-table model.
//!
//! Tables are parsed from text into plain values, edited in memory and
//! serialized back. Edits never fail: indices out of range leave the table
//! unchanged and report `false`.

mod format;
mod parse;

use serde::Serialize;

pub use parse::{parse_all, table_at};
pub(crate) use parse::{pipe_offsets, table_blocks};

use crate::document::TextRange;
use crate::editor::TextBuffer;

/// Per-column justification declared by the separator row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum TableAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl TableAlignment {
    /// Alignment of a separator cell such as `:---:`.
    ///
    /// Both colons mean center, a trailing colon alone means right, anything
    /// else (including plain `---`) is left.
    pub fn from_separator_cell(cell: &str) -> Self {
        let cell = cell.trim();
        match (cell.starts_with(':'), cell.ends_with(':') && cell.len() > 1) {
            (true, true) => Self::Center,
            (false, true) => Self::Right,
            _ => Self::Left,
        }
    }

    /// Canonical separator token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Left => ":---",
            Self::Center => ":---:",
            Self::Right => "---:",
        }
    }
}

/// A parsed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkdownTable {
    pub headers: Vec<String>,
    /// Data rows. Parsing and every edit keep each row at `headers.len()`
    /// cells; readers pad or truncate in case a caller did not.
    pub rows: Vec<Vec<String>>,
    /// One entry per header column.
    pub alignments: Vec<TableAlignment>,
    /// The whole table block, header line through last row.
    pub source_range: TextRange,
    /// First line of the block (zero-based).
    pub start_line: u32,
    /// Last line of the block, inclusive.
    pub end_line: u32,
}

impl MarkdownTable {
    /// Build a table that is not yet part of any text.
    ///
    /// Rows are padded or truncated to the header count, and alignments are
    /// filled with `Left`.
    pub fn new(
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        mut alignments: Vec<TableAlignment>,
    ) -> Self {
        let columns = headers.len();
        alignments.resize(columns, TableAlignment::Left);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                parse::normalize_row(&mut row, columns);
                row
            })
            .collect();
        Self {
            headers,
            rows,
            alignments,
            source_range: TextRange::default(),
            start_line: 0,
            end_line: 0,
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The cell at `row`, `col`; short rows read as empty cells.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        if col >= self.column_count() {
            return None;
        }
        let cells = self.rows.get(row)?;
        Some(cells.get(col).map_or("", String::as_str))
    }

    /// A data row padded or truncated to the column count.
    pub fn row(&self, row: usize) -> Option<Vec<&str>> {
        let cells = self.rows.get(row)?;
        Some(
            (0..self.column_count())
                .map(|col| cells.get(col).map_or("", String::as_str))
                .collect(),
        )
    }

    /// Insert a data row before `at`; `at == row_count` appends.
    pub fn insert_row(&mut self, at: usize, mut cells: Vec<String>) -> bool {
        if at > self.rows.len() {
            return false;
        }
        parse::normalize_row(&mut cells, self.column_count());
        self.rows.insert(at, cells);
        true
    }

    /// Remove the data row at `at`. The last remaining row is kept.
    pub fn delete_row(&mut self, at: usize) -> bool {
        if self.rows.len() <= 1 || at >= self.rows.len() {
            return false;
        }
        self.rows.remove(at);
        true
    }

    /// Insert a column before `at`; `at == column_count` appends.
    ///
    /// `cells` supplies the new cell for each row in order; rows beyond its
    /// length get an empty cell. The new column is left-aligned.
    pub fn insert_column(&mut self, at: usize, header: impl Into<String>, cells: &[String]) -> bool {
        let columns = self.column_count();
        if at > columns {
            return false;
        }
        self.headers.insert(at, header.into());
        self.alignments.resize(columns, TableAlignment::Left);
        self.alignments.insert(at, TableAlignment::Left);
        for (idx, row) in self.rows.iter_mut().enumerate() {
            parse::normalize_row(row, columns);
            row.insert(at, cells.get(idx).cloned().unwrap_or_default());
        }
        true
    }

    /// Remove the column at `at`. The last remaining column is kept.
    pub fn delete_column(&mut self, at: usize) -> bool {
        let columns = self.column_count();
        if columns <= 1 || at >= columns {
            return false;
        }
        self.headers.remove(at);
        if at < self.alignments.len() {
            self.alignments.remove(at);
        }
        for row in &mut self.rows {
            if at < row.len() {
                row.remove(at);
            }
        }
        true
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> bool {
        let columns = self.column_count();
        if col >= columns {
            return false;
        }
        let Some(cells) = self.rows.get_mut(row) else {
            return false;
        };
        parse::normalize_row(cells, columns);
        cells[col] = value.into();
        true
    }

    pub fn set_header(&mut self, col: usize, value: impl Into<String>) -> bool {
        let Some(header) = self.headers.get_mut(col) else {
            return false;
        };
        *header = value.into();
        true
    }

    pub fn set_alignment(&mut self, col: usize, alignment: TableAlignment) -> bool {
        let columns = self.column_count();
        if col >= columns {
            return false;
        }
        self.alignments.resize(columns, TableAlignment::Left);
        self.alignments[col] = alignment;
        true
    }

    /// Replace the table's source range in `buffer` with its serialization.
    ///
    /// Returns `false` when the range no longer fits the buffer.
    pub fn write_to<B: TextBuffer + ?Sized>(&self, buffer: &mut B) -> bool {
        let written = buffer.replace(self.source_range, &self.to_markdown());
        if !written {
            tracing::debug!(range = %self.source_range, "stale table range");
        }
        written
    }
}
