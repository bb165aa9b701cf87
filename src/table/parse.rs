//! Locating and splitting GFM pipe tables.

use crate::document::SourceLine;
use crate::highlight::fence_aware_lines;

use super::{MarkdownTable, TableAlignment};

/// A run of pipe lines whose second line is a valid separator row.
#[derive(Debug, Clone)]
pub(crate) struct TableBlock<'a> {
    pub lines: Vec<SourceLine<'a>>,
}

impl<'a> TableBlock<'a> {
    pub fn header(&self) -> &SourceLine<'a> {
        &self.lines[0]
    }

    pub fn separator(&self) -> &SourceLine<'a> {
        &self.lines[1]
    }

    /// Header and data rows, separator excluded.
    pub fn content_lines(&self) -> impl Iterator<Item = &SourceLine<'a>> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 1)
            .map(|(_, line)| line)
    }
}

/// Find every table block in `text`.
///
/// Consecutive lines containing `|` form a candidate; a candidate whose
/// second line is not a separator row is dropped as a whole. Lines of fenced
/// code blocks never take part.
pub(crate) fn table_blocks(text: &str) -> Vec<TableBlock<'_>> {
    let mut blocks = Vec::new();
    let mut candidate: Vec<SourceLine<'_>> = Vec::new();

    for (line, in_code) in fence_aware_lines(text) {
        if !in_code && line.text.contains('|') {
            candidate.push(line);
        } else {
            flush_candidate(&mut candidate, &mut blocks);
        }
    }
    flush_candidate(&mut candidate, &mut blocks);
    blocks
}

fn flush_candidate<'a>(candidate: &mut Vec<SourceLine<'a>>, blocks: &mut Vec<TableBlock<'a>>) {
    let lines = std::mem::take(candidate);
    if lines.len() >= 2 && is_separator_row(lines[1].text) {
        blocks.push(TableBlock { lines });
    }
}

/// Whether every cell of `line` looks like `:?-+:?`.
pub(crate) fn is_separator_row(line: &str) -> bool {
    let cells = split_row(line);
    !cells.is_empty() && cells.iter().all(|cell| is_separator_cell(cell))
}

fn is_separator_cell(cell: &str) -> bool {
    let body = cell.strip_prefix(':').unwrap_or(cell);
    let body = body.strip_suffix(':').unwrap_or(body);
    !body.is_empty() && body.bytes().all(|b| b == b'-')
}

/// Split a row into trimmed cells.
///
/// One leading and one trailing pipe are optional; `\|` is a literal pipe
/// inside a cell. A stray `\r` reads as a space, as it does on write.
pub(crate) fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = match inner.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => inner,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            '\r' => cell.push(' '),
            _ => cell.push(ch),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

/// Byte offsets of the unescaped pipes in `line`.
pub(crate) fn pipe_offsets(line: &str) -> Vec<usize> {
    let bytes = line.as_bytes();
    let mut offsets = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b'|') => i += 2,
            b'|' => {
                offsets.push(i);
                i += 1;
            }
            _ => i += 1,
        }
    }
    offsets
}

/// Resize a row to `columns` cells.
pub(crate) fn normalize_row(row: &mut Vec<String>, columns: usize) {
    row.resize(columns, String::new());
}

/// Parse every valid table in `text`.
pub fn parse_all(text: &str) -> Vec<MarkdownTable> {
    let tables: Vec<MarkdownTable> = table_blocks(text).iter().map(build_table).collect();
    tracing::trace!(tables = tables.len(), "parsed tables");
    tables
}

/// The table whose source range holds `offset`, end of the last line
/// included.
pub fn table_at(text: &str, offset: u32) -> Option<MarkdownTable> {
    table_blocks(text)
        .iter()
        .find(|block| {
            let first = block.lines[0].range.start;
            let last = block.lines[block.lines.len() - 1].range.end;
            first <= offset && offset <= last
        })
        .map(build_table)
}

fn build_table(block: &TableBlock<'_>) -> MarkdownTable {
    let headers = split_row(block.header().text);
    let columns = headers.len();

    let mut alignments: Vec<TableAlignment> = split_row(block.separator().text)
        .iter()
        .map(|cell| TableAlignment::from_separator_cell(cell))
        .collect();
    alignments.resize(columns, TableAlignment::Left);

    let rows = block.lines[2..]
        .iter()
        .map(|line| {
            let mut row = split_row(line.text);
            normalize_row(&mut row, columns);
            row
        })
        .collect();

    let first = block.header();
    let last = &block.lines[block.lines.len() - 1];
    MarkdownTable {
        headers,
        rows,
        alignments,
        source_range: crate::document::TextRange::new(first.range.start, last.range.end),
        start_line: first.index,
        end_line: last.index,
    }
}
