//! Serializing tables back to Markdown.

use unicode_width::UnicodeWidthStr;

use super::{MarkdownTable, TableAlignment};

/// Narrowest column in aligned output, wide enough for `:-:`.
const MIN_COLUMN_WIDTH: usize = 3;

impl MarkdownTable {
    /// Canonical Markdown for the table.
    ///
    /// Header row, a separator of `:---` / `:---:` / `---:` tokens, then the
    /// data rows. Lines are joined with `\n` and there is no trailing newline,
    /// so the result can replace `source_range` directly.
    pub fn to_markdown(&self) -> String {
        let columns = self.column_count();
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(render_row(self.headers.iter().map(String::as_str).map(escape_cell)));
        lines.push(render_row(
            (0..columns).map(|col| self.alignment(col).token().to_string()),
        ));
        for row in 0..self.rows.len() {
            let cells = self.row(row).unwrap_or_default();
            lines.push(render_row(cells.into_iter().map(escape_cell)));
        }
        lines.join("\n")
    }

    /// Markdown with every column padded to a common display width.
    pub fn to_aligned_markdown(&self) -> String {
        let columns = self.column_count();
        let header: Vec<String> = self.headers.iter().map(String::as_str).map(escape_cell).collect();
        let body: Vec<Vec<String>> = (0..self.rows.len())
            .map(|row| {
                self.row(row)
                    .unwrap_or_default()
                    .into_iter()
                    .map(escape_cell)
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = (0..columns)
            .map(|col| {
                std::iter::once(&header[col])
                    .chain(body.iter().map(|row| &row[col]))
                    .map(|cell| cell.width())
                    .max()
                    .unwrap_or(0)
                    .max(MIN_COLUMN_WIDTH)
            })
            .collect();

        let pad_row = |cells: &[String]| {
            render_row(
                cells
                    .iter()
                    .enumerate()
                    .map(|(col, cell)| pad_cell(cell, widths[col], self.alignment(col))),
            )
        };

        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(pad_row(&header));
        lines.push(render_row(
            widths
                .iter()
                .enumerate()
                .map(|(col, &width)| separator_cell(width, self.alignment(col))),
        ));
        for row in &body {
            lines.push(pad_row(row));
        }
        lines.join("\n")
    }

    fn alignment(&self, col: usize) -> TableAlignment {
        self.alignments.get(col).copied().unwrap_or_default()
    }
}

fn render_row(cells: impl Iterator<Item = String>) -> String {
    let cells: Vec<String> = cells.collect();
    format!("| {} |", cells.join(" | "))
}

/// Make a cell value safe to place between pipes.
fn escape_cell(value: &str) -> String {
    value
        .replace(['\r', '\n'], " ")
        .replace('|', "\\|")
        .trim()
        .to_string()
}

fn pad_cell(cell: &str, width: usize, alignment: TableAlignment) -> String {
    let gap = width.saturating_sub(cell.width());
    match alignment {
        TableAlignment::Left => format!("{cell}{}", " ".repeat(gap)),
        TableAlignment::Right => format!("{}{cell}", " ".repeat(gap)),
        TableAlignment::Center => {
            let left = gap / 2;
            format!("{}{cell}{}", " ".repeat(left), " ".repeat(gap - left))
        }
    }
}

fn separator_cell(width: usize, alignment: TableAlignment) -> String {
    match alignment {
        TableAlignment::Left => format!(":{}", "-".repeat(width - 1)),
        TableAlignment::Right => format!("{}:", "-".repeat(width - 1)),
        TableAlignment::Center => format!(":{}:", "-".repeat(width - 2)),
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse_all;
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_to_markdown_canonical_form() {
        let table = MarkdownTable::new(
            strings(&["H1", "H2", "H3"]),
            vec![strings(&["a", "b", "c"])],
            vec![
                TableAlignment::Left,
                TableAlignment::Center,
                TableAlignment::Right,
            ],
        );
        assert_eq!(
            table.to_markdown(),
            "| H1 | H2 | H3 |\n| :--- | :---: | ---: |\n| a | b | c |"
        );
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let table = MarkdownTable::new(
            strings(&["H1", "H2"]),
            vec![strings(&["C1", "C2"])],
            vec![TableAlignment::Left, TableAlignment::Right],
        );
        let reparsed = parse_all(&table.to_markdown()).pop().unwrap();
        assert_eq!(reparsed.headers, table.headers);
        assert_eq!(reparsed.rows, table.rows);
        assert_eq!(reparsed.alignments, table.alignments);
    }

    #[test]
    fn test_round_trip_with_pipes_and_empty_cells() {
        let source = "| a \\| b | |\n|---|:-:|\n| | x |";
        let table = parse_all(source).pop().unwrap();
        assert_eq!(table.headers, strings(&["a | b", ""]));
        let reparsed = parse_all(&table.to_markdown()).pop().unwrap();
        assert_eq!(reparsed.headers, table.headers);
        assert_eq!(reparsed.rows, table.rows);
        assert_eq!(reparsed.alignments, table.alignments);
    }

    #[test]
    fn test_to_markdown_normalizes_ragged_rows() {
        let mut table = MarkdownTable::new(strings(&["A", "B"]), Vec::new(), Vec::new());
        table.rows.push(strings(&["1"]));
        table.rows.push(strings(&["1", "2", "3"]));
        assert_eq!(
            table.to_markdown(),
            "| A | B |\n| :--- | :--- |\n| 1 |  |\n| 1 | 2 |"
        );
    }

    #[test]
    fn test_to_markdown_flattens_newlines() {
        let mut table = MarkdownTable::new(strings(&["A"]), vec![strings(&["x"])], Vec::new());
        table.set_cell(0, 0, "one\ntwo");
        assert!(table.to_markdown().ends_with("| one two |"));
    }

    #[test]
    fn test_aligned_markdown_pads_columns() {
        let table = MarkdownTable::new(
            strings(&["Name", "N"]),
            vec![strings(&["a", "100"]), strings(&["bb", "7"])],
            vec![TableAlignment::Left, TableAlignment::Right],
        );
        assert_eq!(
            table.to_aligned_markdown(),
            "| Name |   N |\n| :--- | --: |\n| a    | 100 |\n| bb   |   7 |"
        );
    }

    #[test]
    fn test_aligned_markdown_centers_and_counts_wide_chars() {
        let table = MarkdownTable::new(
            strings(&["漢字"]),
            vec![strings(&["a"])],
            vec![TableAlignment::Center],
        );
        assert_eq!(
            table.to_aligned_markdown(),
            "| 漢字 |\n| :--: |\n|  a   |"
        );
    }

    #[test]
    fn test_aligned_markdown_reparses() {
        let table = parse_all("| a | b |\n|:-:|--:|\n| long cell | 2 |")
            .pop()
            .unwrap();
        let reparsed = parse_all(&table.to_aligned_markdown()).pop().unwrap();
        assert_eq!(reparsed.headers, table.headers);
        assert_eq!(reparsed.rows, table.rows);
        assert_eq!(reparsed.alignments, table.alignments);
    }
}
