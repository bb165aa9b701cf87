//! Pattern recognizers, one per Markdown construct.
//!
//! Each recognizer is a stateless scan over the whole text. Matches from
//! different recognizers overlap freely; the resolver decides which survive.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::extended;
use super::palette::Palette;
use crate::document::{Annotation, SourceLine, SyntaxKind, Utf16Index, source_lines};
use crate::{table, tasks};

/// A byte range of the scanned text tagged with the construct it marks.
pub(crate) type ByteMatch = (Range<usize>, SyntaxKind);

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(#{1,6})(?:[ \t].*)?$").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[([^\[\]\n]*)\]\(([^()\s]*(?:[ \t]+"[^"\n]*")?)\)"#).unwrap()
});
static BOLD_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*[^*\s](?:[^*\n]*[^*\s])?\*\*").unwrap());
static BOLD_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__[^_\s](?:[^_\n]*[^_\s])?__").unwrap());
static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*[^*\s](?:[^*\n]*[^*\s])?\*").unwrap());
static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_[^_\s](?:[^_\n]*[^_\s])?_").unwrap());
static STRIKETHROUGH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~[^~\s](?:[^~\n]*[^~\s])?~~").unwrap());
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(?:>[ \t]?)+").unwrap());
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*((?:[-*+]|\d{1,9}[.)])[ \t]+)").unwrap());

/// Text prepared for scanning, with its UTF-16 index built once.
#[derive(Debug, Clone)]
pub struct Source<'a> {
    text: &'a str,
    index: Utf16Index,
}

impl<'a> Source<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            index: Utf16Index::new(text),
        }
    }

    pub const fn text(&self) -> &'a str {
        self.text
    }

    pub const fn index(&self) -> &Utf16Index {
        &self.index
    }
}

/// The closed set of construct scanners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recognizer {
    FencedCode,
    InlineCode,
    Heading,
    Link,
    Bold,
    Strikethrough,
    Italic,
    Blockquote,
    ListMarker,
    TaskCheckbox,
    TableSeparator,
    Autolink,
    Footnote,
    Callout,
}

impl Recognizer {
    /// Every recognizer, code first.
    pub const ALL: [Self; 14] = [
        Self::FencedCode,
        Self::InlineCode,
        Self::Heading,
        Self::Link,
        Self::Bold,
        Self::Strikethrough,
        Self::Italic,
        Self::Blockquote,
        Self::ListMarker,
        Self::TaskCheckbox,
        Self::TableSeparator,
        Self::Autolink,
        Self::Footnote,
        Self::Callout,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::FencedCode => "fenced_code",
            Self::InlineCode => "inline_code",
            Self::Heading => "heading",
            Self::Link => "link",
            Self::Bold => "bold",
            Self::Strikethrough => "strikethrough",
            Self::Italic => "italic",
            Self::Blockquote => "blockquote",
            Self::ListMarker => "list_marker",
            Self::TaskCheckbox => "task_checkbox",
            Self::TableSeparator => "table_separator",
            Self::Autolink => "autolink",
            Self::Footnote => "footnote",
            Self::Callout => "callout",
        }
    }

    /// Scan `text` and return this construct's annotations.
    pub fn scan(self, text: &str, palette: &Palette) -> Vec<Annotation> {
        self.scan_source(&Source::new(text), palette)
    }

    /// Scan text whose UTF-16 index has already been built.
    pub fn scan_source(self, source: &Source<'_>, palette: &Palette) -> Vec<Annotation> {
        let text = source.text();
        let mut found: Vec<ByteMatch> = Vec::new();
        match self {
            Self::FencedCode => {
                found.extend(
                    fenced_blocks(text)
                        .into_iter()
                        .map(|range| (range, SyntaxKind::CodeBlock)),
                );
            }
            Self::InlineCode => inline_code(text, &mut found),
            Self::Heading => headings(text, &mut found),
            Self::Link => links(text, &mut found),
            Self::Bold => {
                delimited(text, &BOLD_STAR, b'*', Flanking::Any, SyntaxKind::Bold, &mut found);
                delimited(
                    text,
                    &BOLD_UNDERSCORE,
                    b'_',
                    Flanking::NotIntraword,
                    SyntaxKind::Bold,
                    &mut found,
                );
            }
            Self::Strikethrough => delimited(
                text,
                &STRIKETHROUGH,
                b'~',
                Flanking::Any,
                SyntaxKind::Strikethrough,
                &mut found,
            ),
            Self::Italic => {
                delimited(
                    text,
                    &ITALIC_STAR,
                    b'*',
                    Flanking::Single,
                    SyntaxKind::Italic,
                    &mut found,
                );
                delimited(
                    text,
                    &ITALIC_UNDERSCORE,
                    b'_',
                    Flanking::NotIntraword,
                    SyntaxKind::Italic,
                    &mut found,
                );
            }
            Self::Blockquote => blockquote_markers(text, &mut found),
            Self::ListMarker => list_markers(text, &mut found),
            Self::TaskCheckbox => task_checkboxes(text, &mut found),
            Self::TableSeparator => table_syntax(text, &mut found),
            Self::Autolink => extended::autolinks(text, &mut found),
            Self::Footnote => extended::footnotes(text, &mut found),
            Self::Callout => extended::callouts(text, &mut found),
        }

        found
            .into_iter()
            .filter(|(range, _)| range.start < range.end)
            .map(|(range, kind)| {
                Annotation::new(source.index().range(range), kind, palette.style_for(kind))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    ch: u8,
    len: usize,
}

/// Split a line into its fence and the text after it, if it is one.
fn fence_of(line: &str) -> Option<(Fence, &str)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let ch = *rest.as_bytes().first()?;
    if ch != b'`' && ch != b'~' {
        return None;
    }
    let len = rest.bytes().take_while(|&b| b == ch).count();
    (len >= 3).then(|| (Fence { ch, len }, &rest[len..]))
}

/// Byte ranges of fenced code blocks, opening fence through closing fence.
///
/// A fence that is never closed yields nothing.
fn fenced_blocks(text: &str) -> Vec<Range<usize>> {
    let mut blocks = Vec::new();
    let mut open: Option<(Fence, usize)> = None;

    for line in source_lines(text) {
        let Some((fence, after)) = fence_of(line.text) else {
            continue;
        };
        match open {
            None => {
                // Backtick fences cannot carry backticks in their info string.
                if fence.ch == b'`' && after.contains('`') {
                    continue;
                }
                open = Some((fence, line.byte_start));
            }
            Some((opening, start)) => {
                if fence.ch == opening.ch && fence.len >= opening.len && after.trim().is_empty() {
                    blocks.push(start..line.byte_start + line.text.len());
                    open = None;
                }
            }
        }
    }
    blocks
}

/// Every line of `text`, flagged `true` when it belongs to a fenced code
/// block, fences included.
pub(crate) fn fence_aware_lines(text: &str) -> impl Iterator<Item = (SourceLine<'_>, bool)> {
    let fences = fenced_blocks(text);
    let mut next_fence = 0;
    source_lines(text).map(move |line| {
        while fences
            .get(next_fence)
            .is_some_and(|block| block.end <= line.byte_start)
        {
            next_fence += 1;
        }
        let in_code = fences
            .get(next_fence)
            .is_some_and(|block| block.contains(&line.byte_start));
        (line, in_code)
    })
}

fn run_length(bytes: &[u8], from: usize, byte: u8) -> usize {
    bytes[from..].iter().take_while(|&&b| b == byte).count()
}

/// Start of the next backtick run of exactly `len`, stopping at a blank line.
fn closing_backticks(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut i = from;
    let mut blank_line = false;
    while i < bytes.len() {
        match bytes[i] {
            b'`' => {
                let run = run_length(bytes, i, b'`');
                if run == len {
                    return Some(i);
                }
                i += run;
                blank_line = false;
                continue;
            }
            b'\n' => {
                if blank_line {
                    return None;
                }
                blank_line = true;
            }
            b' ' | b'\t' | b'\r' => {}
            _ => blank_line = false,
        }
        i += 1;
    }
    None
}

fn inline_code(text: &str, out: &mut Vec<ByteMatch>) {
    let fences = fenced_blocks(text);
    let bytes = text.as_bytes();
    // Fences are sorted and disjoint; `next_fence` is the first one not yet
    // behind the scan position.
    let mut next_fence = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        while fences.get(next_fence).is_some_and(|block| block.end <= i) {
            next_fence += 1;
        }
        let upcoming = fences.get(next_fence);
        if let Some(block) = upcoming.filter(|block| block.contains(&i)) {
            i = block.end;
            continue;
        }
        let len = run_length(bytes, i, b'`');
        if i > 0 && bytes[i - 1] == b'\\' {
            i += len;
            continue;
        }
        let limit = upcoming.map_or(bytes.len(), |block| block.start);
        match closing_backticks(&bytes[..limit], i + len, len) {
            Some(close) => {
                out.push((i..close + len, SyntaxKind::InlineCode));
                i = close + len;
            }
            None => i += len,
        }
    }
}

fn headings(text: &str, out: &mut Vec<ByteMatch>) {
    for line in source_lines(text) {
        if !line.text.trim_start().starts_with('#') {
            continue;
        }
        if let Some(caps) = HEADING.captures(line.text) {
            let level = caps.get(1).map_or(1, |m| m.len()) as u8;
            out.push((
                line.byte_start..line.byte_start + line.text.len(),
                SyntaxKind::Heading(level),
            ));
        }
    }
}

/// Links and images, split into punctuation, text and URL pieces.
fn links(text: &str, out: &mut Vec<ByteMatch>) {
    let bytes = text.as_bytes();
    for caps in LINK.captures_iter(text) {
        let (Some(whole), Some(label), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let is_image = whole.start() > 0 && bytes[whole.start() - 1] == b'!';
        let open = if is_image {
            whole.start() - 1
        } else {
            whole.start()
        };
        let text_kind = if is_image {
            SyntaxKind::ImageAlt
        } else {
            SyntaxKind::LinkText
        };
        out.push((open..label.start(), SyntaxKind::LinkPunctuation));
        out.push((label.range(), text_kind));
        out.push((label.end()..url.start(), SyntaxKind::LinkPunctuation));
        out.push((url.range(), SyntaxKind::LinkUrl));
        out.push((url.end()..whole.end(), SyntaxKind::LinkPunctuation));
    }
}

/// What may sit directly outside an emphasis delimiter.
#[derive(Debug, Clone, Copy)]
enum Flanking {
    Any,
    /// Not another copy of the delimiter, so `*a*` never matches inside `**a**`.
    Single,
    /// Not the delimiter and not a word character.
    NotIntraword,
}

fn delimited(
    text: &str,
    pattern: &Regex,
    delimiter: u8,
    flanking: Flanking,
    kind: SyntaxKind,
    out: &mut Vec<ByteMatch>,
) {
    let bytes = text.as_bytes();
    let mut pos = 0;
    while let Some(m) = pattern.find_at(text, pos) {
        let before = m.start().checked_sub(1).map(|i| bytes[i]);
        let after = bytes.get(m.end()).copied();
        let repeated = before == Some(delimiter) || after == Some(delimiter);
        let word = |b: Option<u8>| b.is_some_and(|b| b.is_ascii_alphanumeric());
        let rejected = match flanking {
            Flanking::Any => false,
            Flanking::Single => repeated,
            Flanking::NotIntraword => repeated || word(before) || word(after),
        };
        if rejected {
            pos = m.start() + 1;
        } else {
            out.push((m.range(), kind));
            pos = m.end();
        }
    }
}

fn blockquote_markers(text: &str, out: &mut Vec<ByteMatch>) {
    for line in source_lines(text) {
        let Some(m) = BLOCKQUOTE.find(line.text) else {
            continue;
        };
        let first = m.as_str().find('>').unwrap_or(0);
        out.push((
            line.byte_start + m.start() + first..line.byte_start + m.end(),
            SyntaxKind::BlockquoteMarker,
        ));
    }
}

/// `---`, `* * *` and friends look like list markers but are rules.
fn is_thematic_break(line: &str) -> bool {
    let mut marks = line.chars().filter(|c| !matches!(c, ' ' | '\t'));
    let Some(first) = marks.next() else {
        return false;
    };
    matches!(first, '-' | '*' | '_') && {
        let rest: Vec<char> = marks.collect();
        rest.len() >= 2 && rest.iter().all(|&c| c == first)
    }
}

fn list_markers(text: &str, out: &mut Vec<ByteMatch>) {
    for line in source_lines(text) {
        if is_thematic_break(line.text) {
            continue;
        }
        let Some(marker) = LIST_MARKER.captures(line.text).and_then(|caps| caps.get(1)) else {
            continue;
        };
        out.push((
            line.byte_start + marker.start()..line.byte_start + marker.end(),
            SyntaxKind::ListMarker,
        ));
    }
}

fn task_checkboxes(text: &str, out: &mut Vec<ByteMatch>) {
    for line in source_lines(text) {
        let Some(task) = tasks::match_task_line(line.text) else {
            continue;
        };
        let brackets = task.brackets();
        let kind = if task.completed {
            SyntaxKind::TaskChecked
        } else {
            SyntaxKind::TaskUnchecked
        };
        out.push((
            line.byte_start + brackets.start..line.byte_start + brackets.end,
            kind,
        ));
    }
}

/// The separator row of every table plus the pipes of its other rows.
fn table_syntax(text: &str, out: &mut Vec<ByteMatch>) {
    for block in table::table_blocks(text) {
        let separator = block.separator();
        out.push((
            separator.byte_start..separator.byte_start + separator.text.len(),
            SyntaxKind::TableSeparator,
        ));
        for line in block.content_lines() {
            out.extend(
                table::pipe_offsets(line.text)
                    .into_iter()
                    .map(|offset| {
                        let at = line.byte_start + offset;
                        (at..at + 1, SyntaxKind::TablePipe)
                    }),
            );
        }
    }
}
