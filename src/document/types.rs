//! Core range model types.

use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` interval of UTF-16 code-unit offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    /// Create a range. `end` is raised to `start` if it lies before it.
    pub const fn new(start: u32, end: u32) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    /// A zero-length range at `offset`.
    pub const fn empty_at(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` falls inside the half-open interval.
    pub const fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether `other` lies entirely within this range.
    pub const fn contains_range(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two intervals share at least one code unit.
    pub const fn overlaps(&self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Clamp both ends to `len`, for applying a range to a shorter buffer.
    #[must_use]
    pub fn clamp_to(self, len: u32) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// RGB color for annotation styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TextColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Display attributes attached to an annotation.
///
/// The model never interprets these; they are handed to the renderer as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub fg: Option<TextColor>,
    pub bg: Option<TextColor>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub monospace: bool,
    /// Render the span dimmed (syntax punctuation).
    pub muted: bool,
    /// Relative font scale in percent, 100 = body text.
    pub scale: Option<u16>,
}

/// GitHub-style callout types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CalloutKind {
    Note,
    Warning,
    Important,
    Tip,
    Caution,
}

impl CalloutKind {
    /// Parse the marker text between `[!` and `]`. Only the exact
    /// upper-case names are recognized.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "NOTE" => Some(Self::Note),
            "WARNING" => Some(Self::Warning),
            "IMPORTANT" => Some(Self::Important),
            "TIP" => Some(Self::Tip),
            "CAUTION" => Some(Self::Caution),
            _ => None,
        }
    }

    pub const fn marker(self) -> &'static str {
        match self {
            Self::Note => "NOTE",
            Self::Warning => "WARNING",
            Self::Important => "IMPORTANT",
            Self::Tip => "TIP",
            Self::Caution => "CAUTION",
        }
    }
}

/// The construct an annotation marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SyntaxKind {
    /// Fenced code block, fences included
    CodeBlock,
    /// Inline code span, backticks included
    InlineCode,
    /// ATX heading line with level (1-6)
    Heading(u8),
    /// `[` or `![`, `](` and `)` of a link or image
    LinkPunctuation,
    LinkText,
    ImageAlt,
    LinkUrl,
    Autolink,
    FootnoteReference,
    FootnoteDefinition,
    Bold,
    Strikethrough,
    Italic,
    BlockquoteMarker,
    Callout(CalloutKind),
    ListMarker,
    TaskUnchecked,
    TaskChecked,
    TableSeparator,
    TablePipe,
}

impl SyntaxKind {
    /// Fixed conflict priority. Higher wins when annotations overlap.
    pub const fn priority(self) -> i32 {
        match self {
            Self::CodeBlock | Self::InlineCode => 0,
            Self::Heading(_) => 10,
            Self::LinkPunctuation
            | Self::LinkText
            | Self::ImageAlt
            | Self::LinkUrl
            | Self::Autolink
            | Self::FootnoteReference
            | Self::FootnoteDefinition => 20,
            Self::Bold => 30,
            Self::Strikethrough => 40,
            Self::Italic => 50,
            Self::BlockquoteMarker | Self::Callout(_) => 60,
            Self::ListMarker => 70,
            Self::TaskUnchecked | Self::TaskChecked => 80,
            Self::TableSeparator | Self::TablePipe => 90,
        }
    }

    /// Code constructs are opaque to every other recognizer.
    pub const fn is_code(self) -> bool {
        matches!(self, Self::CodeBlock | Self::InlineCode)
    }
}

/// A styled offset range produced by a recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Annotation {
    pub start: u32,
    pub end: u32,
    pub kind: SyntaxKind,
    pub style: TextStyle,
    pub priority: i32,
}

impl Annotation {
    /// Create an annotation with the kind's fixed priority.
    pub const fn new(range: TextRange, kind: SyntaxKind, style: TextStyle) -> Self {
        Self {
            start: range.start,
            end: range.end,
            kind,
            style,
            priority: kind.priority(),
        }
    }

    pub const fn range(&self) -> TextRange {
        TextRange {
            start: self.start,
            end: self.end,
        }
    }

    /// Copy of this annotation clamped to a buffer of `len` code units.
    #[must_use]
    pub fn clamped(&self, len: u32) -> Self {
        let range = self.range().clamp_to(len);
        Self {
            start: range.start,
            end: range.end,
            ..*self
        }
    }
}
