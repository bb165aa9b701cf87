//! Styling palette for annotations.
//!
//! The palette is an explicit value threaded into the pipeline so several
//! themes can coexist (one per editor pane, one per test).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::document::{SyntaxKind, TextColor, TextStyle};

/// Relative font scale per heading level, in percent.
const HEADING_SCALES: [u16; 6] = [200, 170, 150, 130, 115, 100];

/// Error loading a palette file.
#[derive(Debug, thiserror::Error)]
pub enum PaletteError {
    #[error("failed to read palette {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid palette: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Background the palette is designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteBase {
    Light,
    Dark,
}

impl PaletteBase {
    /// Guess the editor background from the `COLORFGBG` environment variable.
    pub fn detect() -> Self {
        Self::from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
    }

    /// Parse a `COLORFGBG` value such as `15;0`. Defaults to dark.
    pub fn from_colorfgbg(colorfgbg: Option<&str>) -> Self {
        let Some(value) = colorfgbg else {
            return Self::Dark;
        };
        let bg_str = value.rsplit(';').next().unwrap_or(value);
        let Ok(bg) = bg_str.parse::<u8>() else {
            return Self::Dark;
        };

        if bg >= 7 { Self::Light } else { Self::Dark }
    }
}

/// Maps each syntax construct to the style attached to its annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub code: TextStyle,
    pub heading: TextStyle,
    pub link_punctuation: TextStyle,
    pub link_text: TextStyle,
    pub link_url: TextStyle,
    pub image_alt: TextStyle,
    pub autolink: TextStyle,
    pub footnote: TextStyle,
    pub bold: TextStyle,
    pub strikethrough: TextStyle,
    pub italic: TextStyle,
    pub blockquote: TextStyle,
    pub callout: TextStyle,
    pub list_marker: TextStyle,
    pub task_unchecked: TextStyle,
    pub task_checked: TextStyle,
    pub table_separator: TextStyle,
    pub table_pipe: TextStyle,
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_base(PaletteBase::Dark)
    }
}

impl Palette {
    /// Built-in palette for a light or dark editor background.
    pub fn for_base(base: PaletteBase) -> Self {
        let light = base == PaletteBase::Light;
        let pick = |on_light: TextColor, on_dark: TextColor| {
            Some(if light { on_light } else { on_dark })
        };
        let muted = TextStyle {
            fg: pick(TextColor::rgb(140, 140, 140), TextColor::rgb(110, 110, 110)),
            muted: true,
            ..TextStyle::default()
        };
        let accent = pick(TextColor::rgb(3, 102, 214), TextColor::rgb(88, 166, 255));

        Self {
            code: TextStyle {
                fg: pick(TextColor::rgb(207, 34, 46), TextColor::rgb(255, 123, 114)),
                bg: pick(TextColor::rgb(246, 248, 250), TextColor::rgb(22, 27, 34)),
                monospace: true,
                ..TextStyle::default()
            },
            heading: TextStyle {
                fg: pick(TextColor::rgb(31, 35, 40), TextColor::rgb(230, 237, 243)),
                bold: true,
                ..TextStyle::default()
            },
            link_punctuation: muted,
            link_text: TextStyle {
                fg: accent,
                underline: true,
                ..TextStyle::default()
            },
            link_url: muted,
            image_alt: TextStyle {
                fg: accent,
                italic: true,
                ..TextStyle::default()
            },
            autolink: TextStyle {
                fg: accent,
                underline: true,
                ..TextStyle::default()
            },
            footnote: TextStyle {
                fg: accent,
                scale: Some(85),
                ..TextStyle::default()
            },
            bold: TextStyle {
                bold: true,
                ..TextStyle::default()
            },
            strikethrough: TextStyle {
                strikethrough: true,
                muted: true,
                ..TextStyle::default()
            },
            italic: TextStyle {
                italic: true,
                ..TextStyle::default()
            },
            blockquote: TextStyle {
                fg: pick(TextColor::rgb(101, 109, 118), TextColor::rgb(139, 148, 158)),
                ..TextStyle::default()
            },
            callout: TextStyle {
                fg: accent,
                bold: true,
                ..TextStyle::default()
            },
            list_marker: TextStyle {
                fg: accent,
                ..TextStyle::default()
            },
            task_unchecked: TextStyle {
                fg: accent,
                monospace: true,
                ..TextStyle::default()
            },
            task_checked: TextStyle {
                fg: pick(TextColor::rgb(26, 127, 55), TextColor::rgb(63, 185, 80)),
                monospace: true,
                ..TextStyle::default()
            },
            table_separator: muted,
            table_pipe: muted,
        }
    }

    /// Parse a palette from JSON. Missing roles keep their default style.
    pub fn from_json(json: &str) -> Result<Self, PaletteError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a palette from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PaletteError> {
        let json = std::fs::read_to_string(path).map_err(|source| PaletteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Style for a construct.
    pub fn style_for(&self, kind: SyntaxKind) -> TextStyle {
        match kind {
            SyntaxKind::CodeBlock | SyntaxKind::InlineCode => self.code,
            SyntaxKind::Heading(level) => {
                let idx = usize::from(level.clamp(1, 6) - 1);
                TextStyle {
                    scale: Some(HEADING_SCALES[idx]),
                    ..self.heading
                }
            }
            SyntaxKind::LinkPunctuation => self.link_punctuation,
            SyntaxKind::LinkText => self.link_text,
            SyntaxKind::ImageAlt => self.image_alt,
            SyntaxKind::LinkUrl => self.link_url,
            SyntaxKind::Autolink => self.autolink,
            SyntaxKind::FootnoteReference | SyntaxKind::FootnoteDefinition => self.footnote,
            SyntaxKind::Bold => self.bold,
            SyntaxKind::Strikethrough => self.strikethrough,
            SyntaxKind::Italic => self.italic,
            SyntaxKind::BlockquoteMarker => self.blockquote,
            SyntaxKind::Callout(_) => self.callout,
            SyntaxKind::ListMarker => self.list_marker,
            SyntaxKind::TaskUnchecked => self.task_unchecked,
            SyntaxKind::TaskChecked => self.task_checked,
            SyntaxKind::TableSeparator => self.table_separator,
            SyntaxKind::TablePipe => self.table_pipe,
        }
    }
}
