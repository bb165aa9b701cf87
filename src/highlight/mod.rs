//! Markdown syntax highlighting.
//!
//! Every [`Recognizer`] scans the full text, code regions are made opaque to
//! the others, and the [`resolve`] pass merges what is left into one
//! non-overlapping annotation set. [`Highlighter`] memoizes the result for the
//! most recent text.

mod extended;
mod palette;
mod recognizer;
mod resolver;

use std::sync::Arc;

pub use palette::{Palette, PaletteBase, PaletteError};
pub use recognizer::{Recognizer, Source};
pub(crate) use recognizer::fence_aware_lines;
pub use resolver::resolve;

use crate::document::{Annotation, TextRange};

#[derive(Debug, Clone)]
struct CacheEntry {
    text: String,
    annotations: Arc<[Annotation]>,
}

/// Cached highlighting pipeline.
///
/// The cache holds a single entry keyed on the exact text. Results are shared
/// snapshots, so a caller's `Arc` stays valid after the cache moves on.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    palette: Palette,
    cache: Option<CacheEntry>,
}

impl Highlighter {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            cache: None,
        }
    }

    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Replace the palette. Cached annotations carry the old styles, so the
    /// cache is dropped.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.clear_cache();
    }

    /// Annotations for `text`, recomputed only when the text changed.
    pub fn highlight(&mut self, text: &str) -> Arc<[Annotation]> {
        if let Some(entry) = self.cache.as_ref().filter(|entry| entry.text == text) {
            tracing::debug!(len = text.len(), "highlight cache hit");
            return Arc::clone(&entry.annotations);
        }

        tracing::debug!(len = text.len(), "highlight cache miss");
        let annotations: Arc<[Annotation]> = highlight_uncached(text, &self.palette).into();
        self.cache = Some(CacheEntry {
            text: text.to_string(),
            annotations: Arc::clone(&annotations),
        });
        annotations
    }

    /// Whether `highlight(text)` would be served from the cache.
    pub fn is_cached(&self, text: &str) -> bool {
        self.cache.as_ref().is_some_and(|entry| entry.text == text)
    }

    pub fn clear_cache(&mut self) {
        self.cache = None;
    }
}

/// Run every recognizer and resolve the result, without caching.
pub fn highlight_uncached(text: &str, palette: &Palette) -> Vec<Annotation> {
    if text.is_empty() {
        return Vec::new();
    }
    let _scope = crate::perf::scope("highlight.pipeline");
    let source = Source::new(text);

    let mut code = Vec::new();
    let mut others = Vec::new();
    for recognizer in Recognizer::ALL {
        let found = recognizer.scan_source(&source, palette);
        tracing::trace!(recognizer = recognizer.name(), count = found.len(), "scanned");
        for ann in found {
            if ann.kind.is_code() {
                code.push(ann);
            } else {
                others.push(ann);
            }
        }
    }

    let code_ranges = code_regions(&code);
    let before = others.len();
    others.retain(|ann| !cuts_into_code(ann.range(), &code_ranges));
    tracing::trace!(dropped = before - others.len(), "annotations crossing code");

    let mut candidates = code;
    candidates.append(&mut others);
    let resolved = resolve(candidates);
    tracing::debug!(annotations = resolved.len(), "highlight pipeline done");
    resolved
}

/// Sorted, disjoint code ranges. Inline code inside a fenced block is folded
/// into the block.
fn code_regions(code: &[Annotation]) -> Vec<TextRange> {
    let mut ranges: Vec<TextRange> = code.iter().map(Annotation::range).collect();
    ranges.sort_unstable_by_key(|range| (range.start, std::cmp::Reverse(range.end)));
    let mut merged: Vec<TextRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start < last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

/// Whether `range` overlaps a code region without enclosing it. Markup around
/// code survives; markup reaching into it does not.
fn cuts_into_code(range: TextRange, code: &[TextRange]) -> bool {
    let first = code.partition_point(|c| c.end <= range.start);
    code[first..]
        .iter()
        .take_while(|c| c.start < range.end)
        .any(|c| !range.contains_range(*c))
}
