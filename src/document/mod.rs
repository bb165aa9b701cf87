//! Range model shared by every part of the document pipeline.
//!
//! This module holds:
//! - `TextRange` and `Annotation`, the half-open UTF-16 spans produced by
//!   recognizers and consumed by the resolver
//! - the display attribute bag (`TextStyle`) and construct tags (`SyntaxKind`)
//! - byte/UTF-16 offset conversion and line iteration

mod offsets;
mod types;

pub use offsets::{SourceLine, SourceLines, Utf16Index, source_lines, utf16_len};
pub(crate) use offsets::to_u32;
pub use types::{Annotation, CalloutKind, SyntaxKind, TextColor, TextRange, TextStyle};
