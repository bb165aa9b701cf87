// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. table::TableAlignment)
    clippy::module_name_repetitions
)]

//! # notemark
//!
//! The interactive Markdown document model behind a note editor.
//!
//! Given the full text of a note, notemark derives:
//! - Syntax annotations for live highlighting (headings, emphasis, code,
//!   links, lists, task checkboxes, tables, autolinks, footnotes, callouts)
//! - A structured view of task lists with a checkbox toggle
//! - Editable GFM tables that serialize back to Markdown
//!
//! ## Architecture
//!
//! Nothing structural outlives an edit. Every model is recomputed from the
//! current text on demand; edits go through [`editor::TextBuffer`] and the
//! caller re-derives afterwards. All offsets are UTF-16 code units.
//!
//! ## Modules
//!
//! - [`document`]: Ranges, annotations and offset mapping
//! - [`highlight`]: Recognizers, conflict resolution and the cached pipeline
//! - [`tasks`]: Task-list model and checkbox toggling
//! - [`table`]: Table model, structural edits and serialization
//! - [`editor`]: Text buffers edits are applied to
//! - [`config`]: Output options shared by the CLI commands
//! - [`perf`]: Timing scopes

pub mod config;
pub mod document;
pub mod editor;
pub mod highlight;
pub mod perf;
pub mod table;
pub mod tasks;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::document::{Annotation, SyntaxKind, TextRange, TextStyle};
    pub use crate::editor::{EditorBuffer, TextBuffer};
    pub use crate::highlight::{Highlighter, Palette};
    pub use crate::table::{MarkdownTable, TableAlignment};
    pub use crate::tasks::{TaskItem, TaskList, TaskStatistics};
}
