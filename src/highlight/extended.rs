//! Autolink, footnote and callout recognizers.

use std::sync::LazyLock;

use regex::Regex;

use super::recognizer::ByteMatch;
use crate::document::{CalloutKind, SyntaxKind, source_lines};

static AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"<(?:",
        r"[A-Za-z][A-Za-z0-9+.\-]{1,31}://[^\s<>]+",
        r"|",
        r"[A-Za-z0-9.!#$%&'*+/=?^_`{|}~\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?)*",
        r")>",
    ))
    .unwrap()
});
static FOOTNOTE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\^[^\]\s]+\]").unwrap());
static FOOTNOTE_DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\[\^[^\]\s]+\]:)[ \t]+\S.*$").unwrap());
static CALLOUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}>[ \t]*(\[!([A-Za-z]+)\])").unwrap());

/// `<scheme://...>` and `<local@domain>`, angle brackets included.
pub(crate) fn autolinks(text: &str, out: &mut Vec<ByteMatch>) {
    out.extend(
        AUTOLINK
            .find_iter(text)
            .map(|m| (m.range(), SyntaxKind::Autolink)),
    );
}

/// Footnote references anywhere and definition markers at line start.
///
/// References are not checked against definitions.
pub(crate) fn footnotes(text: &str, out: &mut Vec<ByteMatch>) {
    out.extend(
        FOOTNOTE_REFERENCE
            .find_iter(text)
            .map(|m| (m.range(), SyntaxKind::FootnoteReference)),
    );
    for line in source_lines(text) {
        if !line.text.starts_with("[^") {
            continue;
        }
        if let Some(marker) = FOOTNOTE_DEFINITION
            .captures(line.text)
            .and_then(|caps| caps.get(1))
        {
            out.push((
                line.byte_start + marker.start()..line.byte_start + marker.end(),
                SyntaxKind::FootnoteDefinition,
            ));
        }
    }
}

/// The `[!TYPE]` tag of a blockquote's first line. Unknown types yield nothing.
pub(crate) fn callouts(text: &str, out: &mut Vec<ByteMatch>) {
    for line in source_lines(text) {
        let Some(caps) = CALLOUT.captures(line.text) else {
            continue;
        };
        let (Some(tag), Some(name)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(kind) = CalloutKind::from_marker(name.as_str()) else {
            tracing::trace!(marker = name.as_str(), "unknown callout type");
            continue;
        };
        out.push((
            line.byte_start + tag.start()..line.byte_start + tag.end(),
            SyntaxKind::Callout(kind),
        ));
    }
}
