//! String-literal and embedded-expression scanner.
//!
//! Walks sanitized text (comments already blanked) and reports two range
//! sets: string literals (including their quotes) and the embedded-expression
//! spans opened and closed by the interpolation delimiter inside those
//! literals. An unterminated string or embedded expression extends to the end
//! of the scanned text.

use crate::document::{Range, TextDocument};
use crate::scan::{StringContext, StringEvent};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringScan {
    /// String literal spans, quotes included, in document order.
    pub string_ranges: Vec<Range>,
    /// Embedded-expression spans (delimiters excluded), in document order.
    pub embedded_ranges: Vec<Range>,
}

/// Scan `sanitized` (same length as the document text) for string literals
/// and embedded expressions, optionally restricted to `restrict`.
pub fn string_ranges(
    document: &TextDocument,
    sanitized: &str,
    restrict: Option<&Range>,
) -> StringScan {
    let scan_range = match restrict {
        Some(range) if document.validate_range(range) => range.clone(),
        _ => document.full_range(),
    };
    let base = scan_range.span.start;
    let end = scan_range.span.end.min(sanitized.len());
    let slice = &sanitized[base..end];

    let mut scan = StringScan::default();
    let mut ctx = StringContext::default();
    let mut string_start = base;
    let mut embedded_start = base;

    for (idx, ch) in slice.char_indices() {
        let offset = base + idx;
        match ctx.advance(ch) {
            StringEvent::Entered => string_start = offset,
            StringEvent::Exited => {
                scan.string_ranges
                    .push(document.range_at(string_start..offset + ch.len_utf8()));
            }
            StringEvent::EmbeddedOpened => embedded_start = offset + ch.len_utf8(),
            StringEvent::EmbeddedClosed => {
                scan.embedded_ranges
                    .push(document.range_at(embedded_start..offset));
            }
            StringEvent::Ignored => {}
        }
    }

    // unterminated spans run to the end of the scanned text
    if ctx.embedded_escape_active() {
        scan.embedded_ranges.push(document.range_at(embedded_start..end));
    }
    if ctx.in_string() {
        scan.string_ranges.push(document.range_at(string_start..end));
    }
    scan
}
