//! Comment-range scanner.
//!
//! Two interchangeable strategies behind one entry point:
//!
//! - [`comment_ranges_regex`]: fast and approximate. Independent global
//!   regex passes per comment flavor, recursing into script regions to apply
//!   script comment patterns there. It does not track string context, so a
//!   comment-like sequence inside a string literal is a known false positive.
//! - [`comment_ranges_iterated`]: the reference. A single character walk
//!   with simultaneous comment and string state machines, switching between
//!   tag and script comment syntax at script-region boundaries. Tag-style
//!   comments never open inside a script region, and a script comment never
//!   extends past the end of the region it opened in.
//!
//! Both produce ordered, non-overlapping range lists and never fail on
//! malformed input; an unterminated comment extends to the end of the
//! scanned text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Range, TextDocument};
use crate::scan::StringContext;
use crate::syntax::{
    is_string_delimiter, SCRIPT_BLOCK_COMMENT, SCRIPT_LINE_COMMENT, TAG_BLOCK_COMMENT,
};

static SCRIPT_BLOCK_COMMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\*[\s\S]*?\*/").unwrap());
static SCRIPT_LINE_COMMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"//[^\r\n]*").unwrap());
static TAG_BLOCK_COMMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--[\s\S]*?-->").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

/// In-progress comment during the iterated walk.
#[derive(Debug, Clone)]
struct ActiveComment {
    kind: CommentKind,
    closer: &'static str,
    start: usize,
    /// First offset past the opener; a block closer may not overlap it.
    content_start: usize,
    /// End of the script region the comment opened in, if any.
    region_end: Option<usize>,
}

/// Scan for comment ranges with the strategy selected by `fast`.
pub fn comment_ranges(
    document: &TextDocument,
    fast: bool,
    script_ranges: &[Range],
    restrict: Option<&Range>,
) -> Vec<Range> {
    if fast {
        comment_ranges_regex(document, script_ranges, restrict)
    } else {
        comment_ranges_iterated(document, script_ranges, restrict)
    }
}

fn resolve_scan_range(document: &TextDocument, restrict: Option<&Range>) -> Range {
    match restrict {
        Some(range) if document.validate_range(range) => range.clone(),
        _ => document.full_range(),
    }
}

/// Sort spans and drop any span overlapping an earlier one, producing an
/// ordered non-overlapping range list.
fn to_ordered_ranges(document: &TextDocument, mut spans: Vec<std::ops::Range<usize>>) -> Vec<Range> {
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    let mut out: Vec<Range> = Vec::new();
    for span in spans {
        if let Some(last) = out.last() {
            if span.start < last.span.end {
                continue;
            }
        }
        out.push(document.range_at(span));
    }
    out
}

fn script_comment_spans(slice: &str, base: usize, out: &mut Vec<std::ops::Range<usize>>) {
    for m in SCRIPT_BLOCK_COMMENT_PATTERN.find_iter(slice) {
        out.push(base + m.start()..base + m.end());
    }
    for m in SCRIPT_LINE_COMMENT_PATTERN.find_iter(slice) {
        out.push(base + m.start()..base + m.end());
    }
}

/// Fast, string-unaware strategy.
pub fn comment_ranges_regex(
    document: &TextDocument,
    script_ranges: &[Range],
    restrict: Option<&Range>,
) -> Vec<Range> {
    let scan_range = resolve_scan_range(document, restrict);
    let base = scan_range.span.start;
    let end = scan_range.span.end;
    let slice = document.get_text_range(&scan_range);

    let mut spans = Vec::new();
    if document.is_script_document() {
        script_comment_spans(slice, base, &mut spans);
    } else {
        for m in TAG_BLOCK_COMMENT_PATTERN.find_iter(slice) {
            let span = base + m.start()..base + m.end();
            // tag comment syntax does not apply inside script regions
            if script_ranges.iter().any(|r| r.contains_range(&document.range_at(span.clone()))) {
                continue;
            }
            spans.push(span);
        }
        for region in script_ranges {
            let region_start = region.span.start.max(base);
            let region_end = region.span.end.min(end);
            if region_start >= region_end {
                continue;
            }
            script_comment_spans(
                &document.text()[region_start..region_end],
                region_start,
                &mut spans,
            );
        }
    }
    to_ordered_ranges(document, spans)
}

fn script_region_end_at(script_ranges: &[Range], offset: usize) -> Option<usize> {
    script_ranges
        .iter()
        .find(|r| r.span.start <= offset && offset < r.span.end)
        .map(|r| r.span.end)
}

/// Accurate, string-aware strategy; ground truth for the fast path.
pub fn comment_ranges_iterated(
    document: &TextDocument,
    script_ranges: &[Range],
    restrict: Option<&Range>,
) -> Vec<Range> {
    let scan_range = resolve_scan_range(document, restrict);
    let base = scan_range.span.start;
    let end = scan_range.span.end;
    let text = document.text();
    let doc_is_script = document.is_script_document();

    let mut out = Vec::new();
    let mut string_ctx = StringContext::default();
    let mut active: Option<ActiveComment> = None;

    for (idx, ch) in text[base..end].char_indices() {
        let offset = base + idx;
        let next = offset + ch.len_utf8();

        // a script comment closes, at the latest, with its region
        if let Some(comment) = &active {
            if let Some(region_end) = comment.region_end {
                if offset >= region_end {
                    out.push(document.range_at(comment.start..region_end));
                    active = None;
                }
            }
        }

        if let Some(comment) = &active {
            let closed_at = match comment.kind {
                CommentKind::Line => (ch == '\n').then_some(offset),
                CommentKind::Block => (text[..next].ends_with(comment.closer)
                    && next - comment.closer.len() >= comment.content_start)
                    .then_some(next),
            };
            if let Some(close) = closed_at {
                out.push(document.range_at(comment.start..close));
                active = None;
            }
            continue;
        }

        if string_ctx.in_string() || is_string_delimiter(ch) {
            string_ctx.advance(ch);
            continue;
        }

        let region_end = script_region_end_at(script_ranges, offset);
        let script_mode = doc_is_script || region_end.is_some();
        let window = &text[..next];
        let opened = if script_mode {
            if window.ends_with(SCRIPT_BLOCK_COMMENT.0) {
                Some((CommentKind::Block, SCRIPT_BLOCK_COMMENT))
            } else if window.ends_with(SCRIPT_LINE_COMMENT) {
                Some((CommentKind::Line, (SCRIPT_LINE_COMMENT, "\n")))
            } else {
                None
            }
        } else if window.ends_with(TAG_BLOCK_COMMENT.0) {
            Some((CommentKind::Block, TAG_BLOCK_COMMENT))
        } else {
            None
        };

        if let Some((kind, (opener, closer))) = opened {
            let start = next - opener.len();
            if start >= base {
                active = Some(ActiveComment {
                    kind,
                    closer,
                    start,
                    content_start: next,
                    region_end,
                });
            }
        }
    }

    // unterminated comment runs to the end of the scanned text
    if let Some(comment) = active {
        let close = comment.region_end.map_or(end, |e| e.min(end));
        out.push(document.range_at(comment.start..close));
    }
    out
}
