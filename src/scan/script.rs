//! Script-region scanner.
//!
//! Finds every `<sablescript ...> body </sablescript>` occurrence
//! (case-insensitive) and reports a range covering exactly the body text,
//! excluding the surrounding tag markup. Empty bodies are skipped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Range, TextDocument};
use crate::syntax::SCRIPT_TAG_NAME;

static SCRIPT_TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?is)<{tag}(?:\s[^>]*)?>(.*?)</{tag}\s*>",
        tag = SCRIPT_TAG_NAME
    ))
    .unwrap()
});

/// Script-container body ranges within `restrict`, or the whole document when
/// `restrict` is absent or invalid.
pub fn script_ranges(document: &TextDocument, restrict: Option<&Range>) -> Vec<Range> {
    let scan_range = match restrict {
        Some(range) if document.validate_range(range) => range.clone(),
        _ => document.full_range(),
    };
    let base = scan_range.span.start;
    let slice = document.get_text_range(&scan_range);

    let mut ranges = Vec::new();
    for caps in SCRIPT_TAG_PATTERN.captures_iter(slice) {
        let Some(body) = caps.get(1) else { continue };
        if body.as_str().is_empty() {
            continue;
        }
        ranges.push(document.range_at(base + body.start()..base + body.end()));
    }
    ranges
}
