//! Pair-balance tracking: forward scans over sanitized text that find a
//! matching closing character or the next un-nested occurrence of a target
//! character.
//!
//! Both scans honor string context: a bracket inside a string literal never
//! counts, and the interpolation delimiter toggles the embedded escape rather
//! than nesting. Not-found is an ordinary outcome, never an error.

use crate::context::DocumentStateContext;
use crate::document::Position;
use crate::scan::StringContext;
use crate::syntax::{character_pair, is_string_delimiter, CharacterPair, BRACKET_PAIRS};

/// Find the position immediately after the closer matching `closing_char`,
/// scanning forward from `start_offset` (normally the offset just past the
/// opening character). Tracks nesting for that one pair only.
///
/// Returns `None` when `closing_char` is not a recognized closer or the scan
/// exhausts the document.
pub fn closing_position(
    ctx: &DocumentStateContext<'_>,
    start_offset: usize,
    closing_char: char,
) -> Option<Position> {
    let text = &ctx.sanitized_document_text;
    let pair = character_pair(closing_char)?;
    let start = clamp_to_boundary(text, start_offset);

    let mut string_ctx = StringContext::default();
    let mut unclosed = 0usize;
    for (idx, ch) in text[start..].char_indices() {
        let offset = start + idx;
        if string_ctx.in_string() || is_string_delimiter(ch) {
            string_ctx.advance(ch);
        } else if ch == pair.opening {
            unclosed += 1;
        } else if ch == closing_char {
            if unclosed > 0 {
                unclosed -= 1;
            } else {
                return Some(ctx.document.position_at(offset + ch.len_utf8()));
            }
        }
    }
    None
}

/// Find the next occurrence of `target_char` between `start_offset` and
/// `end_offset` that is not nested inside any unmatched brace, bracket, or
/// paren (the pair containing the target itself, if any, is exempt).
///
/// Returns the target's position (or the position just after it when
/// `include_char`), or the position at `end_offset` when no un-nested
/// occurrence exists.
pub fn next_character_position(
    ctx: &DocumentStateContext<'_>,
    start_offset: usize,
    end_offset: usize,
    target_char: char,
    include_char: bool,
) -> Position {
    let text = &ctx.sanitized_document_text;
    let start = clamp_to_boundary(text, start_offset);
    let end = clamp_to_boundary(text, end_offset.max(start));
    let exempt: Option<CharacterPair> = character_pair(target_char);

    let mut string_ctx = StringContext::default();
    let mut unclosed = [0usize; BRACKET_PAIRS.len()];
    for (idx, ch) in text[start..end].char_indices() {
        let offset = start + idx;
        if string_ctx.in_string() || is_string_delimiter(ch) {
            string_ctx.advance(ch);
            continue;
        }
        if ch == target_char && unclosed.iter().all(|&depth| depth == 0) {
            let at = if include_char { offset + ch.len_utf8() } else { offset };
            return ctx.document.position_at(at);
        }
        for (slot, pair) in BRACKET_PAIRS.iter().enumerate() {
            if exempt == Some(*pair) {
                continue;
            }
            if ch == pair.opening {
                unclosed[slot] += 1;
            } else if ch == pair.closing {
                // tolerate unbalanced input
                unclosed[slot] = unclosed[slot].saturating_sub(1);
            }
        }
    }
    ctx.document.position_at(end)
}

fn clamp_to_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::document_state_context;
    use crate::document::TextDocument;

    fn ctx_for(text: &str) -> TextDocument {
        TextDocument::new("sable-script", 0, text)
    }

    #[test]
    fn finds_matching_brace_through_nesting() {
        let doc = ctx_for("{ a { b } c } tail");
        let ctx = document_state_context(&doc, false);
        // scanning starts just past the opening brace
        let pos = closing_position(&ctx, 1, '}').unwrap();
        assert_eq!(doc.offset_at(pos), 13);
    }

    #[test]
    fn ignores_brackets_inside_strings() {
        let doc = ctx_for(r#"(a, ")", b)"#);
        let ctx = document_state_context(&doc, false);
        let pos = closing_position(&ctx, 1, ')').unwrap();
        assert_eq!(doc.offset_at(pos), doc.len());
    }

    #[test]
    fn embedded_escape_keeps_the_string_open() {
        // the quote inside #...# must not end the string early
        let doc = ctx_for(r##"(a, "x#q(")")#y", b)"##);
        let ctx = document_state_context(&doc, false);
        let pos = closing_position(&ctx, 1, ')').unwrap();
        assert_eq!(doc.offset_at(pos), doc.len());
    }

    #[test]
    fn not_found_is_none() {
        let doc = ctx_for("( open forever");
        let ctx = document_state_context(&doc, false);
        assert_eq!(closing_position(&ctx, 1, ')'), None);
        assert_eq!(closing_position(&ctx, 1, '?'), None);
    }

    #[test]
    fn skips_nested_commas() {
        let text = "foo(bar(1,2), 3)";
        let doc = ctx_for(text);
        let ctx = document_state_context(&doc, false);
        // bounded to the outer parens: offsets 4..15
        let pos = next_character_position(&ctx, 4, 15, ',', false);
        assert_eq!(doc.offset_at(pos), 12);
        assert_eq!(&text[12..13], ",");
    }

    #[test]
    fn include_char_returns_the_following_position() {
        let doc = ctx_for("a, b");
        let ctx = document_state_context(&doc, false);
        let pos = next_character_position(&ctx, 0, 4, ',', true);
        assert_eq!(doc.offset_at(pos), 2);
    }

    #[test]
    fn exhausted_scan_returns_the_end_position() {
        let doc = ctx_for("foo([1,2])");
        let ctx = document_state_context(&doc, false);
        // every comma is nested inside the bracket pair
        let pos = next_character_position(&ctx, 4, 9, ',', false);
        assert_eq!(doc.offset_at(pos), 9);
    }

    #[test]
    fn target_pair_is_exempt_from_its_own_nesting() {
        let text = "foo(a) )";
        let doc = ctx_for(text);
        let ctx = document_state_context(&doc, false);
        // searching for ')' never counts paren nesting against itself
        let pos = next_character_position(&ctx, 4, text.len(), ')', false);
        assert_eq!(doc.offset_at(pos), 5);
    }

    #[test]
    fn comments_are_blanked_before_balancing() {
        let text = "{ /* } */ }";
        let doc = ctx_for(text);
        let ctx = document_state_context(&doc, false);
        let pos = closing_position(&ctx, 1, '}').unwrap();
        assert_eq!(doc.offset_at(pos), text.len());
    }
}
