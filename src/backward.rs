//! Backward iteration over sanitized text.
//!
//! [`BackwardIterator`] is the primitive for locating enclosing syntactic
//! boundaries from a cursor: it steps back one character at a time through
//! the comment-blanked text, so comment contents never influence the walk.
//! [`start_signature_position`] builds on it to find the opening paren of the
//! enclosing call, skipping any fully matched inner groups and string bodies
//! it walks over.

use crate::context::DocumentStateContext;
use crate::document::Position;
use crate::syntax::is_string_delimiter;

/// A cursor that walks backward through sanitized document text.
#[derive(Debug, Clone)]
pub struct BackwardIterator<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> BackwardIterator<'a> {
    /// Start at `position` in the context's sanitized text.
    pub fn new(ctx: &'a DocumentStateContext<'_>, position: Position) -> Self {
        Self::from_offset(&ctx.sanitized_document_text, ctx.document.offset_at(position))
    }

    pub fn from_offset(text: &'a str, offset: usize) -> Self {
        let mut offset = offset.min(text.len());
        while offset > 0 && !text.is_char_boundary(offset) {
            offset -= 1;
        }
        Self { text, offset }
    }

    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    /// Step back one character and return it; `None` at the start of text.
    pub fn previous(&mut self) -> Option<char> {
        let ch = self.text[..self.offset].chars().next_back()?;
        self.offset -= ch.len_utf8();
        Some(ch)
    }

    /// Offset of the character most recently returned by `previous`.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Walk backward from `position` to the opening paren of the enclosing call.
///
/// Inner fully matched paren/bracket/brace groups encountered on the way are
/// skipped, as are string bodies. A statement terminator at depth zero is a
/// hard boundary: there is no enclosing call. An unmatched opening brace is
/// stepped over, since a struct-literal argument may still be open at the
/// cursor (`foo({key`).
pub fn start_signature_position(
    ctx: &DocumentStateContext<'_>,
    position: Position,
) -> Option<Position> {
    let mut iter = BackwardIterator::new(ctx, position);
    let mut paren_depth = 0usize;
    let mut bracket_depth = 0usize;
    let mut brace_depth = 0usize;

    while let Some(ch) = iter.previous() {
        if is_string_delimiter(ch) {
            // skip the string body back to its opening quote
            while let Some(inner) = iter.previous() {
                if inner == ch {
                    break;
                }
            }
            continue;
        }
        match ch {
            ')' => paren_depth += 1,
            '(' => {
                if paren_depth == 0 {
                    return Some(ctx.document.position_at(iter.offset()));
                }
                paren_depth -= 1;
            }
            ']' => bracket_depth += 1,
            '[' => bracket_depth = bracket_depth.saturating_sub(1),
            '}' => brace_depth += 1,
            '{' => brace_depth = brace_depth.saturating_sub(1),
            ';' if paren_depth == 0 && bracket_depth == 0 && brace_depth == 0 => {
                return None;
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::document_state_context;
    use crate::document::TextDocument;

    fn script_doc(text: &str) -> TextDocument {
        TextDocument::new("sable-script", 0, text)
    }

    fn sig_offset(text: &str, cursor: usize) -> Option<usize> {
        let doc = script_doc(text);
        let ctx = document_state_context(&doc, false);
        start_signature_position(&ctx, doc.position_at(cursor)).map(|p| doc.offset_at(p))
    }

    #[test]
    fn steps_backward_over_characters() {
        let doc = script_doc("abc");
        let ctx = document_state_context(&doc, false);
        let mut iter = BackwardIterator::new(&ctx, doc.position_at(3));
        assert!(iter.has_previous());
        assert_eq!(iter.previous(), Some('c'));
        assert_eq!(iter.offset(), 2);
        assert_eq!(iter.previous(), Some('b'));
        assert_eq!(iter.previous(), Some('a'));
        assert!(!iter.has_previous());
        assert_eq!(iter.previous(), None);
    }

    #[test]
    fn finds_the_enclosing_paren() {
        //        0123456789
        let text = "foo(1, ba";
        assert_eq!(sig_offset(text, text.len()), Some(3));
    }

    #[test]
    fn skips_inner_matched_groups() {
        let text = "foo(bar(1,2), ";
        assert_eq!(sig_offset(text, text.len()), Some(3));
        let text = "foo(a[1], {x: 1}, ";
        assert_eq!(sig_offset(text, text.len()), Some(3));
    }

    #[test]
    fn skips_parens_inside_strings() {
        let text = "foo(\"(((\", ";
        assert_eq!(sig_offset(text, text.len()), Some(3));
    }

    #[test]
    fn open_brace_argument_does_not_end_the_walk() {
        // the struct-literal argument is still unterminated at the cursor
        let text = "foo({key";
        assert_eq!(sig_offset(text, text.len()), Some(3));
    }

    #[test]
    fn statement_terminator_is_a_hard_boundary() {
        assert_eq!(sig_offset("a = b; c", 8), None);
        assert_eq!(sig_offset("if (x) { y", 10), None);
    }

    #[test]
    fn no_enclosing_paren_before_start_of_text() {
        assert_eq!(sig_offset("plain words", 11), None);
    }

    #[test]
    fn comment_contents_never_count() {
        let text = "/* foo( */ bar";
        assert_eq!(sig_offset(text, text.len()), None);
    }
}
