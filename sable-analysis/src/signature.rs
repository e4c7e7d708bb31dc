//! Signature-help computation.
//!
//! From a cursor position, walk backward to the opening paren of the
//! enclosing call, read the callee identifier, and count the un-nested
//! commas between the paren and the cursor to find the active parameter.
//! Declines inside comments and inside plain string text (an embedded
//! expression within a string is still live code).

use sable::backward::start_signature_position;
use sable::balance::{closing_position, next_character_position};
use sable::context::{DocumentPositionStateContext, DocumentStateContext};
use sable::document::{is_word_char, Position};

use crate::vocabulary::{function, FunctionSignature};

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureContext {
    pub callee: String,
    pub open_paren: Position,
    pub active_parameter: u32,
    pub signature: Option<&'static FunctionSignature>,
}

/// Signature facts for the call enclosing the cursor, or `None` when there
/// is no enclosing call or the cursor is not in live code.
pub fn signature_context(ctx: &DocumentPositionStateContext<'_>) -> Option<SignatureContext> {
    if ctx.position_in_comment {
        return None;
    }
    if ctx.position_in_string && !ctx.state.position_in_embedded_expression(ctx.position) {
        return None;
    }

    let open_paren = start_signature_position(&ctx.state, ctx.position)?;
    let open_offset = ctx.state.document.offset_at(open_paren);
    let callee = callee_before(&ctx.state.sanitized_document_text, open_offset)?;
    let active_parameter = count_separators(&ctx.state, open_offset + 1, ctx.offset);
    let signature = function(&callee);

    Some(SignatureContext {
        callee,
        open_paren,
        active_parameter,
        signature,
    })
}

/// The identifier immediately before an opening paren, if any.
fn callee_before(sanitized: &str, open_offset: usize) -> Option<String> {
    let end = sanitized[..open_offset].trim_end().len();
    let start = sanitized[..end]
        .char_indices()
        .rev()
        .take_while(|(_, ch)| is_word_char(*ch))
        .last()
        .map(|(idx, _)| idx)?;
    Some(sanitized[start..end].to_string())
}

/// Count un-nested commas between `from` and `until`.
///
/// An exhausted scan returns the position at `until`, which is never a
/// separator: the byte there may be a comma nested inside an unclosed
/// bracket, so only offsets strictly before `until` count.
fn count_separators(state: &DocumentStateContext<'_>, from: usize, until: usize) -> u32 {
    let mut count = 0;
    let mut cursor = from;
    while cursor < until {
        let pos = next_character_position(state, cursor, until, ',', false);
        let offset = state.document.offset_at(pos);
        if offset >= until || !state.sanitized_document_text[offset..].starts_with(',') {
            break;
        }
        count += 1;
        cursor = offset + 1;
    }
    count
}

/// Parameter names of the declaration whose parameter list opens at
/// `open_offset` (the offset of the `(`). Empty on malformed input.
pub fn parameter_names(state: &DocumentStateContext<'_>, open_offset: usize) -> Vec<String> {
    let text = &state.sanitized_document_text;
    let list_start = open_offset + 1;
    let list_end = match closing_position(state, list_start, ')') {
        Some(pos) => state.document.offset_at(pos).saturating_sub(1),
        None => text.len(),
    };
    if list_end <= list_start {
        return Vec::new();
    }

    let mut names = Vec::new();
    let mut cursor = list_start;
    loop {
        let pos = next_character_position(state, cursor, list_end, ',', false);
        let segment_end = state.document.offset_at(pos);
        if let Some(name) = first_word(&text[cursor..segment_end]) {
            names.push(name);
        }
        if segment_end >= list_end {
            break;
        }
        cursor = segment_end + 1;
    }
    names
}

/// First identifier token of a parameter segment (sable parameters are bare
/// names, optionally followed by `= default`).
fn first_word(segment: &str) -> Option<String> {
    let mut words = segment
        .split(|ch: char| !is_word_char(ch))
        .filter(|w| !w.is_empty());
    let first = words.next()?;
    Some(first.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable::context::{document_position_state_context, document_state_context};
    use sable::document::TextDocument;

    fn ctx_at(text: &str, line: usize, column: usize) -> Option<SignatureContext> {
        let doc = TextDocument::new("sable-script", 0, text);
        let ctx = document_position_state_context(&doc, Position::new(line, column), false);
        signature_context(&ctx)
    }

    #[test]
    fn finds_the_enclosing_call_and_active_parameter() {
        //          0123456789012345
        let text = "find(needle, hay";
        let sig = ctx_at(text, 0, 16).unwrap();
        assert_eq!(sig.callee, "find");
        assert_eq!(sig.active_parameter, 1);
        assert_eq!(sig.signature.unwrap().name, "find");
    }

    #[test]
    fn inner_calls_do_not_affect_the_outer_count() {
        let text = "replace(find(a, b), c, ";
        let sig = ctx_at(text, 0, text.len()).unwrap();
        assert_eq!(sig.callee, "replace");
        assert_eq!(sig.active_parameter, 2);
    }

    #[test]
    fn cursor_inside_the_inner_call() {
        let text = "replace(find(a, ";
        let sig = ctx_at(text, 0, text.len()).unwrap();
        assert_eq!(sig.callee, "find");
        assert_eq!(sig.active_parameter, 1);
    }

    #[test]
    fn comma_nested_in_an_unclosed_bracket_is_not_a_separator() {
        // typing "," inside a bracket argument retriggers signature help;
        // the comma just before the cursor belongs to the bracket, not
        // to the call
        let sig = ctx_at("f([a,", 0, 5).unwrap();
        assert_eq!(sig.callee, "f");
        assert_eq!(sig.active_parameter, 0);
    }

    #[test]
    fn declines_inside_comments() {
        let text = "// foo(\nbar(1)";
        assert!(ctx_at(text, 0, 6).is_none());
        // the real code below still gets help
        let sig = ctx_at(text, 1, 4).unwrap();
        assert_eq!(sig.callee, "bar");
        assert!(sig.signature.is_none());
    }

    #[test]
    fn declines_in_plain_string_text_but_not_embedded_expressions() {
        let text = "x = \"len( #len( \";";
        assert!(ctx_at(text, 0, 9).is_none());
        let sig = ctx_at(text, 0, 15).unwrap();
        assert_eq!(sig.callee, "len");
    }

    #[test]
    fn unknown_functions_still_get_a_context() {
        let sig = ctx_at("mystery(a, b, ", 0, 14).unwrap();
        assert_eq!(sig.callee, "mystery");
        assert_eq!(sig.active_parameter, 2);
        assert!(sig.signature.is_none());
    }

    #[test]
    fn parameter_name_extraction() {
        let text = "function f(name, count = len(\"a,b\"), flag) {}";
        let doc = TextDocument::new("sable-script", 0, text);
        let state = document_state_context(&doc, false);
        let open = text.find('(').unwrap();
        assert_eq!(parameter_names(&state, open), vec!["name", "count", "flag"]);
    }

    #[test]
    fn parameter_names_tolerate_unclosed_lists() {
        let text = "function f(a, b";
        let doc = TextDocument::new("sable-script", 0, text);
        let state = document_state_context(&doc, false);
        assert_eq!(parameter_names(&state, 10), vec!["a", "b"]);
    }
}
