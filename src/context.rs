//! Document and position state-context composition.
//!
//! One [`DocumentStateContext`] bundles everything the downstream features
//! need from a single scan pass over one document snapshot: the three range
//! sets and the sanitized text. It is rebuilt per call; nothing is updated
//! across document versions.
//!
//! The sanitized text is a same-length copy of the document text in which
//! every non-whitespace byte inside a comment range is blanked to a space.
//! Blanking is byte-for-byte, so every offset and position computed against
//! the original text stays valid against the sanitized text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Position, Range, TextDocument};
use crate::scan::{comment, script, string};

/// Matches a prefix that ends mid-expression: a trailing identifier
/// character, or a member-access dot possibly followed by whitespace.
static CONTINUING_EXPRESSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[\w$]|\.\s*)$").unwrap());

/// Per-call snapshot of a document's lexical regions.
#[derive(Debug, Clone)]
pub struct DocumentStateContext<'a> {
    pub document: &'a TextDocument,
    pub doc_is_script: bool,
    pub comment_ranges: Vec<Range>,
    pub string_ranges: Vec<Range>,
    pub embedded_ranges: Vec<Range>,
    pub script_ranges: Vec<Range>,
    pub sanitized_document_text: String,
}

impl<'a> DocumentStateContext<'a> {
    pub fn position_in_comment(&self, position: Position) -> bool {
        self.comment_ranges.iter().any(|r| r.contains(position))
    }

    pub fn position_in_string(&self, position: Position) -> bool {
        self.string_ranges.iter().any(|r| r.contains(position))
    }

    pub fn position_in_embedded_expression(&self, position: Position) -> bool {
        self.embedded_ranges.iter().any(|r| r.contains(position))
    }

    /// Script mode at a position: a script document everywhere, or inside a
    /// script region of a tag document.
    pub fn position_is_script(&self, position: Position) -> bool {
        self.doc_is_script || self.script_ranges.iter().any(|r| r.contains(position))
    }
}

/// Blank every non-whitespace byte inside the comment ranges to a space.
/// Whitespace (newlines, tabs) is kept so line structure survives.
fn sanitize(text: &str, comment_ranges: &[Range]) -> String {
    let mut bytes = text.as_bytes().to_vec();
    for range in comment_ranges {
        let span = range.span.start.min(bytes.len())..range.span.end.min(bytes.len());
        for byte in &mut bytes[span] {
            if !byte.is_ascii_whitespace() {
                *byte = b' ';
            }
        }
    }
    // comment spans sit on char boundaries and everything blanked became
    // ASCII, so this cannot fail; fall back to the original regardless
    String::from_utf8(bytes).unwrap_or_else(|_| text.to_string())
}

/// Run the region scanners once and assemble the state context.
///
/// `fast` selects the regex comment strategy instead of the iterated one.
pub fn document_state_context(document: &TextDocument, fast: bool) -> DocumentStateContext<'_> {
    let doc_is_script = document.is_script_document();
    let script_ranges = if doc_is_script {
        Vec::new()
    } else {
        script::script_ranges(document, None)
    };
    let comment_ranges = comment::comment_ranges(document, fast, &script_ranges, None);
    let sanitized_document_text = sanitize(document.text(), &comment_ranges);
    let strings = string::string_ranges(document, &sanitized_document_text, None);

    DocumentStateContext {
        document,
        doc_is_script,
        comment_ranges,
        string_ranges: strings.string_ranges,
        embedded_ranges: strings.embedded_ranges,
        script_ranges,
        sanitized_document_text,
    }
}

/// A [`DocumentStateContext`] extended with cursor-position facts.
#[derive(Debug, Clone)]
pub struct DocumentPositionStateContext<'a> {
    pub state: DocumentStateContext<'a>,
    pub position: Position,
    pub offset: usize,
    pub position_in_comment: bool,
    pub position_in_string: bool,
    pub position_is_script: bool,
    /// The identifier word the cursor touches, or empty.
    pub current_word: String,
    /// Byte offset where `current_word` begins (the cursor offset when there
    /// is no word).
    pub word_start: usize,
    /// Whether the text before the word continues an expression
    /// (`a.b.` → the next token chains onto it).
    pub is_continuing_expression: bool,
}

impl<'a> DocumentPositionStateContext<'a> {
    /// Sanitized text preceding the current word.
    pub fn word_prefix(&self) -> &str {
        &self.state.sanitized_document_text[..self.word_start]
    }
}

/// Build the position-extended context: base context fields plus derived
/// cursor facts, composed into a fresh struct.
pub fn document_position_state_context(
    document: &TextDocument,
    position: Position,
    fast: bool,
) -> DocumentPositionStateContext<'_> {
    let state = document_state_context(document, fast);
    let offset = document.offset_at(position);
    let word_range = document.word_range_at(position);
    let word_start = word_range.as_ref().map_or(offset, |r| r.span.start);
    let current_word = word_range
        .map(|r| document.text()[r.span].to_string())
        .unwrap_or_default();
    let position_in_comment = state.position_in_comment(position);
    let position_in_string = state.position_in_string(position);
    let position_is_script = state.position_is_script(position);
    let is_continuing_expression =
        CONTINUING_EXPRESSION_PATTERN.is_match(&state.sanitized_document_text[..word_start]);

    DocumentPositionStateContext {
        state,
        position,
        offset,
        position_in_comment,
        position_in_string,
        position_is_script,
        current_word,
        word_start,
        is_continuing_expression,
    }
}
