//! Document model: positions, ranges, and the text-document abstraction
//!
//! Every scanner in this crate works over byte offsets into one immutable
//! document snapshot and reports results as [`Range`] values carrying both the
//! byte span and the line/column positions. Conversion between the two is done
//! by [`LineIndex`], which precomputes line start offsets once per document
//! and answers `position_at` queries with a binary search.
//!
//! Positions are only meaningful against the document version they were
//! computed from. After an edit, callers rebuild the whole context; nothing
//! here is updated incrementally.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position in a document (0-based line and byte column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// A contiguous span of document text: the byte span plus its start and end
/// positions. Invariant: `span.start <= span.end` and `start <= end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub span: std::ops::Range<usize>,
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(span: std::ops::Range<usize>, start: Position, end: Position) -> Self {
        debug_assert!(span.start <= span.end, "invalid span {}..{}", span.start, span.end);
        Self { span, start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Inclusive containment in document order.
    pub fn contains(&self, pos: Position) -> bool {
        (self.start.line < pos.line
            || (self.start.line == pos.line && self.start.column <= pos.column))
            && (self.end.line > pos.line
                || (self.end.line == pos.line && self.end.column >= pos.column))
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        self.span.start <= offset && offset <= self.span.end
    }

    pub fn contains_range(&self, other: &Range) -> bool {
        self.span.start <= other.span.start && other.span.end <= self.span.end
    }

    pub fn overlaps(&self, other: &Range) -> bool {
        self.span.start < other.span.end && other.span.start < self.span.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Fast byte offset to line/column conversion.
///
/// Precomputes the byte offset of every line start; `position_at` is then an
/// O(log n) binary search.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (byte_pos, ch) in text.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);
        Position::new(line, offset - self.line_starts[line])
    }

    /// Best-effort inverse of `position_at`; out-of-bounds positions clamp to
    /// the end of the line or document.
    pub fn offset_at(&self, position: Position) -> usize {
        let Some(&line_start) = self.line_starts.get(position.line) else {
            return self.len;
        };
        let line_end = self
            .line_starts
            .get(position.line + 1)
            .copied()
            .unwrap_or(self.len);
        (line_start + position.column).min(line_end)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn range_at(&self, span: std::ops::Range<usize>) -> Range {
        Range::new(
            span.clone(),
            self.position_at(span.start),
            self.position_at(span.end),
        )
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }
}

/// True for the characters that can appear in a sable identifier.
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// One immutable snapshot of an open document.
#[derive(Debug, Clone)]
pub struct TextDocument {
    language_id: String,
    version: i32,
    text: String,
    line_index: LineIndex,
}

impl TextDocument {
    pub fn new(language_id: impl Into<String>, version: i32, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        Self {
            language_id: language_id.into(),
            version,
            text,
            line_index,
        }
    }

    /// A tag-mode document with no particular identity; used by the CLI and
    /// by tests.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new("sable", 0, text)
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether the document's top-level content uses script syntax rather
    /// than tag syntax. Driven by the language id, never by content sniffing.
    pub fn is_script_document(&self) -> bool {
        self.language_id == "sable-script"
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn position_at(&self, offset: usize) -> Position {
        self.line_index.position_at(offset)
    }

    pub fn offset_at(&self, position: Position) -> usize {
        let mut offset = self.line_index.offset_at(position);
        // byte columns can land inside a multibyte character; snap down
        while offset > 0 && !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    pub fn range_at(&self, span: std::ops::Range<usize>) -> Range {
        self.line_index.range_at(span)
    }

    pub fn full_range(&self) -> Range {
        self.range_at(0..self.text.len())
    }

    pub fn get_text_range(&self, range: &Range) -> &str {
        &self.text[range.span.start.min(self.text.len())..range.span.end.min(self.text.len())]
    }

    /// Caller-misuse check for range-taking entry points. An invalid range is
    /// never an error; callers fall back to scanning the whole document.
    pub fn validate_range(&self, range: &Range) -> bool {
        range.span.start <= range.span.end
            && range.span.end <= self.text.len()
            && self.text.is_char_boundary(range.span.start)
            && self.text.is_char_boundary(range.span.end)
    }

    /// The identifier word span around a position, if any.
    pub fn word_range_at(&self, position: Position) -> Option<Range> {
        let offset = self.offset_at(position);
        let mut start = offset;
        for (idx, ch) in self.text[..offset].char_indices().rev() {
            if !is_word_char(ch) {
                break;
            }
            start = idx;
        }
        let mut end = offset;
        for (idx, ch) in self.text[offset..].char_indices() {
            if !is_word_char(ch) {
                break;
            }
            end = offset + idx + ch.len_utf8();
        }
        if start == end {
            None
        } else {
            Some(self.range_at(start..end))
        }
    }

    pub fn word_at(&self, position: Position) -> Option<&str> {
        self.word_range_at(position)
            .map(|range| &self.text[range.span])
    }
}
