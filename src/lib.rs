//! # sable
//!
//! Lexical context engine for the sable templating language.
//!
//! Sable documents mix tag markup with script code (inside
//! `<sablescript>` containers or in standalone `.sbs` script files) and
//! string literals with `#expr#` interpolation. Editor features such as
//! signature help, color decoration, and documentation-block generation all
//! need one question answered cheaply and robustly: *what is the text at
//! this offset?*
//! A comment, a string, embedded code, a script region, or plain markup.
//!
//! This crate answers that question without building a syntax tree. A set of
//! cooperating single-pass scanners classifies document spans, a pair-balance
//! tracker finds matching delimiters around a cursor, and a backward iterator
//! locates the enclosing call. Everything is a synchronous re-scan per call
//! against one immutable document snapshot, and every scanner degrades to
//! "no match" on malformed in-progress edits instead of failing.
//!
//! The typical entry points are [`context::document_state_context`] and
//! [`context::document_position_state_context`]; the feature crates
//! (`sable-analysis`, `sable-lsp`) build on the contexts they return.

pub mod backward;
pub mod balance;
pub mod context;
pub mod document;
pub mod scan;
pub mod syntax;

pub use context::{
    document_position_state_context, document_state_context, DocumentPositionStateContext,
    DocumentStateContext,
};
pub use document::{LineIndex, Position, Range, TextDocument};
