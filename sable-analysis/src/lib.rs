//! Feature analysis for sable documents.
//!
//! These are the collaborators the context engine (the `sable` crate) feeds:
//! the static language vocabulary, signature-help computation, color support,
//! and documentation-block generation. Everything here is position-in /
//! domain-value-out; protocol wiring lives in `sable-lsp`.

pub mod color;
pub mod docblock;
pub mod signature;
pub mod vocabulary;
