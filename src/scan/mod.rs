//! Region scanners: single-pass classifiers that walk document text and
//! report comment, string, embedded-expression, and script-region spans.
//!
//! Each scan constructs its state machines fresh on its own stack; nothing is
//! shared or reused across calls. All scanners tolerate malformed input
//! (unterminated strings and comments, unbalanced brackets) by stopping at
//! the text boundary and reporting best-effort spans.

pub mod comment;
pub mod script;
pub mod string;

use crate::syntax::{is_string_delimiter, INTERPOLATION_DELIMITER};

/// What happened when the string state machine consumed one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEvent {
    /// Nothing string-related.
    Ignored,
    /// A string literal opened at this character.
    Entered,
    /// The active string literal closed at this character.
    Exited,
    /// The interpolation delimiter opened an embedded expression.
    EmbeddedOpened,
    /// The interpolation delimiter closed the embedded expression.
    EmbeddedClosed,
}

/// String-literal scanner state.
///
/// `active_delimiter` is `Some` exactly while inside a string. The embedded
/// escape toggles on every interpolation delimiter seen inside a string;
/// while it is active the matching quote does not close the string (the
/// string resumes after the embedded expression closes).
#[derive(Debug, Clone, Default)]
pub struct StringContext {
    active_delimiter: Option<char>,
    embedded_escape_active: bool,
}

impl StringContext {
    pub fn in_string(&self) -> bool {
        self.active_delimiter.is_some()
    }

    pub fn active_delimiter(&self) -> Option<char> {
        self.active_delimiter
    }

    pub fn embedded_escape_active(&self) -> bool {
        self.embedded_escape_active
    }

    /// Consume one character and report the transition, if any.
    pub fn advance(&mut self, ch: char) -> StringEvent {
        match self.active_delimiter {
            Some(delimiter) => {
                if ch == INTERPOLATION_DELIMITER {
                    self.embedded_escape_active = !self.embedded_escape_active;
                    if self.embedded_escape_active {
                        StringEvent::EmbeddedOpened
                    } else {
                        StringEvent::EmbeddedClosed
                    }
                } else if ch == delimiter && !self.embedded_escape_active {
                    self.active_delimiter = None;
                    StringEvent::Exited
                } else {
                    StringEvent::Ignored
                }
            }
            None => {
                if is_string_delimiter(ch) {
                    self.active_delimiter = Some(ch);
                    self.embedded_escape_active = false;
                    StringEvent::Entered
                } else {
                    StringEvent::Ignored
                }
            }
        }
    }
}
