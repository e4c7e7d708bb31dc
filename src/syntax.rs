//! Fixed syntax vocabulary of the sable language: string delimiters, the
//! bracket/quote pairs, comment markers, and the script container tag.
//!
//! The interpolation delimiter `#` is paired with itself. It is not a
//! balanced pair: inside a string literal every occurrence toggles the
//! embedded-expression escape, so scanners treat it as a single-character
//! toggle, never as push/pop nesting.

/// The character that toggles an embedded expression inside a string.
pub const INTERPOLATION_DELIMITER: char = '#';

/// Name of the tag whose body is script-mode code, matched case-insensitively.
pub const SCRIPT_TAG_NAME: &str = "sablescript";

/// Script-mode line comment opener.
pub const SCRIPT_LINE_COMMENT: &str = "//";
/// Script-mode block comment delimiters.
pub const SCRIPT_BLOCK_COMMENT: (&str, &str) = ("/*", "*/");
/// Tag-mode block comment delimiters.
pub const TAG_BLOCK_COMMENT: (&str, &str) = ("<!--", "-->");

/// An opening/closing character pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterPair {
    pub opening: char,
    pub closing: char,
}

impl CharacterPair {
    pub const fn new(opening: char, closing: char) -> Self {
        Self { opening, closing }
    }

    pub fn is_member(&self, ch: char) -> bool {
        ch == self.opening || ch == self.closing
    }
}

/// All recognized pairs, in fixed order: the three brackets, the two quote
/// kinds, the interpolation delimiter, and tag angle brackets.
pub const CHARACTER_PAIRS: [CharacterPair; 7] = [
    CharacterPair::new('{', '}'),
    CharacterPair::new('[', ']'),
    CharacterPair::new('(', ')'),
    CharacterPair::new('"', '"'),
    CharacterPair::new('\'', '\''),
    CharacterPair::new(INTERPOLATION_DELIMITER, INTERPOLATION_DELIMITER),
    CharacterPair::new('<', '>'),
];

/// The three bracket pairs that participate in nesting counts.
pub const BRACKET_PAIRS: [CharacterPair; 3] = [
    CharacterPair::new('{', '}'),
    CharacterPair::new('[', ']'),
    CharacterPair::new('(', ')'),
];

/// True for `"` and `'` only.
pub fn is_string_delimiter(ch: char) -> bool {
    ch == '"' || ch == '\''
}

/// The pair containing `ch` as either member, or `None`.
pub fn character_pair(ch: char) -> Option<CharacterPair> {
    CHARACTER_PAIRS.iter().copied().find(|pair| pair.is_member(ch))
}

/// The opening member of the pair closed by `closing`, or `None` when
/// `closing` is not a recognized closer.
pub fn opening_char(closing: char) -> Option<char> {
    character_pair(closing).map(|pair| pair.opening)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_delimiters() {
        assert!(is_string_delimiter('"'));
        assert!(is_string_delimiter('\''));
        assert!(!is_string_delimiter('`'));
        assert!(!is_string_delimiter('#'));
    }

    #[test]
    fn pair_lookup_finds_either_member() {
        assert_eq!(character_pair('{'), Some(CharacterPair::new('{', '}')));
        assert_eq!(character_pair('}'), Some(CharacterPair::new('{', '}')));
        assert_eq!(character_pair(']'), Some(CharacterPair::new('[', ']')));
        assert_eq!(character_pair('#'), Some(CharacterPair::new('#', '#')));
        assert_eq!(character_pair('x'), None);
    }

    #[test]
    fn opening_char_lookup() {
        assert_eq!(opening_char(')'), Some('('));
        assert_eq!(opening_char('>'), Some('<'));
        assert_eq!(opening_char('"'), Some('"'));
        assert_eq!(opening_char('!'), None);
    }
}
