//! Documentation-block generation.
//!
//! [`build_docblock`] is purely mechanical: parameter names in, snippet text
//! out, with editor tab stops (`${n:...}`) for the author to fill in. The
//! parameter names themselves come from the context engine:
//! [`docblock_suggestion`] locates the next declaration's parameter list
//! after the cursor and extracts the names.

use sable::balance::next_character_position;
use sable::context::DocumentPositionStateContext;
use sable::document::is_word_char;

use crate::signature::parameter_names;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocBlockStyle {
    /// `<!-- ... -->`, for tag-mode templates.
    Tag,
    /// `/** ... */`, for script code.
    Script,
}

/// Render a documentation template for the given parameter names.
pub fn build_docblock(params: &[String], style: DocBlockStyle) -> String {
    let mut stop = 1;
    let mut body = String::new();
    let indent = match style {
        DocBlockStyle::Tag => "  ",
        DocBlockStyle::Script => " * ",
    };

    body.push_str(indent);
    body.push_str(&format!("${{{}:summary}}\n", stop));
    stop += 1;
    if !params.is_empty() {
        body.push_str(indent.trim_end());
        body.push('\n');
        for param in params {
            body.push_str(indent);
            body.push_str(&format!("@param {} ${{{}:description}}\n", param, stop));
            stop += 1;
        }
    }

    match style {
        DocBlockStyle::Tag => format!("<!--\n{}-->", body),
        DocBlockStyle::Script => format!("/**\n{} */", body),
    }
}

/// Build the docblock for the declaration following the cursor, or `None`
/// when the cursor is in a comment or no parameter list follows.
pub fn docblock_suggestion(ctx: &DocumentPositionStateContext<'_>) -> Option<String> {
    if ctx.position_in_comment {
        return None;
    }
    let sanitized = &ctx.state.sanitized_document_text;
    let open_pos = next_character_position(&ctx.state, ctx.offset, sanitized.len(), '(', false);
    let open_offset = ctx.state.document.offset_at(open_pos);
    if !matches!(sanitized[open_offset..].chars().next(), Some('(')) {
        return None;
    }
    // the paren must belong to a named declaration, not bare grouping
    let callee_end = sanitized[..open_offset].trim_end().len();
    if !sanitized[..callee_end]
        .chars()
        .next_back()
        .is_some_and(is_word_char)
    {
        return None;
    }
    let params = parameter_names(&ctx.state, open_offset);
    let style = if ctx.position_is_script {
        DocBlockStyle::Script
    } else {
        DocBlockStyle::Tag
    };
    Some(build_docblock(&params, style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable::context::document_position_state_context;
    use sable::document::{Position, TextDocument};

    #[test]
    fn script_docblock_shape() {
        let block = build_docblock(&["a".into(), "b".into()], DocBlockStyle::Script);
        assert_eq!(
            block,
            "/**\n * ${1:summary}\n *\n * @param a ${2:description}\n * @param b ${3:description}\n */"
        );
    }

    #[test]
    fn tag_docblock_shape() {
        let block = build_docblock(&["name".into()], DocBlockStyle::Tag);
        assert_eq!(
            block,
            "<!--\n  ${1:summary}\n\n  @param name ${2:description}\n-->"
        );
    }

    #[test]
    fn no_parameters_means_no_param_section() {
        let block = build_docblock(&[], DocBlockStyle::Script);
        assert_eq!(block, "/**\n * ${1:summary}\n */");
    }

    #[test]
    fn suggestion_for_the_following_declaration() {
        let text = "\nfunction greet(name, punctuation) {\n}\n";
        let doc = TextDocument::new("sable-script", 0, text);
        let ctx = document_position_state_context(&doc, Position::new(0, 0), false);
        let block = docblock_suggestion(&ctx).unwrap();
        assert!(block.starts_with("/**"));
        assert!(block.contains("@param name "));
        assert!(block.contains("@param punctuation "));
    }

    #[test]
    fn declines_inside_comments_and_without_declarations() {
        let text = "// note\nfunction f(x) {}\n";
        let doc = TextDocument::new("sable-script", 0, text);
        let ctx = document_position_state_context(&doc, Position::new(0, 3), false);
        assert!(docblock_suggestion(&ctx).is_none());

        let doc = TextDocument::new("sable-script", 0, "no declaration here\n");
        let ctx = document_position_state_context(&doc, Position::new(0, 0), false);
        assert!(docblock_suggestion(&ctx).is_none());
    }
}
