//! Static vocabulary of the sable language: known tags and their attributes,
//! style properties, and built-in functions.
//!
//! The tables are plain consts; lookup maps keyed by lowercase name are built
//! once at first use and shared for the life of the process. Nothing here is
//! ever mutated after construction.

use std::collections::HashMap;

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeValueKind {
    Text,
    Number,
    Boolean,
    Color,
    Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub name: &'static str,
    pub value_kind: AttributeValueKind,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub attributes: &'static [AttributeDefinition],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StylePropertyDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub syntax: &'static str,
    pub accepts_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub name: &'static str,
    pub data_type: &'static str,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: &'static str,
    pub description: &'static str,
    pub returns: &'static str,
    pub parameters: &'static [ParameterDefinition],
}

impl FunctionSignature {
    /// Human-readable signature label, optional parameters bracketed:
    /// `find(needle, haystack[, start]): number`.
    pub fn label(&self) -> String {
        let mut label = String::from(self.name);
        label.push('(');
        let mut closing_brackets = 0;
        for (idx, param) in self.parameters.iter().enumerate() {
            if idx > 0 {
                if param.required {
                    label.push_str(", ");
                } else {
                    label.push_str("[, ");
                    closing_brackets += 1;
                }
            } else if !param.required {
                label.push('[');
                closing_brackets += 1;
            }
            label.push_str(param.name);
        }
        for _ in 0..closing_brackets {
            label.push(']');
        }
        label.push_str("): ");
        label.push_str(self.returns);
        label
    }
}

pub const TAGS: &[TagDefinition] = &[
    TagDefinition {
        name: "output",
        description: "Evaluates embedded expressions in its body and writes the result.",
        attributes: &[
            AttributeDefinition {
                name: "query",
                value_kind: AttributeValueKind::Expression,
                description: "Query whose rows drive the output loop.",
            },
            AttributeDefinition {
                name: "group",
                value_kind: AttributeValueKind::Text,
                description: "Column to group consecutive rows by.",
            },
        ],
    },
    TagDefinition {
        name: "set",
        description: "Assigns the result of an expression to a variable.",
        attributes: &[],
    },
    TagDefinition {
        name: "loop",
        description: "Iterates over a range, list, array, or query.",
        attributes: &[
            AttributeDefinition {
                name: "index",
                value_kind: AttributeValueKind::Text,
                description: "Name of the loop index variable.",
            },
            AttributeDefinition {
                name: "from",
                value_kind: AttributeValueKind::Number,
                description: "First value of a ranged loop.",
            },
            AttributeDefinition {
                name: "to",
                value_kind: AttributeValueKind::Number,
                description: "Last value of a ranged loop.",
            },
            AttributeDefinition {
                name: "list",
                value_kind: AttributeValueKind::Text,
                description: "Delimited list to iterate.",
            },
        ],
    },
    TagDefinition {
        name: "include",
        description: "Renders another template in place.",
        attributes: &[AttributeDefinition {
            name: "template",
            value_kind: AttributeValueKind::Text,
            description: "Path of the template to include.",
        }],
    },
    TagDefinition {
        name: "param",
        description: "Declares a parameter with an optional default.",
        attributes: &[
            AttributeDefinition {
                name: "name",
                value_kind: AttributeValueKind::Text,
                description: "Name of the parameter.",
            },
            AttributeDefinition {
                name: "default",
                value_kind: AttributeValueKind::Expression,
                description: "Value used when the parameter is absent.",
            },
        ],
    },
    TagDefinition {
        name: "style",
        description: "Declares an inline style sheet scoped to the template.",
        attributes: &[AttributeDefinition {
            name: "media",
            value_kind: AttributeValueKind::Text,
            description: "Media query the styles apply to.",
        }],
    },
    TagDefinition {
        name: "sablescript",
        description: "Container whose body uses script syntax.",
        attributes: &[],
    },
];

pub const STYLE_PROPERTIES: &[StylePropertyDefinition] = &[
    StylePropertyDefinition {
        name: "color",
        description: "Foreground color of an element's text.",
        syntax: "<color>",
        accepts_color: true,
    },
    StylePropertyDefinition {
        name: "background-color",
        description: "Background color of an element.",
        syntax: "<color>",
        accepts_color: true,
    },
    StylePropertyDefinition {
        name: "border-color",
        description: "Color of an element's four borders.",
        syntax: "<color>{1,4}",
        accepts_color: true,
    },
    StylePropertyDefinition {
        name: "outline-color",
        description: "Color of an element's outline.",
        syntax: "<color>",
        accepts_color: true,
    },
    StylePropertyDefinition {
        name: "font-size",
        description: "Size of the font.",
        syntax: "<length> | <percentage>",
        accepts_color: false,
    },
    StylePropertyDefinition {
        name: "font-family",
        description: "Prioritized list of font family names.",
        syntax: "<family-name>#",
        accepts_color: false,
    },
    StylePropertyDefinition {
        name: "margin",
        description: "Margin on all four sides of an element.",
        syntax: "<length>{1,4}",
        accepts_color: false,
    },
    StylePropertyDefinition {
        name: "padding",
        description: "Padding on all four sides of an element.",
        syntax: "<length>{1,4}",
        accepts_color: false,
    },
    StylePropertyDefinition {
        name: "display",
        description: "Display box type of an element.",
        syntax: "block | inline | none",
        accepts_color: false,
    },
];

pub const FUNCTIONS: &[FunctionSignature] = &[
    FunctionSignature {
        name: "len",
        description: "Length of a string, list, or array.",
        returns: "number",
        parameters: &[ParameterDefinition {
            name: "value",
            data_type: "any",
            required: true,
            description: "Value to measure.",
        }],
    },
    FunctionSignature {
        name: "find",
        description: "First occurrence of a substring, or 0 when absent.",
        returns: "number",
        parameters: &[
            ParameterDefinition {
                name: "needle",
                data_type: "string",
                required: true,
                description: "Substring to search for.",
            },
            ParameterDefinition {
                name: "haystack",
                data_type: "string",
                required: true,
                description: "String to search in.",
            },
            ParameterDefinition {
                name: "start",
                data_type: "number",
                required: false,
                description: "Position the search begins at.",
            },
        ],
    },
    FunctionSignature {
        name: "replace",
        description: "Replaces occurrences of a substring.",
        returns: "string",
        parameters: &[
            ParameterDefinition {
                name: "text",
                data_type: "string",
                required: true,
                description: "String to operate on.",
            },
            ParameterDefinition {
                name: "search",
                data_type: "string",
                required: true,
                description: "Substring to replace.",
            },
            ParameterDefinition {
                name: "replacement",
                data_type: "string",
                required: true,
                description: "Replacement text.",
            },
            ParameterDefinition {
                name: "scope",
                data_type: "string",
                required: false,
                description: "\"one\" or \"all\" (default \"one\").",
            },
        ],
    },
    FunctionSignature {
        name: "slice",
        description: "Sub-list between two positions.",
        returns: "array",
        parameters: &[
            ParameterDefinition {
                name: "list",
                data_type: "array",
                required: true,
                description: "Source array.",
            },
            ParameterDefinition {
                name: "start",
                data_type: "number",
                required: true,
                description: "First position (1-based).",
            },
            ParameterDefinition {
                name: "end",
                data_type: "number",
                required: false,
                description: "Last position; defaults to the array length.",
            },
        ],
    },
    FunctionSignature {
        name: "format",
        description: "Formats a value according to a mask.",
        returns: "string",
        parameters: &[
            ParameterDefinition {
                name: "mask",
                data_type: "string",
                required: true,
                description: "Format mask.",
            },
            ParameterDefinition {
                name: "value",
                data_type: "any",
                required: true,
                description: "Value to format.",
            },
        ],
    },
    FunctionSignature {
        name: "append",
        description: "Appends an element to an array, returning the array.",
        returns: "array",
        parameters: &[
            ParameterDefinition {
                name: "array",
                data_type: "array",
                required: true,
                description: "Array to append to.",
            },
            ParameterDefinition {
                name: "value",
                data_type: "any",
                required: true,
                description: "Element to append.",
            },
        ],
    },
];

static TAG_INDEX: Lazy<HashMap<&'static str, &'static TagDefinition>> =
    Lazy::new(|| TAGS.iter().map(|tag| (tag.name, tag)).collect());

static STYLE_PROPERTY_INDEX: Lazy<HashMap<&'static str, &'static StylePropertyDefinition>> =
    Lazy::new(|| STYLE_PROPERTIES.iter().map(|p| (p.name, p)).collect());

static FUNCTION_INDEX: Lazy<HashMap<&'static str, &'static FunctionSignature>> =
    Lazy::new(|| FUNCTIONS.iter().map(|f| (f.name, f)).collect());

/// Case-insensitive tag lookup.
pub fn tag(name: &str) -> Option<&'static TagDefinition> {
    TAG_INDEX.get(name.to_lowercase().as_str()).copied()
}

/// Case-insensitive attribute lookup within a tag.
pub fn attribute(tag_name: &str, attribute_name: &str) -> Option<&'static AttributeDefinition> {
    let needle = attribute_name.to_lowercase();
    tag(tag_name)?
        .attributes
        .iter()
        .find(|attr| attr.name == needle)
}

/// Case-insensitive style property lookup.
pub fn style_property(name: &str) -> Option<&'static StylePropertyDefinition> {
    STYLE_PROPERTY_INDEX.get(name.to_lowercase().as_str()).copied()
}

/// Case-insensitive built-in function lookup.
pub fn function(name: &str) -> Option<&'static FunctionSignature> {
    FUNCTION_INDEX.get(name.to_lowercase().as_str()).copied()
}
