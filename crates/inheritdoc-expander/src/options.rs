//! Expansion options.

/// Names that mark a placeholder element and its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSyntax {
    /// Tag of the placeholder element
    pub tag: String,
    /// Attribute naming the referenced member
    pub cross_reference_attribute: String,
    /// Attribute holding the selector path
    pub path_attribute: String,
}

impl Default for PlaceholderSyntax {
    fn default() -> Self {
        Self {
            tag: "inheritdoc".to_string(),
            cross_reference_attribute: "cref".to_string(),
            path_attribute: "path".to_string(),
        }
    }
}

/// Options for expanding placeholders.
#[derive(Debug, Clone)]
pub struct ExpandOptions {
    pub syntax: PlaceholderSyntax,
    /// Drop whitespace-only text at the edges of whole-member replacements
    pub trim_edge_whitespace: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            syntax: PlaceholderSyntax::default(),
            trim_edge_whitespace: true,
        }
    }
}
