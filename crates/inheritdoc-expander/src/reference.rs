//! Reading a placeholder's cross reference and selector path.

use inheritdoc_core::{DocTree, IdentityName, NodeId, ReferenceKey};

use crate::options::PlaceholderSyntax;

/// The attributes of one placeholder. Either may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderReference {
    pub cross_reference: Option<IdentityName>,
    pub path: Option<String>,
}

impl PlaceholderReference {
    pub fn read(tree: &DocTree, placeholder: NodeId, syntax: &PlaceholderSyntax) -> Self {
        Self {
            cross_reference: cross_reference(tree, placeholder, syntax),
            path: selector_path(tree, placeholder, syntax).map(str::to_string),
        }
    }

    /// Cycle-guard key of this placeholder.
    pub fn key(&self) -> ReferenceKey {
        ReferenceKey::new(self.cross_reference.clone(), self.path.clone())
    }
}

pub fn cross_reference(tree: &DocTree, placeholder: NodeId, syntax: &PlaceholderSyntax) -> Option<IdentityName> {
    tree.attribute(placeholder, &syntax.cross_reference_attribute)
        .map(IdentityName::from)
}

pub fn selector_path<'t>(tree: &'t DocTree, placeholder: NodeId, syntax: &PlaceholderSyntax) -> Option<&'t str> {
    tree.attribute(placeholder, &syntax.path_attribute)
}
