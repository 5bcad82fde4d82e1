//! Finding placeholders in a documentation tree.

use inheritdoc_core::{DocTree, NodeId};

use crate::options::PlaceholderSyntax;

/// First placeholder below the root, in document order.
pub fn find_first_placeholder(tree: &DocTree, syntax: &PlaceholderSyntax) -> Option<NodeId> {
    tree.find_first_element(&syntax.tag)
}

/// Every placeholder below the root, in document order.
pub fn find_all_placeholders(tree: &DocTree, syntax: &PlaceholderSyntax) -> Vec<NodeId> {
    tree.find_elements(&syntax.tag)
}

pub fn has_placeholders(tree: &DocTree, syntax: &PlaceholderSyntax) -> bool {
    find_first_placeholder(tree, syntax).is_some()
}
