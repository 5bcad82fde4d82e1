//! Error types for inheritdoc expansion.

use crate::tree::NodeId;
use thiserror::Error;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum InheritdocError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Expand(#[from] ExpandError),
}

/// Errors while reading documentation XML.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed XML at byte {position}: {reason}")]
    Xml { position: u64, reason: String },

    #[error("Content after the root element at byte {position}")]
    TrailingContent { position: u64 },

    #[error("No root element found")]
    NoRootElement,

    #[error("Unexpected end of input inside <{open}>")]
    UnexpectedEof { open: String },

    #[error("I/O error reading documentation: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while parsing a selector path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Empty selector path")]
    Empty,

    #[error("Invalid selector path '{path}': unexpected input at '{rest}'")]
    Syntax { path: String, rest: String },
}

/// Errors from structural edits of a documentation tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node {0:?} does not exist in this tree")]
    NodeNotFound(NodeId),

    #[error("Node {0:?} is not attached to a parent")]
    Detached(NodeId),

    #[error("The root node cannot be replaced or removed")]
    RootEdit,

    #[error("Replacement node {0:?} is already attached elsewhere")]
    AlreadyAttached(NodeId),
}

/// Precondition violations during expansion.
///
/// Unresolvable references are not errors; they are reported through
/// [`crate::MissingDocumentationReference`] records.
#[derive(Debug, Error)]
pub enum ExpandError {
    #[error("Member documentation has an empty identity name")]
    EmptyIdentityName,

    #[error("Member map key '{key}' does not match member identity name '{name}'")]
    IdentityMismatch { key: String, name: String },

    #[error("Member element of '{name}' is itself a placeholder and is not attached to a member")]
    DetachedPlaceholder { name: String },

    #[error("Tree edit failed while expanding '{name}': {source}")]
    Tree {
        name: String,
        #[source]
        source: TreeError,
    },
}
