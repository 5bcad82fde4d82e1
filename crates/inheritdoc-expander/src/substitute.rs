//! Computing and applying placeholder replacements.

use inheritdoc_core::{DocTree, NodeId, SelectorPath, TreeError};

/// Nodes of a source tree chosen to replace a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacement {
    /// Source node ids, in order
    pub nodes: Vec<NodeId>,
    /// Candidates dropped because they are or contain the placeholder
    pub excluded: usize,
}

/// Choose the nodes of `source` that replace a placeholder.
///
/// Without a path the replacement is every child of the source root, with
/// whitespace-only text trimmed from both edges when `trim_edges` is set.
/// With a path it is the children of each matched element, concatenated.
///
/// `placeholder` is the placeholder's id when `source` is a snapshot of the
/// tree being edited. Element candidates that are or contain it are left
/// out and counted in [`Replacement::excluded`].
pub fn compute_replacement(
    source: &DocTree,
    path: Option<&SelectorPath>,
    placeholder: Option<NodeId>,
    trim_edges: bool,
) -> Replacement {
    let Some(path) = path else {
        let children = source.children(source.root());
        let nodes = if trim_edges {
            trim_whitespace_edges(source, children)
        } else {
            children
        };
        return Replacement {
            nodes: nodes.to_vec(),
            excluded: 0,
        };
    };

    let mut replacement = Replacement::default();
    for matched in source.select(path) {
        for &candidate in source.children(matched) {
            let cyclic = placeholder.is_some_and(|placeholder| {
                source.is_element(candidate) && source.is_or_contains(candidate, placeholder)
            });
            if cyclic {
                replacement.excluded += 1;
            } else {
                replacement.nodes.push(candidate);
            }
        }
    }
    replacement
}

/// Swap `placeholder` in `target` for copies of `nodes` from `source`.
///
/// Returns the ids of the copies in `target`. An empty node list removes
/// the placeholder.
pub fn apply_replacement(
    target: &mut DocTree,
    placeholder: NodeId,
    source: &DocTree,
    nodes: &[NodeId],
) -> Result<Vec<NodeId>, TreeError> {
    let imported: Vec<NodeId> = nodes
        .iter()
        .filter_map(|&node| target.import(source, node))
        .collect();
    target.replace_with(placeholder, &imported)?;
    Ok(imported)
}

fn trim_whitespace_edges<'n>(tree: &DocTree, nodes: &'n [NodeId]) -> &'n [NodeId] {
    let is_blank = |id: &NodeId| tree.text(*id).is_some_and(|text| text.trim().is_empty());

    let start = nodes.iter().position(|id| !is_blank(id)).unwrap_or(nodes.len());
    let end = nodes.iter().rposition(|id| !is_blank(id)).map_or(start, |last| last + 1);
    &nodes[start..end]
}
