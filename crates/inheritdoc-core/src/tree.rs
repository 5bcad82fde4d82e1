//! Documentation-comment tree.
//!
//! A member's documentation is an ordered tree of elements and text held in
//! an arena and addressed by [`NodeId`]. Removing or replacing a node only
//! unlinks it; the slot stays in the arena until [`DocTree::compacted`] is
//! called. Cloning a tree clones the arena, so the copy shares no node with
//! the source tree and every id keeps addressing the same node in both.

use indexmap::IndexMap;

use crate::errors::TreeError;
use crate::selector::SelectorPath;

/// Index of a node within one [`DocTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub usize);

/// Tag name and attributes of an element node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementData {
    pub name: String,
    /// Attributes in source order.
    pub attributes: IndexMap<String, String>,
}

impl ElementData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

/// A node in the arena.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Parent node (None for the root and for unlinked nodes)
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl DocNode {
    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    /// Tag name, if this is an element.
    pub fn element_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(data) => Some(&data.name),
            NodeKind::Text(_) => None,
        }
    }

    /// Text content, if this is a text node.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }
}

/// An arena-backed documentation tree rooted at a single element.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocTree {
    nodes: Vec<DocNode>,
    root: NodeId,
}

/// The documentation tree of one member (rooted at its `<member>` element).
pub type MemberElement = DocTree;

impl DocTree {
    /// Create a tree holding only a root element.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self::with_root(ElementData::new(root_name))
    }

    /// Create a tree whose root element carries the given data.
    pub fn with_root(root: ElementData) -> Self {
        Self {
            nodes: vec![DocNode {
                id: NodeId(0),
                kind: NodeKind::Element(root),
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&DocNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut DocNode> {
        self.nodes.get_mut(id.0)
    }

    /// Total arena slots, including unlinked nodes.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes reachable from the root (root included).
    pub fn node_count(&self) -> usize {
        self.descendants(self.root).len() + 1
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DocNode {
            id,
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn attach_last(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child);
        }
    }

    /// Create an unlinked element.
    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.push(NodeKind::Element(data))
    }

    /// Create an unlinked text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    /// Append a new element as the last child of `parent`.
    ///
    /// If `parent` does not exist the element is created unlinked.
    pub fn append_element(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        self.append_element_data(parent, ElementData::new(name))
    }

    /// Append a new element with attributes as the last child of `parent`.
    pub fn append_element_data(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        let id = self.create_element(data);
        if self.get(parent).is_some() {
            self.attach_last(parent, id);
        }
        id
    }

    /// Append a new text node as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.create_text(text);
        if self.get(parent).is_some() {
            self.attach_last(parent, id);
        }
        id
    }

    /// Set an attribute on an element. Does nothing for text nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(DocNode {
            kind: NodeKind::Element(data),
            ..
        }) = self.nodes.get_mut(id.0)
        {
            data.attributes.insert(name.into(), value.into());
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).map(DocNode::is_element).unwrap_or(false)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.get(id)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(DocNode::element_name)
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|data| data.attributes.get(name))
            .map(String::as_str)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(DocNode::text)
    }

    /// All descendants of `id` in document order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        result
    }

    /// The root followed by every attached node, in document order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut result = vec![self.root];
        result.extend(self.descendants(self.root));
        result
    }

    /// First element below the root with the given tag, in document order.
    pub fn find_first_element(&self, name: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(self.root).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.element_name(current) == Some(name) {
                return Some(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        None
    }

    /// Every element below the root with the given tag, in document order.
    pub fn find_elements(&self, name: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| self.element_name(id) == Some(name))
            .collect()
    }

    /// Whether `id` is the root or hangs below it.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_or_contains(self.root, id)
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_or_contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if self.get(node).is_none() || self.get(ancestor).is_none() {
            return false;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Unlink `id` from its parent.
    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.replace_with(id, &[])
    }

    /// Replace `id` in its parent with `replacement`, in order.
    ///
    /// Replacement nodes must be unlinked nodes of this arena (see
    /// [`DocTree::import`]). An empty replacement removes the node.
    pub fn replace_with(&mut self, id: NodeId, replacement: &[NodeId]) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootEdit);
        }
        let parent = self
            .get(id)
            .ok_or(TreeError::NodeNotFound(id))?
            .parent
            .ok_or(TreeError::Detached(id))?;

        for &node in replacement {
            let candidate = self.get(node).ok_or(TreeError::NodeNotFound(node))?;
            if candidate.parent.is_some() || node == self.root || node == id {
                return Err(TreeError::AlreadyAttached(node));
            }
        }

        let position = self
            .children(parent)
            .iter()
            .position(|&child| child == id)
            .ok_or(TreeError::Detached(id))?;

        for &node in replacement {
            self.nodes[node.0].parent = Some(parent);
        }
        let siblings = &mut self.nodes[parent.0].children;
        siblings.remove(position);
        for (offset, &node) in replacement.iter().enumerate() {
            siblings.insert(position + offset, node);
        }
        self.nodes[id.0].parent = None;
        Ok(())
    }

    /// Deep-copy the subtree at `source_id` of `source` into this arena.
    ///
    /// Returns the unlinked copy, or None if `source_id` does not exist.
    pub fn import(&mut self, source: &DocTree, source_id: NodeId) -> Option<NodeId> {
        let node = source.get(source_id)?;
        let id = self.push(node.kind.clone());
        for &child in &node.children {
            if let Some(copy) = self.import(source, child) {
                self.attach_last(id, copy);
            }
        }
        Some(id)
    }

    /// A copy holding only the nodes reachable from the root.
    pub fn compacted(&self) -> DocTree {
        self.extract(self.root).unwrap_or_else(|| DocTree::new(""))
    }

    /// The element subtree at `id` as a standalone tree.
    ///
    /// Returns None if `id` does not exist or is a text node.
    pub fn extract(&self, id: NodeId) -> Option<DocTree> {
        let mut output = DocTree::with_root(self.element(id)?.clone());
        for &child in self.children(id) {
            if let Some(copy) = output.import(self, child) {
                output.attach_last(output.root, copy);
            }
        }
        Some(output)
    }

    /// Compare the attached content of two trees, ignoring arena layout.
    pub fn structurally_eq(&self, other: &DocTree) -> bool {
        nodes_eq(self, self.root, other, other.root)
    }

    /// Concatenated text below `id`.
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut text = String::new();
        if let Some(own) = self.text(id) {
            text.push_str(own);
        }
        for descendant in self.descendants(id) {
            if let Some(part) = self.text(descendant) {
                text.push_str(part);
            }
        }
        text
    }

    /// Evaluate a selector path relative to the root.
    pub fn select(&self, path: &SelectorPath) -> Vec<NodeId> {
        path.select(self, self.root)
    }
}

fn nodes_eq(a: &DocTree, a_id: NodeId, b: &DocTree, b_id: NodeId) -> bool {
    let (Some(left), Some(right)) = (a.get(a_id), b.get(b_id)) else {
        return false;
    };
    left.kind == right.kind
        && left.children.len() == right.children.len()
        && left
            .children
            .iter()
            .zip(&right.children)
            .all(|(&l, &r)| nodes_eq(a, l, b, r))
}

impl PartialEq for DocTree {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_eq(other)
    }
}

impl Eq for DocTree {}
