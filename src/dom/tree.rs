//! Tree operations: insert, attach, remove, walk, focus.

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// A headless control tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
/// The tree also tracks which node holds keyboard focus.
pub struct Dom {
    nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
    focused: Option<NodeId>,
}

impl Dom {
    /// Create an empty DOM.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
            focused: None,
        }
    }

    /// Insert a node without a parent.
    ///
    /// If no root has been set yet, this node becomes the root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist in the tree.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        debug_assert!(
            self.nodes.contains_key(parent),
            "parent node does not exist"
        );
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.attach(parent, id, None);
        id
    }

    /// Make `child` a child of `parent`, at `index` if it is within the
    /// current child count and last otherwise.
    ///
    /// Attaching a node that is already a child of `parent` is a no-op, and so
    /// is attaching a node under its own descendant. A node with another
    /// parent is detached from it first. Returns whether the tree changed.
    pub fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) -> bool {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return false;
        }
        if self.parent.get(child) == Some(&parent) {
            return false;
        }
        if self.is_ancestor_or_self(child, parent) {
            tracing::debug!(?parent, ?child, "attach would create a cycle");
            return false;
        }

        self.detach(child);
        self.parent.insert(child, parent);
        let Some(siblings) = self.children.get_mut(parent) else {
            return false;
        };
        match index {
            Some(index) if index < siblings.len() => siblings.insert(index, child),
            _ => siblings.push(child),
        }
        true
    }

    /// Remove `id` and its whole subtree. Focus inside the subtree is
    /// cleared. Returns the data of `id` itself.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        let subtree = self.walk_depth_first(id);
        if subtree.is_empty() {
            return None;
        }
        self.detach(id);
        if self.root == Some(id) {
            self.root = None;
        }
        if self.focused.is_some_and(|node| subtree.contains(&node)) {
            self.focused = None;
        }
        let mut removed = None;
        for node in subtree {
            self.children.remove(node);
            self.parent.remove(node);
            let data = self.nodes.remove(node);
            if node == id {
                removed = data;
            }
        }
        removed
    }

    /// Whether `ancestor` is `node` or lies on its parent chain.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent.get(id).copied();
        }
        false
    }

    /// Unlink `child` from its parent. Returns the old parent.
    fn detach(&mut self, child: NodeId) -> Option<NodeId> {
        let old_parent = self.parent.remove(child)?;
        if let Some(siblings) = self.children.get_mut(old_parent) {
            siblings.retain(|&sibling| sibling != child);
        }
        Some(old_parent)
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no children
    /// or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// The current root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// First node under `start` (inclusive, depth-first) that accepts focus.
    pub fn first_focusable(&self, start: NodeId) -> Option<NodeId> {
        self.walk_depth_first(start)
            .into_iter()
            .find(|&id| self.nodes.get(id).is_some_and(NodeData::accepts_focus))
    }

    /// Move keyboard focus to `id`. Fails if the node cannot take focus.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.nodes.get(id).is_some_and(NodeData::accepts_focus) {
            return false;
        }
        self.focused = Some(id);
        true
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
