//! Node types: NodeId, NodeData.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// Data associated with a single DOM node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Control kind (e.g. "TextField", "Form").
    pub kind: String,
    /// Optional unique id.
    pub id: Option<String>,
    pub visible: bool,
    pub focusable: bool,
    pub disabled: bool,
    /// Multi-line text input. Plain Enter inserts a newline here instead of
    /// committing the page.
    pub multiline: bool,
}

impl NodeData {
    /// Create a new `NodeData` with the given kind and sensible defaults.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            visible: true,
            focusable: false,
            disabled: false,
            multiline: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Mark as a multi-line text input. Implies focusable.
    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        if multiline {
            self.focusable = true;
        }
        self
    }

    /// Whether the node can take keyboard focus right now.
    pub fn accepts_focus(&self) -> bool {
        self.focusable && self.visible && !self.disabled
    }
}
