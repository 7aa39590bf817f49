//! The seam between page state and whatever draws the pages.
//!
//! The wizard never touches controls directly. It asks a [`Toolkit`] to
//! attach nodes, find and focus the first focusable control of a page, and
//! report what currently has focus. [`Dom`] is the headless implementation.

use super::node::NodeId;
use super::tree::Dom;

/// Whether a builder call should add the new node to its enclosing
/// container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachMode {
    #[default]
    Attach,
    /// The caller places the node itself.
    Ignore,
}

pub trait Toolkit {
    /// Add `child` to `parent` unless `mode` is [`AttachMode::Ignore`] or it
    /// is already there. `index` places it when in range; otherwise it is
    /// appended. Returns whether the tree changed.
    fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>, mode: AttachMode)
        -> bool;

    /// First node under `root` that can take keyboard focus.
    fn first_focusable(&self, root: NodeId) -> Option<NodeId>;

    fn request_focus(&mut self, node: NodeId) -> bool;

    fn focused(&self) -> Option<NodeId>;

    /// Whether `node` is a multi-line text input.
    fn is_multiline(&self, node: NodeId) -> bool;
}

impl Toolkit for Dom {
    fn attach(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: Option<usize>,
        mode: AttachMode,
    ) -> bool {
        match mode {
            AttachMode::Ignore => false,
            AttachMode::Attach => Dom::attach(self, parent, child, index),
        }
    }

    fn first_focusable(&self, root: NodeId) -> Option<NodeId> {
        Dom::first_focusable(self, root)
    }

    fn request_focus(&mut self, node: NodeId) -> bool {
        let focused = self.focus(node);
        if !focused {
            tracing::debug!(?node, "focus request rejected");
        }
        focused
    }

    fn focused(&self) -> Option<NodeId> {
        Dom::focused(self)
    }

    fn is_multiline(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|data| data.multiline)
    }
}
