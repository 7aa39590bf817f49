//! Headless control tree: slotmap arena, focus tracking, toolkit seam.

pub mod node;
pub mod toolkit;
pub mod tree;

pub use node::{NodeData, NodeId};
pub use toolkit::{AttachMode, Toolkit};
pub use tree::Dom;
