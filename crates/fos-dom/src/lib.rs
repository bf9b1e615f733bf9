//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree with the small set of operations the paging
//! controller and the HTML parser need: node surgery, selector queries,
//! inline style, listener bookkeeping and scroll state.

mod node;
mod tree;
mod document;
mod operations;
mod selector;
mod element;
mod style;
mod dom_events;
mod geometry;

pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use tree::{Children, Descendants, DomTree};
pub use document::Document;
pub use operations::{DomError, DomResult};
pub use selector::{Selector, SelectorError};
pub use element::ElementQuery;
pub use style::{parse_px, BoxStyle, Display, Edges, Overflow};
pub use dom_events::{DomEvent, EventRegistry, EventTarget, EventType, Listener};
pub use geometry::Viewport;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}
