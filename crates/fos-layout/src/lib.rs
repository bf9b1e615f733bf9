//! fOS Layout Engine
//!
//! Box model and a block-flow approximation good enough to answer the
//! geometry questions scroll handling asks: how tall is a box, where does it
//! start, and how far can it scroll.

mod block;
mod box_model;
mod layout_tree;

pub use block::{scroll_to, BlockLayout, LINE_HEIGHT};
pub use box_model::{BoxDimensions, EdgeSizes, Rect};
pub use layout_tree::{BoxType, LayoutBox, LayoutTree};

use fos_dom::Document;

/// Perform layout on a document
pub fn layout(document: &Document) -> BlockLayout {
    BlockLayout::new(document)
}
