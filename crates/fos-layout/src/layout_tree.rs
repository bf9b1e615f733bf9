//! Layout Tree

use std::collections::HashMap;

use fos_dom::NodeId;

use crate::BoxDimensions;

/// Layout results keyed by DOM node
#[derive(Debug, Default)]
pub struct LayoutTree {
    boxes: HashMap<NodeId, LayoutBox>,
    document_height: f64,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, layout_box: LayoutBox) {
        self.boxes.insert(id, layout_box);
    }

    pub fn get(&self, id: NodeId) -> Option<&LayoutBox> {
        self.boxes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Height of everything in normal flow from the document origin
    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    pub(crate) fn set_document_height(&mut self, height: f64) {
        self.document_height = height;
    }
}

/// A box in the layout tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    pub dimensions: BoxDimensions,
    pub box_type: BoxType,
    /// Height of the flowed children, independent of any explicit height
    pub content_extent: f64,
    /// Clips and scrolls its content vertically
    pub scrolls: bool,
}

/// Type of layout box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxType {
    Block,
    /// Image-like box sized by attributes
    Replaced,
    /// Not rendered, zero height
    Hidden,
}
