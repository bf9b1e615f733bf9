//! Block flow
//!
//! Every rendered element is a block stacked under its previous sibling.
//! Non-blank text contributes one line. Vertical margins do not collapse.
//! Positions are document-relative and already account for the scroll
//! offset of every scrolling ancestor.

use fos_dom::{parse_px, Display, Document, NodeId, Viewport};

use crate::{BoxDimensions, BoxType, EdgeSizes, LayoutBox, LayoutTree, Rect};

/// Height of one line of text
pub const LINE_HEIGHT: f64 = 16.0;

/// Elements that never generate a box
const NON_RENDERED: &[&str] = &["head", "title", "script", "style", "meta", "link", "template"];

/// Geometry of a document at one point in time
///
/// The layout is a snapshot: mutate the document and build a new one.
#[derive(Debug)]
pub struct BlockLayout {
    tree: LayoutTree,
}

impl BlockLayout {
    pub fn new(document: &Document) -> Self {
        let mut builder = Builder {
            document,
            tree: LayoutTree::new(),
            width: document.viewport().width,
        };

        let root = document.tree().root();
        let mut cursor = 0.0;
        for child in document.tree().element_children(root) {
            cursor += builder.layout_element(child, cursor);
        }
        builder.tree.set_document_height(cursor);

        tracing::trace!("laid out {} boxes, document height {}", builder.tree.len(), cursor);
        Self { tree: builder.tree }
    }

    pub fn layout_tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn dimensions(&self, id: NodeId) -> Option<&BoxDimensions> {
        self.tree.get(id).map(|b| &b.dimensions)
    }

    /// Content height
    pub fn height(&self, id: NodeId) -> f64 {
        self.dimensions(id).map_or(0.0, |d| d.content.height)
    }

    /// Content + padding height
    pub fn inner_height(&self, id: NodeId) -> f64 {
        self.dimensions(id).map_or(0.0, |d| d.padding_box().height)
    }

    /// Margin-box height
    pub fn outer_height(&self, id: NodeId) -> f64 {
        self.dimensions(id).map_or(0.0, |d| d.margin_box().height)
    }

    /// Document-relative top of the border box
    pub fn offset_top(&self, id: NodeId) -> f64 {
        self.dimensions(id).map_or(0.0, |d| d.border_box().y)
    }

    /// Full height of the scrollable content, padding included
    pub fn scroll_height(&self, id: NodeId) -> f64 {
        self.tree.get(id).map_or(0.0, |b| {
            let padding = b.dimensions.padding.vertical();
            b.content_extent.max(b.dimensions.content.height) + padding
        })
    }

    /// Largest valid scroll offset; zero for boxes that do not scroll
    pub fn max_scroll_top(&self, id: NodeId) -> f64 {
        match self.tree.get(id) {
            Some(b) if b.scrolls => (self.scroll_height(id) - self.inner_height(id)).max(0.0),
            _ => 0.0,
        }
    }

    pub fn document_height(&self) -> f64 {
        self.tree.document_height()
    }

    /// Largest valid window scroll offset for `viewport`
    pub fn max_window_scroll(&self, viewport: &Viewport) -> f64 {
        (self.document_height() - viewport.height).max(0.0)
    }
}

/// Scroll an element, clamped to its scroll range. Returns the applied offset.
pub fn scroll_to(document: &mut Document, id: NodeId, y: f64) -> f64 {
    let max = BlockLayout::new(document).max_scroll_top(id);
    let y = y.clamp(0.0, max);
    document.set_scroll_top(id, y);
    y
}

struct Builder<'a> {
    document: &'a Document,
    tree: LayoutTree,
    width: f64,
}

impl<'a> Builder<'a> {
    /// Lay out `id` with its margin box starting at `y`; returns the margin-box height
    fn layout_element(&mut self, id: NodeId, y: f64) -> f64 {
        let document: &'a Document = self.document;
        let dom = document.tree();
        let style = dom.style(id);
        let tag = dom.tag_name(id).unwrap_or_default();

        if style.display == Display::None || NON_RENDERED.contains(&tag) {
            let dimensions = BoxDimensions {
                content: Rect { x: 0.0, y, width: 0.0, height: 0.0 },
                ..BoxDimensions::default()
            };
            self.tree.insert(id, LayoutBox {
                dimensions,
                box_type: BoxType::Hidden,
                content_extent: 0.0,
                scrolls: false,
            });
            return 0.0;
        }

        let margin = EdgeSizes::from(style.margin);
        let border = EdgeSizes::from(style.border);
        let padding = EdgeSizes::from(style.padding);
        let content_y = y + margin.top + border.top + padding.top;

        let scrolls = style.is_scroll_container();
        let flow_start = if scrolls {
            content_y - document.scroll_top(id)
        } else {
            content_y
        };

        let mut cursor = flow_start;
        for (child, node) in dom.children(id) {
            if node.is_element() {
                cursor += self.layout_element(child, cursor);
            } else if node.as_text().is_some_and(|t| !t.trim().is_empty()) {
                cursor += LINE_HEIGHT;
            }
        }
        let content_extent = cursor - flow_start;

        let (box_type, height) = if tag == "img" {
            let height = dom.attr(id, "height").and_then(parse_px).or(style.height);
            (BoxType::Replaced, height.unwrap_or(0.0))
        } else {
            (BoxType::Block, style.height.unwrap_or(content_extent))
        };

        let dimensions = BoxDimensions {
            content: Rect {
                x: 0.0,
                y: content_y,
                width: self.width,
                height: height.max(0.0),
            },
            padding,
            border,
            margin,
        };
        self.tree.insert(id, LayoutBox {
            dimensions,
            box_type,
            content_extent,
            scrolls,
        });
        dimensions.margin_box().height
    }
}
