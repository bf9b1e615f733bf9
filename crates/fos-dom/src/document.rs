//! Document - High-level document API

use std::collections::HashMap;

use crate::{Display, DomTree, EventRegistry, NodeId, Viewport};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    viewport: Viewport,
    /// Vertical scroll offsets of scrolled elements
    scroll_offsets: HashMap<NodeId, f64>,
    events: EventRegistry,
}

impl Document {
    /// Create a document with an empty html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh nodes on a fresh tree: these links cannot fail
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            viewport: Viewport::default(),
            scroll_offsets: HashMap::new(),
            events: EventRegistry::new(),
        }
    }

    /// Wrap an already built tree, locating html/head/body
    pub fn from_tree(url: &str, tree: DomTree) -> Self {
        let mut document = Self {
            tree,
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            viewport: Viewport::default(),
            scroll_offsets: HashMap::new(),
            events: EventRegistry::new(),
        };
        document.finalize();
        document
    }

    /// Re-resolve the cached html/head/body handles
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let find_child = |parent: NodeId, tag: &str| {
            tree.children(parent)
                .find(|(_, n)| n.as_element().is_some_and(|e| e.tag_name() == tag))
                .map_or(NodeId::NONE, |(id, _)| id)
        };
        let html = find_child(tree.root(), "html");
        let head = if html.is_valid() { find_child(html, "head") } else { NodeId::NONE };
        let body = if html.is_valid() { find_child(html, "body") } else { NodeId::NONE };
        self.html_element = html;
        self.head_element = head;
        self.body_element = body;
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Text of the first `<title>` in `<head>`
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        self.tree
            .children(self.head_element)
            .find(|(_, n)| n.as_element().is_some_and(|e| e.tag_name() == "title"))
            .map(|(id, _)| self.tree.text_content(id).trim().to_string())
            .unwrap_or_default()
    }

    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    pub fn head(&self) -> NodeId {
        self.head_element
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&n| self.tree.element(n).and_then(|e| e.id()) == Some(id))
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Scroll the window
    pub fn scroll_window_to(&mut self, y: f64) {
        let x = self.viewport.scroll_left;
        self.viewport.scroll_to(x, y);
    }

    /// Vertical scroll offset of an element (0 when never scrolled)
    pub fn scroll_top(&self, id: NodeId) -> f64 {
        self.scroll_offsets.get(&id).copied().unwrap_or(0.0)
    }

    /// Store an element's scroll offset; range clamping is layout's job
    pub fn set_scroll_top(&mut self, id: NodeId, y: f64) {
        if y <= 0.0 {
            self.scroll_offsets.remove(&id);
        } else {
            self.scroll_offsets.insert(id, y);
        }
    }

    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventRegistry {
        &mut self.events
    }

    /// Attached to the document with no `display: none` on the way up
    pub fn is_visible(&self, id: NodeId) -> bool {
        if !self.tree.is_element(id) || !self.tree.is_attached(id) {
            return false;
        }
        std::iter::once(id)
            .chain(self.tree.ancestors(id))
            .all(|n| self.tree.style(n).display != Display::None)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::new("https://example.com/");
        assert!(doc.body().is_valid());
        assert_eq!(doc.tree().parent(doc.body()), Some(doc.document_element()));
        assert_eq!(doc.url(), "https://example.com/");
    }

    #[test]
    fn test_from_tree_finds_body() {
        let doc = Document::new("about:blank");
        let rebuilt = Document::from_tree("about:blank", doc.tree.clone());
        assert_eq!(rebuilt.body(), doc.body());
        assert_eq!(rebuilt.head(), doc.head());
    }

    #[test]
    fn test_visibility() {
        let mut doc = Document::default();
        let outer = doc.tree.create_element("div");
        let inner = doc.tree.create_element("p");
        let body = doc.body();
        doc.tree.append_child(body, outer).unwrap();
        doc.tree.append_child(outer, inner).unwrap();
        assert!(doc.is_visible(inner));

        doc.tree.hide(outer);
        assert!(!doc.is_visible(inner));

        let stray = doc.tree.create_element("div");
        assert!(!doc.is_visible(stray));
    }

    #[test]
    fn test_scroll_offsets() {
        let mut doc = Document::default();
        let body = doc.body();
        doc.set_scroll_top(body, 40.0);
        assert_eq!(doc.scroll_top(body), 40.0);
        doc.set_scroll_top(body, -5.0);
        assert_eq!(doc.scroll_top(body), 0.0);
    }
}
