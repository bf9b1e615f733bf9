//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts to our DOM format.

use fos_dom::{Document, DomTree, Node, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut tree = DomTree::new();
        let root = tree.root();
        self.convert_node(&dom.document, &mut tree, root);

        let document = Document::from_tree(url, tree);
        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Parse `html` as a fragment and append its nodes to `parent`
    ///
    /// The markup goes through the full document parser, so stray `<html>`,
    /// `<head>` and `<body>` tags are dropped while their contents are kept,
    /// head content first.
    pub fn parse_fragment(
        &self,
        tree: &mut DomTree,
        parent: NodeId,
        html: &str,
    ) -> Result<Vec<NodeId>, ParseError> {
        let parsed = self.parse(html);
        let source = parsed.tree();

        let mut inserted = Vec::new();
        for section in [parsed.head(), parsed.body()] {
            if !section.is_valid() {
                continue;
            }
            for (child, _) in source.children(section) {
                let copy = tree.import_subtree(source, child)?;
                tree.append_child(parent, copy)?;
                inserted.push(copy);
            }
        }
        Ok(inserted)
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        let id = match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
                return;
            }
            RcNodeData::Doctype { name, .. } => tree.push(Node::doctype(name.to_string())),
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if text.trim().is_empty() {
                    return;
                }
                tree.create_text(&text)
            }
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    tree.set_attr(id, &attr.name.local, attr.value.to_string());
                }
                id
            }
            RcNodeData::ProcessingInstruction { .. } => return,
        };

        if let Err(err) = tree.append_child(parent, id) {
            tracing::warn!("dropping parsed node: {}", err);
            return;
        }

        for child in handle.children.borrow().iter() {
            self.convert_node(child, tree, id);
        }
    }
}
