//! Element Query and Methods
//!
//! querySelector, getElementsByClassName, closest, matches.
//!
//! The string-taking methods are lenient: a selector that fails to parse
//! matches nothing instead of surfacing an error.

use crate::{DomTree, NodeId, Selector};

/// Element query trait
pub trait ElementQuery {
    /// Query first element below `root` by CSS selector
    fn query_selector(&self, root: NodeId, selector: &str) -> Option<NodeId>;

    /// Query all elements below `root` by CSS selector
    fn query_selector_all(&self, root: NodeId, selector: &str) -> Vec<NodeId>;

    /// Get elements by class name
    fn get_elements_by_class_name(&self, root: NodeId, class: &str) -> Vec<NodeId>;

    /// Find closest inclusive ancestor matching selector
    fn closest(&self, element: NodeId, selector: &str) -> Option<NodeId>;

    /// Check if element matches selector
    fn matches(&self, element: NodeId, selector: &str) -> bool;
}

fn parse_lenient(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::debug!("ignoring selector {:?}: {}", selector, err);
            None
        }
    }
}

impl ElementQuery for DomTree {
    fn query_selector(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        self.query_selector_all(root, selector).into_iter().next()
    }

    fn query_selector_all(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        parse_lenient(selector).map_or_else(Vec::new, |s| s.select_all(self, root))
    }

    fn get_elements_by_class_name(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    fn closest(&self, element: NodeId, selector: &str) -> Option<NodeId> {
        let parsed = parse_lenient(selector)?;
        std::iter::once(element)
            .chain(self.ancestors(element))
            .find(|&n| parsed.matches(self, n))
    }

    fn matches(&self, element: NodeId, selector: &str) -> bool {
        parse_lenient(selector).is_some_and(|s| s.matches(self, element))
    }
}
