//! Per-container state

use fos_dom::{EventTarget, NodeId};
use serde_json::{json, Value};

use crate::{AutoTriggerLimit, PagingOptions};

/// Lifecycle of an attached container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Content wrapped, next link not yet managed
    Wrapped,
    /// Watching for the next trigger
    Active,
    /// Scaffolding removed, state cleared
    TornDown,
}

/// Where scroll events come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRegion {
    Window,
    /// The container scrolls itself
    Element(NodeId),
}

impl ScrollRegion {
    pub fn target(&self) -> EventTarget {
        match *self {
            ScrollRegion::Window => EventTarget::Window,
            ScrollRegion::Element(id) => EventTarget::Node(id),
        }
    }
}

/// A node hidden to keep the next link out of sight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenNode {
    pub node: NodeId,
    pub kind: HideKind,
}

/// How a node came to be hidden, and what restoring it takes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HideKind {
    /// Wrapper created around the link; unwrapped on restore
    CreatedWrapper,
    /// The link's own parent, marked and hidden
    ReusedParent { prior_style: Option<String>, had_class: bool },
    /// Closest `paging_selector` ancestor of the link
    PagingAncestor { prior_style: Option<String> },
}

/// State of one attached container
#[derive(Debug, Clone)]
pub struct ContainerState {
    pub initialized: bool,
    /// A fetch is in flight
    pub waiting: bool,
    /// Composite URL of the next page; `None` when there are no more pages
    pub next_href: Option<String>,
    pub options: PagingOptions,
    pub phase: Phase,
    pub region: ScrollRegion,
    /// Scroll-triggered loads left before switching to clicks
    pub remaining: AutoTriggerLimit,
    /// Link the current `next_href` came from
    pub next_link: Option<NodeId>,
    pub hidden: Vec<HiddenNode>,
    /// Activation this state belongs to
    pub generation: u64,
    /// Pages appended so far
    pub loads: usize,
}

impl ContainerState {
    pub(crate) fn new(options: PagingOptions, region: ScrollRegion, generation: u64) -> Self {
        Self {
            initialized: true,
            waiting: false,
            next_href: None,
            remaining: options.auto_trigger_until,
            options,
            phase: Phase::Wrapped,
            region,
            next_link: None,
            hidden: Vec::new(),
            generation,
            loads: 0,
        }
    }

    pub(crate) fn record_hidden(&mut self, hidden: HiddenNode) {
        if !self.hidden.iter().any(|h| h.node == hidden.node) {
            self.hidden.push(hidden);
        }
    }

    /// Snapshot for diagnostics
    pub fn summary(&self) -> Value {
        json!({
            "initialized": self.initialized,
            "waiting": self.waiting,
            "nextHref": self.next_href,
            "phase": format!("{:?}", self.phase),
            "loads": self.loads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_hidden_once() {
        let mut state = ContainerState::new(PagingOptions::default(), ScrollRegion::Window, 1);
        let node = HiddenNode { node: NodeId::ROOT, kind: HideKind::CreatedWrapper };
        state.record_hidden(node.clone());
        state.record_hidden(node);
        assert_eq!(state.hidden.len(), 1);
    }

    #[test]
    fn test_summary() {
        let mut state = ContainerState::new(PagingOptions::default(), ScrollRegion::Window, 1);
        state.next_href = Some("/page/2".into());
        let summary = state.summary();
        assert_eq!(summary["nextHref"], "/page/2");
        assert_eq!(summary["waiting"], false);
    }
}
