//! DOM Events
//!
//! Listener bookkeeping with dotted event namespaces. The registry records
//! who listens where; the component that owns a listener does the actual
//! handling when the host dispatches an event to it.

use crate::NodeId;

/// Event types the engine dispatches to components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Scroll,
    Click,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Scroll => "scroll",
            EventType::Click => "click",
        }
    }

    /// Whether the default action can be prevented
    pub fn is_cancelable(&self) -> bool {
        matches!(self, EventType::Click)
    }
}

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The browsing window (viewport scrolling)
    Window,
    /// An element
    Node(NodeId),
}

/// A registered listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    pub target: EventTarget,
    pub event_type: EventType,
    pub namespace: String,
    /// Component instance the listener belongs to
    pub owner: NodeId,
}

/// Namespaced listener registry
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    listeners: Vec<Listener>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; registering the same listener twice is a no-op
    pub fn bind(&mut self, target: EventTarget, event_type: EventType, namespace: &str, owner: NodeId) {
        let listener = Listener {
            target,
            event_type,
            namespace: namespace.to_string(),
            owner,
        };
        if !self.listeners.contains(&listener) {
            tracing::trace!("bind {}.{} on {:?}", event_type.as_str(), namespace, target);
            self.listeners.push(listener);
        }
    }

    /// Remove an owner's listeners in `namespace` on `target`
    pub fn unbind(&mut self, target: EventTarget, namespace: &str, owner: NodeId) -> usize {
        self.remove_where(|l| l.target == target && l.namespace == namespace && l.owner == owner)
    }

    /// Remove an owner's listeners of one type in `namespace`, wherever they are
    pub fn unbind_type(&mut self, event_type: EventType, namespace: &str, owner: NodeId) -> usize {
        self.remove_where(|l| l.event_type == event_type && l.namespace == namespace && l.owner == owner)
    }

    /// Remove every listener an owner holds in `namespace`
    pub fn unbind_owner(&mut self, namespace: &str, owner: NodeId) -> usize {
        self.remove_where(|l| l.namespace == namespace && l.owner == owner)
    }

    fn remove_where(&mut self, pred: impl Fn(&Listener) -> bool) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|l| !pred(l));
        before - self.listeners.len()
    }

    pub fn is_bound(&self, target: EventTarget, event_type: EventType, namespace: &str) -> bool {
        self.listeners
            .iter()
            .any(|l| l.target == target && l.event_type == event_type && l.namespace == namespace)
    }

    /// Owners listening for `event_type` on `target` in `namespace`
    pub fn owners(&self, target: EventTarget, event_type: EventType, namespace: &str) -> Vec<NodeId> {
        self.listeners
            .iter()
            .filter(|l| l.target == target && l.event_type == event_type && l.namespace == namespace)
            .map(|l| l.owner)
            .collect()
    }

    /// Listeners held by an owner in `namespace`
    pub fn owned_by(&self, namespace: &str, owner: NodeId) -> impl Iterator<Item = &Listener> {
        let namespace = namespace.to_string();
        self.listeners
            .iter()
            .filter(move |l| l.namespace == namespace && l.owner == owner)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// A dispatched event
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub event_type: EventType,
    pub target: EventTarget,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    pub fn new(event_type: EventType, target: EventTarget) -> Self {
        Self {
            event_type,
            target,
            cancelable: event_type.is_cancelable(),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_is_idempotent() {
        let mut events = EventRegistry::new();
        events.bind(EventTarget::Window, EventType::Scroll, "paging", NodeId(3));
        events.bind(EventTarget::Window, EventType::Scroll, "paging", NodeId(3));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_unbind_is_per_owner() {
        let mut events = EventRegistry::new();
        events.bind(EventTarget::Window, EventType::Scroll, "paging", NodeId(3));
        events.bind(EventTarget::Window, EventType::Scroll, "paging", NodeId(7));
        events.bind(EventTarget::Node(NodeId(9)), EventType::Click, "paging", NodeId(3));

        assert_eq!(events.unbind(EventTarget::Window, "paging", NodeId(3)), 1);
        assert_eq!(events.owners(EventTarget::Window, EventType::Scroll, "paging"), vec![NodeId(7)]);
        assert_eq!(events.unbind_owner("paging", NodeId(3)), 1);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_click_is_cancelable() {
        let mut click = DomEvent::new(EventType::Click, EventTarget::Node(NodeId(1)));
        click.prevent_default();
        assert!(click.is_default_prevented());

        let mut scroll = DomEvent::new(EventType::Scroll, EventTarget::Window);
        scroll.prevent_default();
        assert!(!scroll.is_default_prevented());
    }
}
