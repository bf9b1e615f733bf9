//! Paging controller
//!
//! [`Pager`] owns the state of every container it has attached to. The host
//! feeds it scroll and click events and completes the fetches it asks for;
//! everything else (wrapping, threshold checks, inserting pages, teardown)
//! happens here.

use std::collections::{HashMap, HashSet, VecDeque};

use fos_dom::{Document, DomEvent, ElementQuery, EventTarget, EventType, NodeId, Overflow};
use fos_html::{top_level_image_src, PreloadQueue, PreloadResource, ResourceType};
use fos_layout::BlockLayout;
use fos_net::{Fetcher, NetError};
use serde_json::json;

use crate::fragment::{insert_fragment, split_href};
use crate::{
    compose_href, markup, ContainerState, Diagnostics, HideKind, PagingConfig, PagingOptions, Phase,
    ScrollRegion, CONFIG_ATTR, NAMESPACE,
};

/// Which elements to attach to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Containers {
    /// Every element in the document matching a selector
    Selector(String),
    Node(NodeId),
    Nodes(Vec<NodeId>),
}

impl From<&str> for Containers {
    fn from(selector: &str) -> Self {
        Containers::Selector(selector.to_string())
    }
}

impl From<String> for Containers {
    fn from(selector: String) -> Self {
        Containers::Selector(selector)
    }
}

impl From<NodeId> for Containers {
    fn from(id: NodeId) -> Self {
        Containers::Node(id)
    }
}

impl From<Vec<NodeId>> for Containers {
    fn from(ids: Vec<NodeId>) -> Self {
        Containers::Nodes(ids)
    }
}

impl From<&[NodeId]> for Containers {
    fn from(ids: &[NodeId]) -> Self {
        Containers::Nodes(ids.to_vec())
    }
}

/// One outstanding page fetch
///
/// Completed exactly once, by [`Pager::complete`] or [`Pager::drive`].
#[derive(Debug, PartialEq, Eq)]
pub struct FetchTicket {
    id: u64,
    container: NodeId,
    generation: u64,
    href: String,
    target: NodeId,
}

impl FetchTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Composite href, content selector included
    pub fn href(&self) -> &str {
        &self.href
    }

    /// URL part of the href, the thing to actually fetch
    pub fn url(&self) -> &str {
        split_href(&self.href).0
    }

    /// Element the page will be inserted into
    pub fn target(&self) -> NodeId {
        self.target
    }
}

/// Paging controller
#[derive(Debug, Default)]
pub struct Pager {
    states: HashMap<NodeId, ContainerState>,
    torn_down: HashSet<NodeId>,
    pending: VecDeque<FetchTicket>,
    preloads: PreloadQueue,
    generation: u64,
    tickets: u64,
}

impl Pager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to `containers`; returns the containers this call activated
    ///
    /// Containers already attached are skipped. A container without a next
    /// link is activated and torn down again straight away.
    pub fn attach(
        &mut self,
        doc: &mut Document,
        containers: impl Into<Containers>,
        config: impl Into<PagingConfig>,
    ) -> Vec<NodeId> {
        let config = config.into();
        let targets = match containers.into() {
            Containers::Selector(selector) => doc.tree().query_selector_all(doc.tree().root(), &selector),
            Containers::Node(id) => vec![id],
            Containers::Nodes(ids) => ids,
        };
        targets
            .into_iter()
            .filter(|&container| self.attach_to(doc, container, &config))
            .collect()
    }

    /// Attach to a single container
    pub fn attach_to(&mut self, doc: &mut Document, container: NodeId, config: &PagingConfig) -> bool {
        if !doc.tree().is_element(container) {
            return false;
        }
        if self.states.get(&container).is_some_and(|s| s.initialized) {
            tracing::trace!("{:?} already attached", container);
            return false;
        }

        let carried = carried_config(doc, container, config.debug.unwrap_or(false));
        let options = PagingOptions::resolve(config, &carried);

        let region = if doc.tree().style(container).overflow_y == Overflow::Visible {
            ScrollRegion::Window
        } else {
            ScrollRegion::Element(container)
        };

        let next_link = doc.tree().query_selector(container, &options.next_selector);
        let next_href = next_link
            .and_then(|link| doc.tree().attr(link, "href"))
            .and_then(|href| compose_href(href, &options.content_selector));

        self.generation += 1;
        let mut state = ContainerState::new(options, region, self.generation);
        state.next_href = next_href;
        state.next_link = next_link;
        let wrapper_class = state.options.wrapper_class.clone();
        let loading_html = state.options.loading_html.clone();

        tracing::debug!("attaching to {:?}, next {:?}", container, state.next_href);
        self.torn_down.remove(&container);
        self.states.insert(container, state);

        if let Err(err) = markup::wrap_inner(doc.tree_mut(), container, &wrapper_class) {
            tracing::warn!("cannot wrap content of {:?}: {}", container, err);
        }
        if let Some(src) = top_level_image_src(&loading_html) {
            self.preloads.request(&src, ResourceType::Image);
        }

        if self.check_next_href(doc, container) {
            if let Some(state) = self.states.get_mut(&container) {
                state.phase = Phase::Active;
            }
        }
        true
    }

    /// Tear down a container; returns whether it was attached
    ///
    /// Safe to call on containers that were never attached, and more than once.
    pub fn destroy(&mut self, doc: &mut Document, container: NodeId) -> bool {
        doc.events_mut().unbind_owner(NAMESPACE, container);
        self.pending.retain(|t| t.container != container);

        let state = self.states.remove(&container);
        let tree = doc.tree_mut();
        if let Some(state) = &state {
            markup::restore_hidden(tree, state.hidden.clone());
        }
        markup::unscaffold(tree, container);

        if state.is_some() {
            tracing::debug!("destroyed paging on {:?}", container);
            // Only containers still in the document are worth remembering
            self.torn_down.retain(|&n| doc.tree().is_attached(n));
            self.torn_down.insert(container);
        }
        state.is_some()
    }

    pub fn state(&self, container: NodeId) -> Option<&ContainerState> {
        self.states.get(&container)
    }

    /// `None` for containers never attached
    pub fn phase(&self, container: NodeId) -> Option<Phase> {
        match self.states.get(&container) {
            Some(state) => Some(state.phase),
            None if self.torn_down.contains(&container) => Some(Phase::TornDown),
            None => None,
        }
    }

    pub fn is_active(&self, container: NodeId) -> bool {
        self.phase(container) == Some(Phase::Active)
    }

    /// Deliver a scroll event; returns how many loads it started
    pub fn dispatch_scroll(&mut self, doc: &mut Document, target: EventTarget) -> usize {
        let owners = doc.events().owners(target, EventType::Scroll, NAMESPACE);
        owners
            .into_iter()
            .filter(|&container| self.check_threshold(doc, container))
            .count()
    }

    /// Deliver a click on `node`
    ///
    /// A click on a container's next link hides it and starts a load. The
    /// returned event has its default action prevented when a container
    /// handled it.
    pub fn dispatch_click(&mut self, doc: &mut Document, node: NodeId) -> DomEvent {
        let target = EventTarget::Node(node);
        let mut event = DomEvent::new(EventType::Click, target);

        for container in doc.events().owners(target, EventType::Click, NAMESPACE) {
            let Some(state) = self.states.get_mut(&container) else {
                continue;
            };
            event.prevent_default();
            event.stop_propagation();
            if state.waiting {
                continue;
            }
            if let Some(hidden) = markup::hide_next(doc.tree_mut(), &state.options, node) {
                state.record_hidden(hidden);
            }
            self.load_next(doc, container);
        }
        event
    }

    /// Start a load if the scroll region is close enough to the bottom
    pub fn check_threshold(&mut self, doc: &mut Document, container: NodeId) -> bool {
        let Some(state) = self.states.get(&container) else {
            return false;
        };
        if state.waiting || !doc.is_visible(container) {
            return false;
        }
        let inner = match markup::wrap_inner(doc.tree_mut(), container, &state.options.wrapper_class) {
            Ok(inner) => inner,
            Err(err) => {
                tracing::warn!("cannot wrap content of {:?}: {}", container, err);
                return false;
            }
        };

        let layout = BlockLayout::new(doc);
        let style = doc.tree().style(container);
        let (top, region_height) = match state.region {
            ScrollRegion::Window => (doc.viewport().scroll_top, doc.viewport().height),
            ScrollRegion::Element(_) => (layout.offset_top(container), layout.height(container)),
        };
        let covered = (top - layout.offset_top(inner) + region_height + style.border.top + style.padding.top).ceil();
        let inner_height = layout.outer_height(inner);

        if covered + state.options.padding < inner_height {
            return false;
        }
        Diagnostics::new(state.options.debug).emit(
            "info",
            &[
                json!("paging:"),
                json!(inner_height - covered),
                json!("from bottom. Loading next request..."),
            ],
        );
        self.load_next(doc, container)
    }

    /// Insert the placeholder and queue a fetch of the next page
    ///
    /// Returns false when a fetch is already in flight or there is no next page.
    pub fn load_next(&mut self, doc: &mut Document, container: NodeId) -> bool {
        let Some(state) = self.states.get_mut(&container) else {
            return false;
        };
        if state.waiting {
            return false;
        }
        let Some(href) = state.next_href.clone() else {
            return false;
        };

        let tree = doc.tree_mut();
        let target = markup::wrap_inner(tree, container, &state.options.wrapper_class)
            .map_err(crate::PagingError::from)
            .and_then(|inner| markup::append_placeholder(tree, inner, &state.options.loading_html));
        let target = match target {
            Ok(target) => target,
            Err(err) => {
                tracing::warn!("cannot insert loading placeholder: {}", err);
                return false;
            }
        };
        state.waiting = true;
        if let Some(hook) = &state.options.loading_function {
            hook.call();
        }
        let generation = state.generation;

        if let Some(inner) = markup::find_inner(doc.tree(), container) {
            let bottom = BlockLayout::new(doc).outer_height(inner);
            fos_layout::scroll_to(doc, container, bottom);
        }

        self.tickets += 1;
        tracing::debug!("queueing fetch #{} of {}", self.tickets, href);
        self.pending.push_back(FetchTicket {
            id: self.tickets,
            container,
            generation,
            href,
            target,
        });
        true
    }

    /// Tickets waiting to be fetched, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &FetchTicket> {
        self.pending.iter()
    }

    pub fn take_pending(&mut self) -> Vec<FetchTicket> {
        self.pending.drain(..).collect()
    }

    /// Resources to warm up, each handed out once
    pub fn take_preloads(&mut self) -> Vec<PreloadResource> {
        self.preloads.drain()
    }

    /// Finish a fetch with the page body or the error it failed with
    ///
    /// Returns whether a page was inserted. Tickets whose container was torn
    /// down or re-attached since are ignored.
    pub fn complete(&mut self, doc: &mut Document, ticket: FetchTicket, result: Result<String, NetError>) -> bool {
        let FetchTicket {
            id,
            container,
            generation,
            href,
            target,
        } = ticket;

        let Some(state) = self.states.get(&container) else {
            tracing::debug!("dropping fetch #{}: container no longer attached", id);
            return false;
        };
        if state.generation != generation || !doc.tree().contains(container, target) {
            tracing::debug!("dropping stale fetch #{}", id);
            return false;
        }
        let diagnostics = Diagnostics::new(state.options.debug);

        let html = match result {
            Ok(html) => html,
            Err(err) => {
                diagnostics.emit("error", &[json!("paging: request failed:"), json!(err.to_string())]);
                tracing::warn!("fetch of {} failed: {}", href, err);
                self.destroy(doc, container);
                return false;
            }
        };

        let (_, selector) = split_href(&href);
        if let Err(err) = insert_fragment(doc.tree_mut(), target, &html, selector) {
            tracing::warn!("cannot insert {}: {}", href, err);
            self.destroy(doc, container);
            return false;
        }

        let Some(state) = self.states.get_mut(&container) else {
            return false;
        };
        let next_link = doc.tree().query_selector(target, &state.options.next_selector);
        state.next_href = next_link
            .and_then(|link| doc.tree().attr(link, "href"))
            .and_then(|h| compose_href(h, &state.options.content_selector));
        state.next_link = next_link;
        state.waiting = false;
        state.loads += 1;

        markup::remove_next_parents(doc.tree_mut(), container);
        // Pagination of earlier pages stays hidden for good
        let tree = doc.tree();
        state.hidden.retain(|h| {
            matches!(h.kind, HideKind::PagingAncestor { .. })
                && next_link.is_some_and(|link| tree.contains(h.node, link))
        });

        let callback = state.options.callback.clone();
        self.check_next_href(doc, container);

        if let Some(callback) = callback {
            callback.call(&href);
        }
        let summary = self
            .states
            .get(&container)
            .map_or_else(|| json!({"phase": "TornDown"}), ContainerState::summary);
        diagnostics.emit("dir", &[summary]);
        true
    }

    /// Complete every queued ticket through `fetcher`
    ///
    /// Queued preloads are fetched first. Completions that queue further
    /// loads are driven too, so this returns once nothing is pending.
    /// Returns how many tickets were completed.
    pub async fn drive<F: Fetcher>(&mut self, doc: &mut Document, fetcher: &F) -> usize {
        let mut completed = 0;
        loop {
            for preload in self.preloads.drain() {
                if let Err(err) = fetcher.fetch(&preload.url).await {
                    tracing::debug!("preload of {} failed: {}", preload.url, err);
                }
            }
            let Some(ticket) = self.pending.pop_front() else {
                break;
            };
            let result = fetcher.fetch(ticket.url()).await.map(|response| response.text());
            self.complete(doc, ticket, result);
            completed += 1;
        }
        completed
    }

    /// Tear down when there is no next page, otherwise manage the next link
    fn check_next_href(&mut self, doc: &mut Document, container: NodeId) -> bool {
        let Some(state) = self.states.get(&container) else {
            return false;
        };
        if state.next_href.is_none() {
            Diagnostics::new(state.options.debug)
                .emit("warn", &[json!("paging: nextSelector not found - destroying")]);
            self.destroy(doc, container);
            return false;
        }
        self.bind_trigger(doc, container);
        true
    }

    /// Arm the scroll trigger, or the click trigger once auto loads run out
    fn bind_trigger(&mut self, doc: &mut Document, container: NodeId) {
        let Some(state) = self.states.get_mut(&container) else {
            return;
        };
        let Some(link) = state.next_link.filter(|&l| doc.tree().contains(container, l)) else {
            return;
        };

        doc.events_mut().unbind_type(EventType::Click, NAMESPACE, container);
        doc.events_mut().unbind_type(EventType::Scroll, NAMESPACE, container);

        if !(state.options.auto_trigger && state.remaining.allows_auto()) {
            doc.events_mut()
                .bind(EventTarget::Node(link), EventType::Click, NAMESPACE, container);
            return;
        }

        if let Some(hidden) = markup::hide_next(doc.tree_mut(), &state.options, link) {
            state.record_hidden(hidden);
        }
        doc.events_mut()
            .bind(state.region.target(), EventType::Scroll, NAMESPACE, container);
        state.remaining.consume();

        if fills_less_than_viewport(doc, container) {
            self.check_threshold(doc, container);
        }
    }
}

/// Options record carried on the container itself
fn carried_config(doc: &Document, container: NodeId, debug: bool) -> PagingConfig {
    let Some(json) = doc.tree().attr(container, CONFIG_ATTR) else {
        return PagingConfig::default();
    };
    PagingConfig::from_json(json).unwrap_or_else(|err| {
        tracing::debug!("ignoring {} on {:?}: {}", CONFIG_ATTR, container, err);
        Diagnostics::new(debug).emit("warn", &[json!("paging: ignoring malformed options record:"), json!(err.to_string())]);
        PagingConfig::default()
    })
}

/// Whether the container's content is shorter than the visible window
fn fills_less_than_viewport(doc: &Document, container: NodeId) -> bool {
    let layout = BlockLayout::new(doc);
    let top = layout.offset_top(container);
    let below_top = layout.height(doc.body()) - top;
    let scrolling = layout.height(container).min(below_top);

    let viewport = doc.viewport();
    let visible_from = top - viewport.scroll_top;
    let window = if visible_from > 0.0 {
        viewport.height - visible_from
    } else {
        viewport.height
    };
    scrolling <= window
}
