//! fOS Paging
//!
//! Infinite scroll for fOS documents. A [`Pager`] attaches to container
//! elements, watches their scroll region, and when the reader nears the
//! bottom fetches the page behind the container's "next" link and appends it
//! in place. The cycle repeats until a fetched page carries no next link.
//!
//! Fetching is sans-IO: a load queues a [`FetchTicket`] which the host
//! completes with [`Pager::complete`], or which [`Pager::drive`] completes
//! through any [`fos_net::Fetcher`].

mod controller;
mod diagnostics;
mod fragment;
mod markup;
mod options;
mod state;

pub use controller::{Containers, FetchTicket, Pager};
pub use diagnostics::Diagnostics;
pub use fragment::{insert_fragment, split_href};
pub use options::{AutoTriggerLimit, LoadingHook, PageCallback, PagingConfig, PagingOptions};
pub use state::{ContainerState, HiddenNode, HideKind, Phase, ScrollRegion};

/// Wrapper around a container's original and appended content
pub const INNER_CLASS: &str = "paging-inner";
/// Wrapper around one fetched page
pub const ADDED_CLASS: &str = "paging-added";
/// Hidden element holding the current next link
pub const NEXT_PARENT_CLASS: &str = "paging-next-parent";
/// Placeholder shown while a page is in flight
pub const LOADING_CLASS: &str = "paging-loading";
pub const LOADING_ID: &str = "paging-loading";
/// Listener namespace
pub const NAMESPACE: &str = "paging";
/// Container attribute holding a JSON options record
pub const CONFIG_ATTR: &str = "data-paging";

/// Paging errors
///
/// These never reach callers of the public entry points; a failed step is
/// logged and the affected container is torn down.
#[derive(Debug, thiserror::Error)]
pub enum PagingError {
    #[error("DOM error: {0}")]
    Dom(#[from] fos_dom::DomError),

    #[error("HTML error: {0}")]
    Html(#[from] fos_html::ParseError),

    #[error("invalid content selector: {0}")]
    Selector(#[from] fos_dom::SelectorError),

    #[error("invalid options record: {0}")]
    Config(#[from] serde_json::Error),

    #[error("fetch failed: {0}")]
    Fetch(#[from] fos_net::NetError),
}

/// `href` plus the content selector, trimmed; `None` for an empty href
pub(crate) fn compose_href(href: &str, content_selector: &str) -> Option<String> {
    if href.trim().is_empty() {
        return None;
    }
    Some(format!("{href} {content_selector}").trim().to_string())
}
