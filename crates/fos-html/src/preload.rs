//! Preload queue
//!
//! Resources discovered ahead of need (the paging spinner image, for one)
//! are queued here and handed to whoever owns the fetcher. A URL is only
//! ever queued once per queue.

use std::collections::{HashSet, VecDeque};

use crate::HtmlParser;

/// Preload queue
#[derive(Debug, Default)]
pub struct PreloadQueue {
    discovered: VecDeque<PreloadResource>,
    requested: HashSet<String>,
}

/// Preload resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadResource {
    pub url: String,
    pub resource_type: ResourceType,
}

/// Resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Image,
    Document,
    Fetch,
}

impl PreloadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `url` unless it was requested before. Returns true when queued.
    pub fn request(&mut self, url: &str, resource_type: ResourceType) -> bool {
        if url.is_empty() || !self.requested.insert(url.to_string()) {
            return false;
        }
        tracing::trace!("preload queued: {}", url);
        self.discovered.push_back(PreloadResource {
            url: url.to_string(),
            resource_type,
        });
        true
    }

    /// Next resource to load
    pub fn next(&mut self) -> Option<PreloadResource> {
        self.discovered.pop_front()
    }

    /// Take every queued resource
    pub fn drain(&mut self) -> Vec<PreloadResource> {
        self.discovered.drain(..).collect()
    }

    /// Has `url` ever been requested
    pub fn was_requested(&self, url: &str) -> bool {
        self.requested.contains(url)
    }

    /// Resources waiting to be loaded
    pub fn len(&self) -> usize {
        self.discovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discovered.is_empty()
    }
}

/// `src` of the first `<img>` at the top level of an HTML snippet
///
/// Only images that are themselves top-level nodes of the snippet count;
/// an image nested inside a wrapper element is ignored.
pub fn top_level_image_src(html: &str) -> Option<String> {
    let doc = HtmlParser::new().parse(html);
    let tree = doc.tree();
    tree.element_children(doc.body())
        .into_iter()
        .find(|&id| tree.tag_name(id) == Some("img"))
        .and_then(|id| tree.attr(id, "src"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_dedupes() {
        let mut queue = PreloadQueue::new();
        assert!(queue.request("/spinner.gif", ResourceType::Image));
        assert!(!queue.request("/spinner.gif", ResourceType::Image));
        assert_eq!(queue.len(), 1);

        let taken = queue.drain();
        assert_eq!(taken[0].url, "/spinner.gif");
        assert!(queue.is_empty());

        // Still remembered after draining
        assert!(!queue.request("/spinner.gif", ResourceType::Image));
        assert!(queue.was_requested("/spinner.gif"));
    }

    #[test]
    fn test_top_level_image_src() {
        assert_eq!(
            top_level_image_src(r#"<img src="/spinner.gif"> Loading"#).as_deref(),
            Some("/spinner.gif")
        );
        assert_eq!(top_level_image_src(r#"<span><img src="/nested.gif"></span>"#), None);
        assert_eq!(top_level_image_src("<small>Loading...</small>"), None);
    }
}
