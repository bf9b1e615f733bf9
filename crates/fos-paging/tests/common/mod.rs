//! Shared fixtures for the paging integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use fos_dom::{Document, ElementQuery, NodeId};
use fos_html::HtmlParser;
use fos_net::{Fetcher, NetError, Response};

/// Serves pages from a table and records every request
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|r| *r == url).count()
    }
}

impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<Response, NetError> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages
            .get(url)
            .map(|html| Response::html(html.clone()))
            .ok_or(NetError::HttpError { status: 404 })
    }
}

pub fn document(html: &str) -> Document {
    HtmlParser::new().parse(html)
}

pub fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id).unwrap()
}

/// Elements anywhere in the document carrying `class`
pub fn with_class(doc: &Document, class: &str) -> Vec<NodeId> {
    doc.tree().get_elements_by_class_name(doc.tree().root(), class)
}

/// Tag names of the element children of `id`
pub fn child_tags(doc: &Document, id: NodeId) -> Vec<String> {
    doc.tree()
        .element_children(id)
        .into_iter()
        .filter_map(|c| doc.tree().tag_name(c).map(str::to_string))
        .collect()
}

pub fn query(doc: &Document, selector: &str) -> Option<NodeId> {
    doc.tree().query_selector(doc.tree().root(), selector)
}
