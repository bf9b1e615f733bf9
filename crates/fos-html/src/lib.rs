//! fOS HTML Parser
//!
//! HTML5 parsing built on html5ever, converting into the fOS DOM, plus the
//! serializer and preload helpers used when splicing fetched fragments into
//! a live document.

mod parser;
mod serializer;
mod preload;

pub use parser::HtmlParser;
pub use serializer::HtmlSerializer;
pub use preload::{top_level_image_src, PreloadQueue, PreloadResource, ResourceType};

pub use fos_dom::{Document, DomTree, NodeId};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("cannot insert parsed content: {0}")]
    Insert(#[from] fos_dom::DomError),
}
