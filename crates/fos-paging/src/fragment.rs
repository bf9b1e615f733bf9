//! Fetched page insertion

use fos_dom::{DomTree, NodeId, Selector};
use fos_html::HtmlParser;

use crate::PagingError;

/// Split a composite href into the URL and the optional content selector
///
/// Everything after the first run of whitespace is the selector.
pub fn split_href(href: &str) -> (&str, Option<&str>) {
    let href = href.trim();
    match href.split_once(char::is_whitespace) {
        Some((url, selector)) => {
            let selector = selector.trim();
            (url, (!selector.is_empty()).then_some(selector))
        }
        None => (href, None),
    }
}

/// Replace the children of `target` with a fetched page
///
/// Without a selector the whole page goes in, minus its document wrappers.
/// With one, only the outermost elements matching it are copied over, in
/// document order.
pub fn insert_fragment(
    tree: &mut DomTree,
    target: NodeId,
    html: &str,
    selector: Option<&str>,
) -> Result<Vec<NodeId>, PagingError> {
    tree.clear_children(target)?;

    let Some(selector) = selector else {
        return Ok(HtmlParser::new().parse_fragment(tree, target, html)?);
    };

    let selector = Selector::parse(selector)?;
    let page = HtmlParser::new().parse(html);
    let source = page.tree();
    let matches = selector.select_all(source, source.root());

    let mut inserted = Vec::new();
    for &found in &matches {
        let nested = matches.iter().any(|&other| other != found && source.contains(other, found));
        if nested {
            continue;
        }
        let copy = tree.import_subtree(source, found)?;
        tree.append_child(target, copy)?;
        inserted.push(copy);
    }
    tracing::debug!("inserted {} of {} matches", inserted.len(), matches.len());
    Ok(inserted)
}
