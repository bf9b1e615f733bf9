//! Container scaffolding
//!
//! The wrapper, placeholder and next-link hiding surgery a container goes
//! through, and its undoing at teardown.

use fos_dom::{DomResult, DomTree, ElementQuery, NodeId};
use fos_html::HtmlParser;

use crate::{
    HiddenNode, HideKind, PagingError, PagingOptions, ADDED_CLASS, INNER_CLASS, LOADING_CLASS,
    LOADING_ID, NEXT_PARENT_CLASS,
};

/// The container's content wrapper, if it has one
pub(crate) fn find_inner(tree: &DomTree, container: NodeId) -> Option<NodeId> {
    tree.query_selector(container, &format!("div.{INNER_CLASS}"))
}

/// Wrap every child of `container` unless a wrapper already exists
pub(crate) fn wrap_inner(tree: &mut DomTree, container: NodeId, wrapper_class: &str) -> DomResult<NodeId> {
    if let Some(inner) = find_inner(tree, container) {
        return Ok(inner);
    }
    let inner = tree.create_element("div");
    tree.set_attr(inner, "class", format!("{INNER_CLASS} {wrapper_class}").trim());
    tree.wrap_children(container, inner)
}

/// Append an added-page wrapper holding the loading placeholder
pub(crate) fn append_placeholder(
    tree: &mut DomTree,
    inner: NodeId,
    loading_html: &str,
) -> Result<NodeId, PagingError> {
    let added = tree.create_element("div");
    tree.set_attr(added, "class", ADDED_CLASS);
    tree.append_child(inner, added)?;

    let loading = tree.create_element("div");
    tree.set_attr(loading, "class", LOADING_CLASS);
    tree.set_attr(loading, "id", LOADING_ID);
    tree.append_child(added, loading)?;

    HtmlParser::new().parse_fragment(tree, loading, loading_html)?;
    Ok(added)
}

/// Hide the next link, or the element that stands for it
///
/// With a paging selector that is the link's closest match. Otherwise the
/// link's parent is marked and hidden, unless the parent is scaffolding, in
/// which case the link gets a hidden wrapper of its own.
pub(crate) fn hide_next(tree: &mut DomTree, options: &PagingOptions, link: NodeId) -> Option<HiddenNode> {
    if !options.paging_selector.is_empty() {
        let ancestor = tree.closest(link, &options.paging_selector)?;
        let prior_style = tree.attr(ancestor, "style").map(str::to_string);
        tree.hide(ancestor);
        return Some(HiddenNode {
            node: ancestor,
            kind: HideKind::PagingAncestor { prior_style },
        });
    }

    let parent = tree.parent(link)?;
    let scaffolding = tree.has_class(parent, INNER_CLASS) || tree.has_class(parent, ADDED_CLASS);
    if tree.is_element(parent) && !scaffolding {
        let prior_style = tree.attr(parent, "style").map(str::to_string);
        let had_class = tree.has_class(parent, NEXT_PARENT_CLASS);
        tree.add_class(parent, NEXT_PARENT_CLASS);
        tree.hide(parent);
        return Some(HiddenNode {
            node: parent,
            kind: HideKind::ReusedParent { prior_style, had_class },
        });
    }

    let wrapper = tree.create_element("div");
    tree.set_attr(wrapper, "class", NEXT_PARENT_CLASS);
    if let Err(err) = tree.wrap(link, wrapper) {
        tracing::debug!("cannot wrap next link: {}", err);
        return None;
    }
    tree.hide(wrapper);
    Some(HiddenNode {
        node: wrapper,
        kind: HideKind::CreatedWrapper,
    })
}

/// Detach every next-link holder inside `container`
pub(crate) fn remove_next_parents(tree: &mut DomTree, container: NodeId) -> usize {
    let holders = tree.get_elements_by_class_name(container, NEXT_PARENT_CLASS);
    for &holder in &holders {
        if let Err(err) = tree.detach(holder) {
            tracing::debug!("cannot remove next-link holder: {}", err);
        }
    }
    holders.len()
}

/// Put hidden nodes back the way they were, newest first
pub(crate) fn restore_hidden(tree: &mut DomTree, hidden: Vec<HiddenNode>) {
    for HiddenNode { node, kind } in hidden.into_iter().rev() {
        if tree.get(node).is_none() {
            continue;
        }
        match kind {
            HideKind::CreatedWrapper => {
                if tree.parent(node).is_some() {
                    if let Err(err) = tree.unwrap(node) {
                        tracing::debug!("cannot unwrap next-link hider: {}", err);
                    }
                }
            }
            HideKind::ReusedParent { prior_style, had_class } => {
                if !had_class {
                    tree.remove_class(node, NEXT_PARENT_CLASS);
                }
                restore_style(tree, node, prior_style);
            }
            HideKind::PagingAncestor { prior_style } => restore_style(tree, node, prior_style),
        }
    }
}

fn restore_style(tree: &mut DomTree, node: NodeId, prior: Option<String>) {
    match prior {
        Some(style) => tree.set_attr(node, "style", style),
        None => {
            tree.remove_attr(node, "style");
        }
    }
}

/// Remove placeholders and unwrap added pages and the content wrapper
pub(crate) fn unscaffold(tree: &mut DomTree, container: NodeId) {
    for loading in tree.get_elements_by_class_name(container, LOADING_CLASS) {
        if let Err(err) = tree.detach(loading) {
            tracing::trace!("cannot remove loading placeholder: {}", err);
        }
    }
    for inner in tree.get_elements_by_class_name(container, INNER_CLASS) {
        for child in tree.element_children(inner) {
            if tree.has_class(child, ADDED_CLASS) {
                if let Err(err) = tree.unwrap(child) {
                    tracing::debug!("cannot unwrap added page: {}", err);
                }
            }
        }
        if let Err(err) = tree.unwrap(inner) {
            tracing::debug!("cannot unwrap content wrapper: {}", err);
        }
    }
}
