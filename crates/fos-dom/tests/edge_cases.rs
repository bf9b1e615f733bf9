//! Edge case tests for fos-dom
//!
//! Tree surgery, selector queries, inline style and listener bookkeeping.

use fos_dom::{
    Document, DomError, ElementQuery, EventRegistry, EventTarget, EventType, NodeId, Overflow, Selector,
    SelectorError,
};

fn element(doc: &mut Document, parent: NodeId, tag: &str, class: &str) -> NodeId {
    let id = doc.tree.create_element(tag);
    if !class.is_empty() {
        doc.tree.set_attr(id, "class", class);
    }
    doc.tree.append_child(parent, id).unwrap();
    id
}

fn text(doc: &mut Document, parent: NodeId, content: &str) -> NodeId {
    let id = doc.tree.create_text(content);
    doc.tree.append_child(parent, id).unwrap();
    id
}

// ============================================================================
// TREE SURGERY
// ============================================================================

#[test]
fn test_append_moves_attached_node() {
    let mut doc = Document::default();
    let body = doc.body();
    let a = element(&mut doc, body, "div", "a");
    let b = element(&mut doc, body, "div", "b");
    let p = element(&mut doc, a, "p", "");

    doc.tree.append_child(b, p).unwrap();
    assert!(doc.tree().element_children(a).is_empty());
    assert_eq!(doc.tree().element_children(b), vec![p]);
    assert_eq!(doc.tree().parent(p), Some(b));
}

#[test]
fn test_cycle_rejected() {
    let mut doc = Document::default();
    let body = doc.body();
    let outer = element(&mut doc, body, "div", "");
    let inner = element(&mut doc, outer, "div", "");

    assert_eq!(doc.tree.append_child(inner, outer), Err(DomError::HierarchyRequest(outer)));
    assert_eq!(doc.tree.append_child(outer, outer), Err(DomError::HierarchyRequest(outer)));
    assert_eq!(doc.tree.append_child(body, NodeId::ROOT), Err(DomError::HierarchyRequest(NodeId::ROOT)));
}

#[test]
fn test_text_cannot_hold_children() {
    let mut doc = Document::default();
    let body = doc.body();
    let t = text(&mut doc, body, "x");
    let span = doc.tree.create_element("span");

    assert_eq!(doc.tree.append_child(t, span), Err(DomError::InvalidNodeType(t)));
}

#[test]
fn test_insert_before_foreign_reference() {
    let mut doc = Document::default();
    let body = doc.body();
    let a = element(&mut doc, body, "div", "");
    let head = doc.head();
    let elsewhere = element(&mut doc, head, "meta", "");
    let fresh = doc.tree.create_element("p");

    assert_eq!(doc.tree.insert_before(body, fresh, Some(elsewhere)), Err(DomError::NotAChild(elsewhere)));
    doc.tree.insert_before(body, fresh, Some(a)).unwrap();
    assert_eq!(doc.tree().element_children(body), vec![fresh, a]);
}

#[test]
fn test_wrap_and_unwrap_keep_order() {
    let mut doc = Document::default();
    let body = doc.body();
    let first = element(&mut doc, body, "p", "");
    let middle = element(&mut doc, body, "a", "");
    let last = element(&mut doc, body, "p", "");

    let wrapper = doc.tree.create_element("div");
    doc.tree.wrap(middle, wrapper).unwrap();
    assert_eq!(doc.tree().element_children(body), vec![first, wrapper, last]);
    assert_eq!(doc.tree().element_children(wrapper), vec![middle]);

    let moved = doc.tree.unwrap(wrapper).unwrap();
    assert_eq!(moved, vec![middle]);
    assert_eq!(doc.tree().element_children(body), vec![first, middle, last]);
    assert!(!doc.tree().is_attached(wrapper));
}

#[test]
fn test_wrap_detached_node_fails() {
    let mut doc = Document::default();
    let loose = doc.tree.create_element("a");
    let wrapper = doc.tree.create_element("div");

    assert_eq!(doc.tree.wrap(loose, wrapper), Err(DomError::NotAChild(loose)));
    assert_eq!(doc.tree.unwrap(loose), Err(DomError::NotAChild(loose)));
}

#[test]
fn test_wrap_children_of_empty_parent() {
    let mut doc = Document::default();
    let body = doc.body();
    let empty = element(&mut doc, body, "div", "");
    let wrapper = doc.tree.create_element("div");

    doc.tree.wrap_children(empty, wrapper).unwrap();
    assert_eq!(doc.tree().child_ids(empty), vec![wrapper]);
    assert!(doc.tree().child_ids(wrapper).is_empty());
}

#[test]
fn test_clear_children_detaches_subtrees() {
    let mut doc = Document::default();
    let body = doc.body();
    let p = element(&mut doc, body, "p", "");
    text(&mut doc, p, "gone");

    doc.tree.clear_children(body).unwrap();
    assert!(doc.tree().child_ids(body).is_empty());
    assert!(!doc.tree().is_attached(p));
    assert_eq!(doc.tree().text_content(p), "gone");
}

#[test]
fn test_missing_node_errors() {
    let mut doc = Document::default();
    let bogus = NodeId::NONE;
    assert_eq!(doc.tree.detach(bogus), Err(DomError::NotFound(bogus)));
    assert_eq!(doc.tree.clear_children(bogus), Err(DomError::NotFound(bogus)));
}

#[test]
fn test_import_subtree_between_trees() {
    let mut source = Document::default();
    let body = source.body();
    let div = element(&mut source, body, "div", "post");
    text(&mut source, div, "hello");

    let mut target = Document::default();
    let copy = target.tree.import_subtree(source.tree(), div).unwrap();
    assert!(!target.tree().is_attached(copy));
    let target_body = target.body();
    target.tree.append_child(target_body, copy).unwrap();

    assert!(target.tree().has_class(copy, "post"));
    assert_eq!(target.tree().text_content(target.body()), "hello");
    // Source untouched
    assert_eq!(source.tree().parent(div), Some(body));
}

// ============================================================================
// SELECTORS
// ============================================================================

#[test]
fn test_selector_errors() {
    assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
    assert!(matches!(Selector::parse("a:hover"), Err(SelectorError::UnsupportedPseudo(_))));
    assert!(matches!(Selector::parse("a:last span"), Err(SelectorError::MisplacedPosition(_))));
    assert!(matches!(Selector::parse("div["), Err(_)));
}

#[test]
fn test_last_filters_whole_set() {
    let mut doc = Document::default();
    let body = doc.body();
    let first_list = element(&mut doc, body, "ul", "");
    let a1 = element(&mut doc, first_list, "a", "");
    let second_list = element(&mut doc, body, "ul", "");
    let a2 = element(&mut doc, second_list, "a", "");
    let a3 = element(&mut doc, second_list, "a", "");

    assert_eq!(doc.tree().query_selector(body, "a:last"), Some(a3));
    assert_eq!(doc.tree().query_selector(body, "a:first"), Some(a1));
    assert_eq!(doc.tree().query_selector_all(body, "a:last-child"), vec![a1, a3]);
    assert_eq!(doc.tree().query_selector_all(body, "ul > a:first-child"), vec![a1, a2]);
}

#[test]
fn test_selector_list_document_order() {
    let mut doc = Document::default();
    let body = doc.body();
    let p = element(&mut doc, body, "p", "");
    let div = element(&mut doc, body, "div", "x");

    assert_eq!(doc.tree().query_selector_all(body, ".x, p"), vec![p, div]);
    assert_eq!(doc.tree().query_selector_all(body, "p, p"), vec![p]);
}

#[test]
fn test_universal_selector() {
    let mut doc = Document::default();
    let body = doc.body();
    let list = element(&mut doc, body, "ul", "pager");
    let li = element(&mut doc, list, "li", "");
    let a = element(&mut doc, li, "a", "");

    assert!(Selector::parse("*").is_ok());
    assert_eq!(doc.tree().query_selector_all(body, "ul > *"), vec![li]);
    assert_eq!(doc.tree().query_selector_all(body, ".pager *"), vec![li, a]);
    assert_eq!(doc.tree().query_selector(body, ".pager > * > *:last"), Some(a));
}

#[test]
fn test_attribute_operators() {
    let mut doc = Document::default();
    let body = doc.body();
    let a = element(&mut doc, body, "a", "");
    doc.tree.set_attr(a, "href", "/page/2?sort=new");
    doc.tree.set_attr(a, "rel", "next nofollow");

    let tree = doc.tree();
    assert!(tree.matches(a, "a[href]"));
    assert!(tree.matches(a, "a[href^='/page']"));
    assert!(tree.matches(a, r#"a[href$="new"]"#));
    assert!(tree.matches(a, "a[href*=sort]"));
    assert!(tree.matches(a, "a[rel~=next]"));
    assert!(!tree.matches(a, "a[rel=next]"));
    assert!(!tree.matches(a, "a[title]"));
}

#[test]
fn test_query_is_scoped_and_lenient() {
    let mut doc = Document::default();
    let body = doc.body();
    let scope = element(&mut doc, body, "div", "");
    element(&mut doc, body, "a", "");

    assert_eq!(doc.tree().query_selector(scope, "a"), None);
    assert_eq!(doc.tree().query_selector(body, "a[["), None);
    assert_eq!(doc.tree().closest(scope, "nav["), None);
}

#[test]
fn test_closest_includes_self() {
    let mut doc = Document::default();
    let body = doc.body();
    let nav = element(&mut doc, body, "nav", "pager");
    let a = element(&mut doc, nav, "a", "pager");

    assert_eq!(doc.tree().closest(a, ".pager"), Some(a));
    assert_eq!(doc.tree().closest(a, "nav.pager"), Some(nav));
    assert_eq!(doc.tree().closest(a, "table"), None);
}

// ============================================================================
// INLINE STYLE
// ============================================================================

#[test]
fn test_hide_show_preserves_other_declarations() {
    let mut doc = Document::default();
    let body = doc.body();
    let div = element(&mut doc, body, "div", "");
    doc.tree.set_attr(div, "style", "color: red; height: 20px");

    doc.tree.hide(div);
    assert!(!doc.is_visible(div));
    assert_eq!(doc.tree().style(div).height, Some(20.0));

    doc.tree.show(div);
    assert!(doc.is_visible(div));
    assert_eq!(doc.tree().attr(div, "style"), Some("color: red; height: 20px;"));
}

#[test]
fn test_show_removes_empty_style() {
    let mut doc = Document::default();
    let body = doc.body();
    let div = element(&mut doc, body, "div", "");

    doc.tree.hide(div);
    assert_eq!(doc.tree().attr(div, "style"), Some("display: none;"));
    doc.tree.show(div);
    assert_eq!(doc.tree().attr(div, "style"), None);
}

#[test]
fn test_visibility_follows_ancestors() {
    let mut doc = Document::default();
    let body = doc.body();
    let outer = element(&mut doc, body, "div", "");
    let inner = element(&mut doc, outer, "p", "");
    let loose = doc.tree.create_element("p");

    doc.tree.set_attr(outer, "style", "DISPLAY: None !important");
    assert!(!doc.is_visible(inner));
    assert!(!doc.is_visible(loose));
}

#[test]
fn test_overflow_and_units() {
    let mut doc = Document::default();
    let body = doc.body();
    let div = element(&mut doc, body, "div", "");
    doc.tree.set_attr(div, "style", "overflow: hidden auto; height: 50%; margin: 1px 2px 3px");

    let style = doc.tree().style(div);
    assert_eq!(style.overflow_y, Overflow::Auto);
    assert!(style.is_scroll_container());
    assert_eq!(style.height, None);
    assert_eq!((style.margin.top, style.margin.bottom), (1.0, 3.0));
}

// ============================================================================
// LISTENERS AND SCROLL STATE
// ============================================================================

#[test]
fn test_listeners_per_owner() {
    let mut doc = Document::default();
    let body = doc.body();
    let a = element(&mut doc, body, "div", "");
    let b = element(&mut doc, body, "div", "");

    let mut events = EventRegistry::new();
    events.bind(EventTarget::Window, EventType::Scroll, "paging", a);
    events.bind(EventTarget::Window, EventType::Scroll, "paging", b);
    events.bind(EventTarget::Window, EventType::Scroll, "other", a);
    events.bind(EventTarget::Node(a), EventType::Click, "paging", a);

    assert_eq!(events.unbind_owner("paging", a), 2);
    assert_eq!(events.owners(EventTarget::Window, EventType::Scroll, "paging"), vec![b]);
    assert!(events.is_bound(EventTarget::Window, EventType::Scroll, "other"));
    assert_eq!(events.owned_by("paging", a).count(), 0);
    assert_eq!(events.len(), 2);
}

#[test]
fn test_unbind_type_leaves_other_types() {
    let mut events = EventRegistry::new();
    let owner = NodeId::ROOT;
    events.bind(EventTarget::Window, EventType::Scroll, "paging", owner);
    events.bind(EventTarget::Window, EventType::Click, "paging", owner);

    assert_eq!(events.unbind_type(EventType::Scroll, "paging", owner), 1);
    assert_eq!(events.unbind(EventTarget::Window, "paging", owner), 1);
    assert!(events.is_empty());
}

#[test]
fn test_scroll_offsets() {
    let mut doc = Document::default();
    let body = doc.body();

    doc.scroll_window_to(-40.0);
    assert_eq!(doc.viewport().scroll_top, 0.0);
    doc.viewport_mut().scroll_by(0.0, 25.0);
    assert_eq!(doc.viewport().bottom(), 793.0);

    doc.set_scroll_top(body, 30.0);
    assert_eq!(doc.scroll_top(body), 30.0);
    doc.set_scroll_top(body, -5.0);
    assert_eq!(doc.scroll_top(body), 0.0);
}
