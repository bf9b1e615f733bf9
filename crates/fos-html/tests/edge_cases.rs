//! Edge case tests for fos-html
//!
//! Malformed markup, fragment splicing and serializer output for the kind
//! of HTML a paged listing returns.

use fos_dom::ElementQuery;
use fos_html::{top_level_image_src, Document, HtmlParser, HtmlSerializer};

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_parse_empty_string() {
    let doc = HtmlParser::new().parse("");
    assert!(doc.body().is_valid());
    assert!(doc.tree().child_ids(doc.body()).is_empty());
}

#[test]
fn test_parse_only_whitespace() {
    let doc = HtmlParser::new().parse("   \t\n\r\n   ");
    assert!(doc.tree().child_ids(doc.body()).is_empty());
}

#[test]
fn test_parse_only_doctype() {
    let doc = HtmlParser::new().parse("<!DOCTYPE html>");
    assert!(doc.document_element().is_valid());
}

// ============================================================================
// MALFORMED HTML
// ============================================================================

#[test]
fn test_parse_unclosed_tags() {
    let doc = HtmlParser::new().parse("<div><p><span>text");
    let span = doc.tree().query_selector(doc.body(), "div > p > span").unwrap();
    assert_eq!(doc.tree().text_content(span), "text");
}

#[test]
fn test_parse_extra_closing_tags() {
    let doc = HtmlParser::new().parse("<div></div></div></div></div>");
    assert_eq!(doc.tree().query_selector_all(doc.body(), "div").len(), 1);
}

#[test]
fn test_parse_entities_decoded() {
    let doc = HtmlParser::new().parse("<p>&lt;b&gt; &amp; &#169;</p>");
    let p = doc.tree().query_selector(doc.body(), "p").unwrap();
    assert_eq!(doc.tree().text_content(p), "<b> & \u{a9}");
}

#[test]
fn test_parse_uppercase_tags_lowercased() {
    let doc = HtmlParser::new().parse("<DIV CLASS=\"Post\"><A HREF=\"/2\">Next</A></DIV>");
    let a = doc.tree().query_selector(doc.body(), ".Post a").unwrap();
    assert_eq!(doc.tree().tag_name(a), Some("a"));
    assert_eq!(doc.tree().attr(a, "href"), Some("/2"));
}

// ============================================================================
// FRAGMENTS
// ============================================================================

#[test]
fn test_fragment_strips_document_wrappers() {
    let mut doc = Document::default();
    let body = doc.body();
    let html = "<html><head><title>Page 2</title></head><body><article>two</article></body></html>";
    let inserted = HtmlParser::new()
        .parse_fragment(doc.tree_mut(), body, html)
        .unwrap();

    let tags: Vec<_> = inserted
        .iter()
        .map(|&id| doc.tree().tag_name(id).unwrap_or_default().to_string())
        .collect();
    assert_eq!(tags, ["title", "article"]);
}

#[test]
fn test_fragment_text_only() {
    let mut doc = Document::default();
    let body = doc.body();
    let inserted = HtmlParser::new()
        .parse_fragment(doc.tree_mut(), body, "just text")
        .unwrap();
    assert_eq!(inserted.len(), 1);
    assert_eq!(doc.tree().text_content(body), "just text");
}

#[test]
fn test_fragment_appends_after_existing() {
    let mut doc = HtmlParser::new().parse("<ul><li>1</li></ul>");
    let ul = doc.tree().query_selector(doc.body(), "ul").unwrap();
    HtmlParser::new()
        .parse_fragment(doc.tree_mut(), ul, "<li>2</li><li>3</li>")
        .unwrap();
    assert_eq!(doc.tree().text_content(ul), "123");
}

// ============================================================================
// SERIALIZER
// ============================================================================

#[test]
fn test_serialize_void_and_raw_text() {
    let doc = HtmlParser::new().parse("<script>if (a < b) {}</script><br>");
    let out = HtmlSerializer::new().serialize_inner(doc.tree(), doc.head());
    assert_eq!(out, "<script>if (a < b) {}</script>");
    let out = HtmlSerializer::new().serialize_inner(doc.tree(), doc.body());
    assert_eq!(out, "<br>");
}

#[test]
fn test_serialize_comment() {
    let doc = HtmlParser::new().parse("<div><!-- page 2 --></div>");
    let div = doc.tree().query_selector(doc.body(), "div").unwrap();
    assert_eq!(HtmlSerializer::new().serialize_outer(doc.tree(), div), "<div><!-- page 2 --></div>");
}

// ============================================================================
// LOADING MARKUP
// ============================================================================

#[test]
fn test_loading_image_first_of_many() {
    let html = r#"<img src="/a.gif"><img src="/b.gif">"#;
    assert_eq!(top_level_image_src(html).as_deref(), Some("/a.gif"));
}

#[test]
fn test_loading_image_without_src() {
    assert_eq!(top_level_image_src("<img alt=\"spinner\">"), None);
}
