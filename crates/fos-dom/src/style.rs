//! Inline style
//!
//! Reads the box properties that drive block geometry from an element's
//! `style` attribute, and edits single declarations in place. Only pixel
//! lengths are understood; anything else falls back to the initial value.

use crate::{DomTree, NodeId};

/// `display`, reduced to what geometry cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    None,
}

/// `overflow-y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Scroll,
    Auto,
}

impl Overflow {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "visible" => Some(Self::Visible),
            "hidden" | "clip" => Some(Self::Hidden),
            "scroll" => Some(Self::Scroll),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

/// Vertical edge sizes in px
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f64,
    pub bottom: f64,
}

impl Edges {
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Box properties of one element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxStyle {
    pub display: Display,
    pub overflow_y: Overflow,
    /// Explicit content height
    pub height: Option<f64>,
    pub margin: Edges,
    pub border: Edges,
    pub padding: Edges,
}

impl BoxStyle {
    /// Parse a `style` attribute value
    pub fn parse(inline: &str) -> Self {
        let mut style = Self::default();
        for (name, value) in declarations(inline) {
            style.apply(&name, &value);
        }
        style
    }

    fn apply(&mut self, name: &str, value: &str) {
        match name {
            "display" => {
                self.display = if value.eq_ignore_ascii_case("none") {
                    Display::None
                } else {
                    Display::Block
                };
            }
            "overflow" => {
                // `overflow: <x> <y>` - the last keyword is the vertical one
                if let Some(y) = value.split_whitespace().last().and_then(Overflow::parse) {
                    self.overflow_y = y;
                }
            }
            "overflow-y" => {
                if let Some(y) = Overflow::parse(value) {
                    self.overflow_y = y;
                }
            }
            "height" => self.height = parse_px(value),
            "margin" => self.margin = shorthand(value, self.margin),
            "margin-top" => self.margin.top = parse_px(value).unwrap_or(0.0),
            "margin-bottom" => self.margin.bottom = parse_px(value).unwrap_or(0.0),
            "padding" => self.padding = shorthand(value, self.padding),
            "padding-top" => self.padding.top = parse_px(value).unwrap_or(0.0),
            "padding-bottom" => self.padding.bottom = parse_px(value).unwrap_or(0.0),
            "border-width" => self.border = shorthand(value, self.border),
            "border" => {
                let width = first_length(value).unwrap_or(0.0);
                self.border = Edges { top: width, bottom: width };
            }
            "border-top" | "border-top-width" => self.border.top = first_length(value).unwrap_or(0.0),
            "border-bottom" | "border-bottom-width" => {
                self.border.bottom = first_length(value).unwrap_or(0.0)
            }
            _ => {}
        }
    }

    /// Whether the element scrolls its own content vertically
    pub fn is_scroll_container(&self) -> bool {
        self.overflow_y != Overflow::Visible
    }
}

/// Parse `12px`, `12` or `0`; `auto` and other units yield `None`
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn first_length(value: &str) -> Option<f64> {
    value.split_whitespace().find_map(parse_px)
}

/// 1-4 value box shorthand, vertical components only
fn shorthand(value: &str, fallback: Edges) -> Edges {
    let parts: Vec<f64> = value.split_whitespace().map(|p| parse_px(p).unwrap_or(0.0)).collect();
    match parts.as_slice() {
        [all] => Edges { top: *all, bottom: *all },
        [v, _] => Edges { top: *v, bottom: *v },
        [t, _, b] | [t, _, b, _] => Edges { top: *t, bottom: *b },
        _ => fallback,
    }
}

/// Split a declaration block into lowercase `(name, value)` pairs
fn declarations(inline: &str) -> Vec<(String, String)> {
    inline
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim().trim_end_matches("!important").trim();
            (!name.is_empty()).then(|| (name, value.to_string()))
        })
        .collect()
}

fn serialize(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl DomTree {
    /// Box style of a node; non-elements get the initial style
    pub fn style(&self, id: NodeId) -> BoxStyle {
        self.attr(id, "style").map(BoxStyle::parse).unwrap_or_default()
    }

    /// Set one inline declaration, keeping the others
    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) {
        if !self.is_element(id) {
            return;
        }
        let name = name.to_ascii_lowercase();
        let mut decls = declarations(self.attr(id, "style").unwrap_or(""));
        decls.retain(|(n, _)| *n != name);
        decls.push((name, value.to_string()));
        self.set_attr(id, "style", serialize(&decls));
    }

    /// Drop one inline declaration; removes the attribute once empty
    pub fn remove_style_property(&mut self, id: NodeId, name: &str) {
        let Some(current) = self.attr(id, "style") else {
            return;
        };
        let mut decls = declarations(current);
        decls.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        if decls.is_empty() {
            self.remove_attr(id, "style");
        } else {
            let style = serialize(&decls);
            self.set_attr(id, "style", style);
        }
    }

    /// `display: none`
    pub fn hide(&mut self, id: NodeId) {
        self.set_style_property(id, "display", "none");
    }

    pub fn show(&mut self, id: NodeId) {
        self.remove_style_property(id, "display");
    }
}
