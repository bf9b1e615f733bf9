//! Selector parsing and matching
//!
//! Supports the subset used to locate paging links and content:
//! selector lists, compound selectors (`tag`, `*`, `#id`, `.class`,
//! attribute tests), descendant and child combinators, `:first-child`,
//! `:last-child`, and the set filters `:first` / `:last`, which apply to the
//! whole matched set of their selector rather than to a single element.

use crate::{DomTree, NodeId};

/// Selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected character {ch:?} at offset {offset}")]
    Unexpected { ch: char, offset: usize },

    #[error("unsupported pseudo-class :{0}")]
    UnsupportedPseudo(String),

    #[error(":{0} must end its selector")]
    MisplacedPosition(String),
}

/// Parsed selector list
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

/// Set filter applied to the matches of one complex selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
    position: Option<Position>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    /// `*`; matches any element but keeps the compound from being empty
    universal: bool,
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
    first_child: bool,
    last_child: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct AttrTest {
    name: String,
    op: Option<(AttrOp, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Includes,
    Prefix,
    Suffix,
    Substring,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let alternatives = split_top_level(input)
            .into_iter()
            .map(|(offset, part)| Parser::new(part, offset).complex())
            .collect::<Result<Vec<_>, _>>()?;
        if alternatives.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { alternatives })
    }

    /// Whether `element` matches any alternative, ignoring set filters
    pub fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        tree.is_element(element)
            && self
                .alternatives
                .iter()
                .any(|c| c.match_at(tree, element, c.compounds.len() - 1))
    }

    /// All matching elements below `scope`, in document order
    pub fn select_all(&self, tree: &DomTree, scope: NodeId) -> Vec<NodeId> {
        let mut selected: Vec<NodeId> = Vec::new();
        for complex in &self.alternatives {
            let last = complex.compounds.len() - 1;
            let mut hits = tree
                .descendants(scope)
                .filter(|&n| tree.is_element(n) && complex.match_at(tree, n, last));
            let hits: Vec<NodeId> = match complex.position {
                None => hits.collect(),
                Some(Position::First) => hits.next().into_iter().collect(),
                Some(Position::Last) => hits.last().into_iter().collect(),
            };
            selected.extend(hits);
        }

        if self.alternatives.len() > 1 {
            // Restore document order across alternatives
            selected.sort_unstable();
            selected.dedup();
            let wanted = selected;
            selected = tree
                .descendants(scope)
                .filter(|n| wanted.binary_search(n).is_ok())
                .collect();
        }
        selected
    }
}

impl Complex {
    fn match_at(&self, tree: &DomTree, element: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(tree, element) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => tree
                .parent(element)
                .is_some_and(|p| tree.is_element(p) && self.match_at(tree, p, index - 1)),
            Combinator::Descendant => tree
                .ancestors(element)
                .any(|a| tree.is_element(a) && self.match_at(tree, a, index - 1)),
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        *self == Compound::default()
    }

    fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        let Some(elem) = tree.element(element) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if !elem.tag_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if elem.id() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| elem.has_class(c)) {
            return false;
        }
        if !self.attrs.iter().all(|t| t.matches(elem.get_attr(&t.name))) {
            return false;
        }
        if self.first_child && previous_element(tree, element).is_some() {
            return false;
        }
        if self.last_child && next_element(tree, element).is_some() {
            return false;
        }
        true
    }
}

impl AttrTest {
    fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        let Some((op, expected)) = &self.op else {
            return true;
        };
        match op {
            AttrOp::Equals => value == expected,
            AttrOp::Includes => value.split_ascii_whitespace().any(|w| w == expected),
            AttrOp::Prefix => !expected.is_empty() && value.starts_with(expected.as_str()),
            AttrOp::Suffix => !expected.is_empty() && value.ends_with(expected.as_str()),
            AttrOp::Substring => !expected.is_empty() && value.contains(expected.as_str()),
        }
    }
}

fn previous_element(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    let mut cursor = tree.get(node)?.prev_sibling;
    while cursor.is_valid() {
        if tree.is_element(cursor) {
            return Some(cursor);
        }
        cursor = tree.get(cursor)?.prev_sibling;
    }
    None
}

fn next_element(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    let mut cursor = tree.get(node)?.next_sibling;
    while cursor.is_valid() {
        if tree.is_element(cursor) {
            return Some(cursor);
        }
        cursor = tree.get(cursor)?.next_sibling;
    }
    None
}

/// Split on commas outside brackets and quotes, keeping byte offsets
fn split_top_level(input: &str) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, ch) in input.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push((start, &input[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push((start, &input[start..]));
    parts
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    base: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, base: usize) -> Self {
        Self { input, pos: 0, base }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn unexpected(&self, ch: char) -> SelectorError {
        SelectorError::Unexpected {
            ch,
            offset: self.base + self.pos,
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let before = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != before
    }

    fn ident(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            self.bump();
        }
        self.input[start..self.pos].to_string()
    }

    fn required_ident(&mut self) -> Result<String, SelectorError> {
        let ident = self.ident();
        if ident.is_empty() {
            return Err(match self.peek() {
                Some(ch) => self.unexpected(ch),
                None => SelectorError::Empty,
            });
        }
        Ok(ident)
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        let mut complex = Complex {
            compounds: Vec::new(),
            combinators: Vec::new(),
            position: None,
        };
        self.skip_whitespace();
        loop {
            let (compound, position) = self.compound()?;
            if compound.is_empty() && position.is_none() {
                return Err(match self.peek() {
                    Some(ch) => self.unexpected(ch),
                    None => SelectorError::Empty,
                });
            }
            complex.compounds.push(compound);

            let spaced = self.skip_whitespace();
            if let Some(position) = position {
                complex.position = Some(position);
                return match self.peek() {
                    None => Ok(complex),
                    Some(_) => Err(SelectorError::MisplacedPosition(
                        match position {
                            Position::First => "first",
                            Position::Last => "last",
                        }
                        .to_string(),
                    )),
                };
            }

            match self.peek() {
                None => return Ok(complex),
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    complex.combinators.push(Combinator::Child);
                }
                Some(_) if spaced => complex.combinators.push(Combinator::Descendant),
                Some(ch) => return Err(self.unexpected(ch)),
            }
        }
    }

    fn compound(&mut self) -> Result<(Compound, Option<Position>), SelectorError> {
        let mut compound = Compound::default();
        let mut position = None;

        match self.peek() {
            Some('*') => {
                self.bump();
                compound.universal = true;
            }
            Some(c) if c.is_alphabetic() => compound.tag = Some(self.ident().to_ascii_lowercase()),
            _ => {}
        }

        while let Some(ch) = self.peek() {
            if position.is_some() {
                break;
            }
            match ch {
                '#' => {
                    self.bump();
                    compound.id = Some(self.required_ident()?);
                }
                '.' => {
                    self.bump();
                    compound.classes.push(self.required_ident()?);
                }
                '[' => {
                    self.bump();
                    compound.attrs.push(self.attr_test()?);
                }
                ':' => {
                    self.bump();
                    let name = self.required_ident()?.to_ascii_lowercase();
                    match name.as_str() {
                        "first" => position = Some(Position::First),
                        "last" => position = Some(Position::Last),
                        "first-child" => compound.first_child = true,
                        "last-child" => compound.last_child = true,
                        _ => return Err(SelectorError::UnsupportedPseudo(name)),
                    }
                }
                _ => break,
            }
        }
        Ok((compound, position))
    }

    fn attr_test(&mut self) -> Result<AttrTest, SelectorError> {
        self.skip_whitespace();
        let name = self.required_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let op = match self.bump() {
            Some(']') => return Ok(AttrTest { name, op: None }),
            Some('=') => AttrOp::Equals,
            Some(c @ ('~' | '^' | '$' | '*')) => {
                match self.bump() {
                    Some('=') => {}
                    Some(other) => return Err(self.unexpected(other)),
                    None => return Err(SelectorError::Empty),
                }
                match c {
                    '~' => AttrOp::Includes,
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    _ => AttrOp::Substring,
                }
            }
            Some(other) => return Err(self.unexpected(other)),
            None => return Err(SelectorError::Empty),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                while self.peek().is_some_and(|c| c != q) {
                    self.bump();
                }
                let value = self.input[start..self.pos].to_string();
                if self.bump().is_none() {
                    return Err(SelectorError::Empty);
                }
                value
            }
            _ => self.required_ident()?,
        };
        self.skip_whitespace();
        match self.bump() {
            Some(']') => Ok(AttrTest {
                name,
                op: Some((op, value)),
            }),
            Some(other) => Err(self.unexpected(other)),
            None => Err(SelectorError::Empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// <div id="c"><p class="item"><a href="/1">1</a></p><nav><a href="/2">2</a></nav></div>
    fn sample() -> (DomTree, [NodeId; 5]) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_attr(div, "id", "c");
        let p = tree.create_element("p");
        tree.set_attr(p, "class", "item");
        let a1 = tree.create_element("a");
        tree.set_attr(a1, "href", "/1");
        let nav = tree.create_element("nav");
        let a2 = tree.create_element("a");
        tree.set_attr(a2, "href", "/2");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, p).unwrap();
        tree.append_child(p, a1).unwrap();
        tree.append_child(div, nav).unwrap();
        tree.append_child(nav, a2).unwrap();
        (tree, [div, p, a1, nav, a2])
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
        assert!(matches!(Selector::parse("a:hover"), Err(SelectorError::UnsupportedPseudo(_))));
        assert!(matches!(Selector::parse("a:last span"), Err(SelectorError::MisplacedPosition(_))));
        assert!(matches!(Selector::parse("a + b"), Err(SelectorError::Unexpected { ch: '+', .. })));
    }

    #[test]
    fn test_positional_filters() {
        let (tree, [div, _, a1, _, a2]) = sample();
        let last = Selector::parse("a:last").unwrap();
        assert_eq!(last.select_all(&tree, div), vec![a2]);
        let first = Selector::parse("a:first").unwrap();
        assert_eq!(first.select_all(&tree, div), vec![a1]);
    }

    #[test]
    fn test_combinators() {
        let (tree, [_, _, a1, _, a2]) = sample();
        let child = Selector::parse("nav > a").unwrap();
        assert_eq!(child.select_all(&tree, tree.root()), vec![a2]);
        let desc = Selector::parse("#c a").unwrap();
        assert_eq!(desc.select_all(&tree, tree.root()), vec![a1, a2]);
    }

    #[test]
    fn test_attribute_tests() {
        let (tree, [_, _, a1, _, a2]) = sample();
        assert_eq!(Selector::parse("a[href='/2']").unwrap().select_all(&tree, tree.root()), vec![a2]);
        assert_eq!(Selector::parse("a[href^=\"/\"]").unwrap().select_all(&tree, tree.root()), vec![a1, a2]);
        assert!(Selector::parse("[title]").unwrap().select_all(&tree, tree.root()).is_empty());
    }

    #[test]
    fn test_list_keeps_document_order() {
        let (tree, [_, p, _, nav, _]) = sample();
        let list = Selector::parse("nav, .item").unwrap();
        assert_eq!(list.select_all(&tree, tree.root()), vec![p, nav]);
    }

    #[test]
    fn test_structural_pseudo() {
        let (tree, [div, p, _, nav, _]) = sample();
        assert!(Selector::parse("p:first-child").unwrap().matches(&tree, p));
        assert!(Selector::parse("div > :last-child").unwrap().matches(&tree, nav));
        assert!(!Selector::parse(":last-child").unwrap().matches(&tree, p));
        assert!(!Selector::parse("span").unwrap().matches(&tree, div));
    }

    #[test]
    fn test_universal() {
        let (tree, [div, p, a1, nav, a2]) = sample();
        let all = Selector::parse("*").unwrap();
        assert_eq!(all.select_all(&tree, tree.root()), vec![div, p, a1, nav, a2]);
        assert_eq!(Selector::parse("nav > *").unwrap().select_all(&tree, tree.root()), vec![a2]);
        assert_eq!(Selector::parse("div *").unwrap().select_all(&tree, tree.root()), vec![p, a1, nav, a2]);
        assert_eq!(Selector::parse("*.item").unwrap().select_all(&tree, tree.root()), vec![p]);
        assert_eq!(Selector::parse("* > *:last").unwrap().select_all(&tree, div), vec![a2]);
    }
}
