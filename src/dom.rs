//! A minimal document model for rendered views.
//!
//! Views produce markup with maud; a [`Region`] holds that markup parsed into
//! a small node tree so it can be patched in place (see [`crate::diff`]),
//! queried for the elements user actions target, and serialized back out.
//!
//! Only what maud emits needs to parse: elements, attributes (quoted or
//! bare), escaped text, and the HTML void elements that never get a closing
//! tag.

use maud::{Escaper, Markup};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkupError {
    #[error("Malformed markup: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Malformed attribute: {0}")]
    Attribute(String),
    #[error("Bad escape sequence: {0}")]
    Escape(String),
    #[error("Unbalanced markup: unexpected </{0}>")]
    Unbalanced(String),
}

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Attribute used to match list items across re-renders.
pub const KEY_ATTR: &str = "data-key";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// Stable identity for keyed diffing.
    pub fn key(&self) -> Option<&str> {
        self.as_element().and_then(|e| e.attr(KEY_ATTR))
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => e.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(t) => escape_into(out, t),
            Node::Element(e) => e.write_html(out),
        }
    }
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    /// First descendant (depth-first, self excluded) carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        find_in(&self.children, class)
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(out, value);
            out.push('"');
        }
        out.push('>');
        if self.is_void() {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn find_in<'a>(nodes: &'a [Node], class: &str) -> Option<&'a Element> {
    nodes.iter().filter_map(Node::as_element).find_map(|e| {
        if e.has_class(class) {
            Some(e)
        } else {
            e.find_by_class(class)
        }
    })
}

fn escape_into(out: &mut String, text: &str) {
    let _ = Escaper::new(out).write_str(text);
}

/// Serialize a node list back to markup.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}

/// Parse a markup fragment into a detached node list.
pub fn parse_fragment(markup: &str) -> Result<Vec<Node>, MarkupError> {
    let mut reader = Reader::from_str(markup);
    // Void elements have no end tag, so quick-xml's own pairing check would
    // trip on the first `<img>`; nesting is checked against `stack` instead.
    reader.config_mut().check_end_names = false;

    let mut roots: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let element = element_from(&start)?;
                if element.is_void() {
                    push_node(&mut stack, &mut roots, Node::Element(element));
                } else {
                    stack.push(element);
                }
            }
            Event::Empty(start) => {
                let element = element_from(&start)?;
                push_node(&mut stack, &mut roots, Node::Element(element));
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                if stack.last().is_some_and(|open| open.tag == name) {
                    if let Some(element) = stack.pop() {
                        push_node(&mut stack, &mut roots, Node::Element(element));
                    }
                } else if !VOID_ELEMENTS.contains(&name.as_str()) {
                    return Err(MarkupError::Unbalanced(name));
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| MarkupError::Escape(e.to_string()))?
                    .into_owned();
                if !text.is_empty() {
                    push_node(&mut stack, &mut roots, Node::Text(text));
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                push_node(&mut stack, &mut roots, Node::Text(text));
            }
            Event::Eof => break,
            // Comments, doctype and processing instructions carry nothing
            // a region needs.
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(MarkupError::Unbalanced(format!("{} (unclosed)", open.tag)));
    }
    Ok(roots)
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, MarkupError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in start.html_attributes() {
        let attr = attr.map_err(|e| MarkupError::Attribute(e.to_string()))?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| MarkupError::Escape(e.to_string()))?
            .into_owned();
        attrs.push((name, value));
    }
    Ok(Element {
        tag,
        attrs,
        children: Vec::new(),
    })
}

fn push_node(stack: &mut [Element], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// The live content of one view's target area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    name: String,
    nodes: Vec<Node>,
}

impl Region {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Clear the region and fill it with `markup`.
    ///
    /// The region is left untouched if the markup does not parse.
    pub fn replace(&mut self, markup: Markup) -> Result<(), MarkupError> {
        let nodes = parse_fragment(&markup.into_string())?;
        self.clear();
        self.nodes = nodes;
        Ok(())
    }

    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        find_in(&self.nodes, class)
    }

    pub fn text_content(&self) -> String {
        self.nodes.iter().map(Node::text_content).collect()
    }

    pub fn to_html(&self) -> String {
        to_html(&self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maud::html;

    #[test]
    fn parses_nested_elements_and_text() {
        let nodes = parse_fragment(r#"<div class="a"><p>Hi <b>there</b></p></div>"#).unwrap();
        assert_eq!(nodes.len(), 1);
        let div = nodes[0].as_element().unwrap();
        assert_eq!(div.tag, "div");
        assert_eq!(div.attr("class"), Some("a"));
        assert_eq!(nodes[0].text_content(), "Hi there");
    }

    #[test]
    fn void_elements_do_not_swallow_siblings() {
        let markup = html! {
            figure {
                img src="a.jpg" alt="A";
                h1 { "Title" }
            }
        };
        let nodes = parse_fragment(&markup.into_string()).unwrap();
        let figure = nodes[0].as_element().unwrap();
        assert_eq!(figure.children.len(), 2);
        assert_eq!(figure.children[0].as_element().unwrap().tag, "img");
        assert_eq!(figure.children[1].text_content(), "Title");
    }

    #[test]
    fn escaped_text_roundtrips() {
        let markup = html! { p title="\"quoted\"" { "<script>&" } };
        let html = markup.into_string();
        let nodes = parse_fragment(&html).unwrap();
        assert_eq!(nodes[0].text_content(), "<script>&");
        assert_eq!(nodes[0].as_element().unwrap().attr("title"), Some("\"quoted\""));
        assert_eq!(to_html(&nodes), html);
    }

    #[test]
    fn bare_attributes_parse_as_empty() {
        let nodes = parse_fragment(r#"<input name="title" required>"#).unwrap();
        let input = nodes[0].as_element().unwrap();
        assert_eq!(input.attr("required"), Some(""));
    }

    #[test]
    fn unbalanced_markup_is_rejected() {
        assert!(matches!(
            parse_fragment("<div><span></div>"),
            Err(MarkupError::Unbalanced(_))
        ));
        assert!(parse_fragment("<div>").is_err());
    }

    #[test]
    fn find_by_class_searches_depth_first() {
        let nodes =
            parse_fragment(r#"<div><button class="btn--inline next" data-goto="2"></button></div>"#)
                .unwrap();
        let mut region = Region::new("pagination");
        region.nodes = nodes;
        let button = region.find_by_class("next").unwrap();
        assert_eq!(button.attr("data-goto"), Some("2"));
        assert!(region.find_by_class("prev").is_none());
    }

    #[test]
    fn replace_keeps_content_on_parse_error() {
        let mut region = Region::new("r");
        region.replace(html! { p { "ok" } }).unwrap();
        let bad = maud::PreEscaped("<p>".to_string());
        assert!(region.replace(bad).is_err());
        assert_eq!(region.text_content(), "ok");
    }
}
