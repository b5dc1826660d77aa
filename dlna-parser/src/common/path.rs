//! Slash-separated lookups over the normalized tree.
//!
//! A path is evaluated one segment at a time:
//!
//! - a tag name selects the sequence of matching children,
//! - a number selects one occurrence out of a sequence,
//! - `$` selects the attribute bag, whose next segment is an attribute name,
//! - `_` selects the text content.
//!
//! `dc:title/0`, `$/id` and `res/0/$/size` are typical paths. Any segment
//! that does not resolve ends the lookup with `None`.

use crate::common::tree::{XmlElement, XmlValue, ATTRIBUTES_KEY, TEXT_KEY};

/// Position reached while walking a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    Element(&'a XmlElement),
    Sequence(&'a [XmlValue]),
    Attributes(&'a XmlElement),
    Text(&'a str),
}

impl<'a> From<&'a XmlValue> for Node<'a> {
    fn from(value: &'a XmlValue) -> Self {
        match value {
            XmlValue::Text(text) => Node::Text(text),
            XmlValue::Element(element) => Node::Element(element),
        }
    }
}

impl<'a> From<&'a XmlElement> for Node<'a> {
    fn from(element: &'a XmlElement) -> Self {
        Node::Element(element)
    }
}

impl<'a> Node<'a> {
    fn step(self, segment: &str) -> Option<Node<'a>> {
        match (self, segment) {
            (Node::Element(element), ATTRIBUTES_KEY) => {
                (!element.attributes().is_empty()).then_some(Node::Attributes(element))
            }
            (Node::Element(element), TEXT_KEY) => element.text().map(Node::Text),
            // a text-only element has already collapsed to its text
            (Node::Text(text), TEXT_KEY) => Some(Node::Text(text)),
            (Node::Element(element), name) => {
                let children = element.children(name);
                (!children.is_empty()).then_some(Node::Sequence(children))
            }
            (Node::Sequence(values), index) => {
                let index: usize = index.parse().ok()?;
                values.get(index).map(Node::from)
            }
            (Node::Attributes(element), name) => element.attribute(name).map(Node::Text),
            (Node::Text(_), _) => None,
        }
    }

    /// Non-empty character data at this position
    pub fn text(self) -> Option<&'a str> {
        let text = match self {
            Node::Text(text) => text,
            Node::Element(element) => element.text()?,
            Node::Sequence(_) | Node::Attributes(_) => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    pub fn element(self) -> Option<&'a XmlElement> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn sequence(self) -> &'a [XmlValue] {
        match self {
            Node::Sequence(values) => values,
            _ => &[],
        }
    }
}

/// Walk `path` starting at `start`
pub fn find_path<'a>(start: impl Into<Node<'a>>, path: &str) -> Option<Node<'a>> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .try_fold(start.into(), |node, segment| node.step(segment))
}

/// Walk `path` and return the non-empty text found there
pub fn find_text<'a>(start: impl Into<Node<'a>>, path: &str) -> Option<&'a str> {
    find_path(start, path).and_then(Node::text)
}

/// Walk `path` and return the sequence found there, or an empty slice
pub fn find_sequence<'a>(start: impl Into<Node<'a>>, path: &str) -> &'a [XmlValue] {
    find_path(start, path).map(Node::sequence).unwrap_or(&[])
}
