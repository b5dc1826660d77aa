//! Normalized XML tree.
//!
//! UPnP schemas allow most elements to repeat, so every child element is
//! stored as a sequence keyed by its qualified tag name, even when only one
//! occurrence exists. Attributes live in a separate bag and character data
//! in a separate text slot. An element carrying neither attributes nor
//! children collapses to its text.
//!
//! ```text
//! <res size="42">http://host/a.mp3</res>
//! => { "res": [ { "$": { "size": "42" }, "_": "http://host/a.mp3" } ] }
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{ParseError, ParseResult};

/// Path segment addressing the attribute bag
pub const ATTRIBUTES_KEY: &str = "$";

/// Path segment addressing the text content
pub const TEXT_KEY: &str = "_";

/// One occurrence of an element
#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    /// Text-only element
    Text(String),
    Element(XmlElement),
}

impl XmlValue {
    /// Character data of this value, whatever its shape
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            XmlValue::Element(element) => element.text(),
        }
    }

    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlValue::Element(element) => Some(element),
            XmlValue::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlValue::Element(element) => Some(element),
            XmlValue::Text(_) => None,
        }
    }
}

/// Element with attributes, text and repeated children.
///
/// A parsed document is an `XmlElement` with no attributes or text whose
/// single child is the root element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<(String, Vec<XmlValue>)>,
}

impl XmlElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// All occurrences of the child `name`, in document order
    pub fn children(&self, name: &str) -> &[XmlValue] {
        self.children
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn children_mut(&mut self, name: &str) -> Option<&mut Vec<XmlValue>> {
        self.children
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, values)| values)
    }

    /// Child tag names in order of first appearance
    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(key, _)| key.as_str())
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn push_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    pub fn push_child(&mut self, name: impl Into<String>, value: XmlValue) {
        let name = name.into();
        match self.children_mut(&name) {
            Some(values) => values.push(value),
            None => self.children.push((name, vec![value])),
        }
    }

    /// Collapse to [`XmlValue::Text`] when nothing but text is present
    pub fn into_value(self) -> XmlValue {
        if self.attributes.is_empty() && self.children.is_empty() {
            XmlValue::Text(self.text.unwrap_or_default())
        } else {
            XmlValue::Element(self)
        }
    }
}

/// Parse an XML document into its normalized form.
///
/// Whitespace around text is trimmed; comments, processing instructions
/// and the XML declaration are dropped. Namespace prefixes are kept as part
/// of tag and attribute names (`dc:title`, `xmlns:u`).
pub fn parse_document(xml: &str) -> ParseResult<XmlElement> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut document = XmlElement::new();
    let mut stack: Vec<(String, XmlElement)> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                stack.push(open_element(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let (name, element) = open_element(&start)?;
                attach(&mut stack, &mut document, name, element);
            }
            Ok(Event::End(_)) => {
                let (name, element) = stack.pop().ok_or_else(|| {
                    ParseError::InvalidXmlStructure("unbalanced closing tag".to_string())
                })?;
                attach(&mut stack, &mut document, name, element);
            }
            Ok(Event::Text(text)) => {
                let text = text
                    .unescape()
                    .map_err(|e| ParseError::XmlDeserializationFailed(e.to_string()))?;
                if let Some((_, element)) = stack.last_mut() {
                    element.push_text(&text);
                }
            }
            Ok(Event::CData(data)) => {
                let data = data.into_inner();
                if let Some((_, element)) = stack.last_mut() {
                    element.push_text(&String::from_utf8_lossy(&data));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ParseError::XmlDeserializationFailed(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    if let Some((name, _)) = stack.last() {
        return Err(ParseError::InvalidXmlStructure(format!(
            "unclosed element <{}>",
            name
        )));
    }
    if document.children.is_empty() {
        return Err(ParseError::InvalidXmlStructure(
            "document has no root element".to_string(),
        ));
    }

    Ok(document)
}

fn open_element(start: &BytesStart<'_>) -> ParseResult<(String, XmlElement)> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new();

    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|e| ParseError::XmlDeserializationFailed(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| ParseError::XmlDeserializationFailed(e.to_string()))?;
        element.set_attribute(key, value.into_owned());
    }

    Ok((name, element))
}

fn attach(
    stack: &mut [(String, XmlElement)],
    document: &mut XmlElement,
    name: String,
    element: XmlElement,
) {
    let parent = match stack.last_mut() {
        Some((_, parent)) => parent,
        None => document,
    };
    parent.push_child(name, element.into_value());
}

impl Serialize for XmlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            XmlValue::Text(text) => serializer.serialize_str(text),
            XmlValue::Element(element) => element.serialize(serializer),
        }
    }
}

impl Serialize for XmlElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(!self.attributes.is_empty()) + usize::from(self.text.is_some());
        let mut map = serializer.serialize_map(Some(self.children.len() + extra))?;
        if !self.attributes.is_empty() {
            map.serialize_entry(ATTRIBUTES_KEY, &AttributeBag(&self.attributes))?;
        }
        if let Some(text) = &self.text {
            map.serialize_entry(TEXT_KEY, text)?;
        }
        for (name, values) in &self.children {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

struct AttributeBag<'a>(&'a [(String, String)]);

impl Serialize for AttributeBag<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons_are_sequences() {
        let document = parse_document("<root><a>1</a></root>").unwrap();
        let root = document.children("root");
        assert_eq!(root.len(), 1);

        let root = root[0].as_element().unwrap();
        assert_eq!(root.children("a"), &[XmlValue::Text("1".to_string())]);
    }

    #[test]
    fn test_repeated_children_keep_order() {
        let document = parse_document("<r><a>1</a><b>x</b><a>2</a></r>").unwrap();
        let r = document.children("r")[0].as_element().unwrap();
        let values: Vec<_> = r.children("a").iter().filter_map(XmlValue::as_text).collect();
        assert_eq!(values, vec!["1", "2"]);
        assert_eq!(r.child_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_attributes_and_text() {
        let document =
            parse_document(r#"<res size="42" duration="0:03:58">http://h/a.mp3</res>"#).unwrap();
        let res = document.children("res")[0].as_element().unwrap();
        assert_eq!(res.attribute("size"), Some("42"));
        assert_eq!(res.attribute("duration"), Some("0:03:58"));
        assert_eq!(res.text(), Some("http://h/a.mp3"));
    }

    #[test]
    fn test_prefixes_and_namespace_declarations_are_kept() {
        let document = parse_document(
            r#"<u:BrowseResponse xmlns:u="urn:x"><dc:title>T</dc:title></u:BrowseResponse>"#,
        )
        .unwrap();
        let response = document.children("u:BrowseResponse")[0].as_element().unwrap();
        assert_eq!(response.attribute("xmlns:u"), Some("urn:x"));
        assert_eq!(response.children("dc:title")[0].as_text(), Some("T"));
    }

    #[test]
    fn test_escaped_text_is_unescaped_once() {
        let document = parse_document("<Result>&lt;DIDL-Lite&gt;&amp;amp;</Result>").unwrap();
        assert_eq!(
            document.children("Result")[0].as_text(),
            Some("<DIDL-Lite>&amp;")
        );
    }

    #[test]
    fn test_empty_element_collapses_to_empty_text() {
        let document = parse_document("<r><a/><b></b></r>").unwrap();
        let r = document.children("r")[0].as_element().unwrap();
        assert_eq!(r.children("a"), &[XmlValue::Text(String::new())]);
        assert_eq!(r.children("b"), &[XmlValue::Text(String::new())]);
    }

    #[test]
    fn test_cdata_is_text() {
        let document = parse_document("<r><![CDATA[a < b]]></r>").unwrap();
        assert_eq!(document.children("r")[0].as_text(), Some("a < b"));
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        assert!(parse_document("<a><b></a>").is_err());
        assert!(parse_document("<a>").is_err());
        assert!(parse_document("").is_err());
        assert!(parse_document("just text").is_err());
    }

    #[test]
    fn test_serializes_like_normalized_json() {
        let document = parse_document(r#"<r id="1"><a>x</a><a>y</a></r>"#).unwrap();
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "r": [ { "$": { "id": "1" }, "a": ["x", "y"] } ] })
        );
    }
}
