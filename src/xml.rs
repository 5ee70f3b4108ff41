//! Minimal XML element tree for the EPUB package files.
//!
//! container.xml, the OPF and the NCX are small, so they are parsed into an
//! owned tree up front. Lookups return `Option` so every required element or
//! attribute is an explicit branch at the call site.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// A parsed XML element. Names are stored without namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    /// Parse a document and return its root element.
    pub fn parse(content: &str) -> Result<Self, String> {
        let mut reader = Reader::from_str(content);

        // Synthetic document node; its single element child is the root.
        let mut stack: Vec<XmlElement> = vec![XmlElement::named("")];

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => stack.push(XmlElement::from_start(&e)),
                Ok(Event::Empty(e)) => {
                    let element = XmlElement::from_start(&e);
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Element(element));
                    }
                }
                Ok(Event::End(_)) => {
                    if stack.len() < 2 {
                        return Err("unexpected closing tag".into());
                    }
                    if let (Some(element), Some(parent)) = (stack.pop(), stack.last_mut()) {
                        parent.children.push(XmlNode::Element(element));
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = stack.last_mut() {
                        current.push_text(&String::from_utf8_lossy(&e));
                    }
                }
                Ok(Event::GeneralRef(e)) => {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    if let (Some(resolved), Some(current)) =
                        (resolve_entity(&entity), stack.last_mut())
                    {
                        current.push_text(&resolved);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(format!("{} at byte {}", e, reader.error_position()));
                }
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err("unclosed element at end of document".into());
        }
        stack
            .pop()
            .and_then(|document| {
                document.children.into_iter().find_map(|node| match node {
                    XmlNode::Element(element) => Some(element),
                    XmlNode::Text(_) => None,
                })
            })
            .ok_or_else(|| "document has no root element".to_string())
    }

    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    fn from_start(e: &BytesStart<'_>) -> Self {
        let name = e.name();
        let mut element = Self::named(&String::from_utf8_lossy(local_name(name.as_ref())));
        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let raw = String::from_utf8_lossy(&attr.value);
            let value = match quick_xml::escape::unescape(&raw) {
                Ok(unescaped) => unescaped.into_owned(),
                Err(_) => raw.into_owned(),
            };
            element.attributes.push((key, value));
        }
        element
    }

    fn push_text(&mut self, text: &str) {
        if let Some(XmlNode::Text(existing)) = self.children.last_mut() {
            existing.push_str(text);
        } else {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }

    /// Local element name (`dc:title` is stored as `title`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by exact (possibly prefixed) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value, treating an empty or blank value as absent.
    pub fn non_empty_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|value| !value.trim().is_empty())
    }

    /// Direct element children.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Direct element children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |element| element.name == name)
    }

    /// First direct child with the given local name. The result borrows only
    /// from `self`, so `name` may be a temporary.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    /// First element with the given local name anywhere below this one,
    /// in document order.
    pub fn descendant(&self, name: &str) -> Option<&XmlElement> {
        for element in self.elements() {
            if element.name == name {
                return Some(element);
            }
            if let Some(found) = element.descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of this element and all its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Render the start tag, for error messages.
    pub fn markup(&self) -> String {
        let mut out = format!("<{}", self.name);
        for (key, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", key, value));
        }
        out.push('>');
        out
    }
}

/// Strip UTF-8 BOM if present.
pub fn strip_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}

/// Extract local name from namespaced XML name (e.g., "dc:title" -> "title").
pub fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Resolve XML entity references.
pub fn resolve_entity(entity: &str) -> Option<Cow<'static, str>> {
    match entity {
        "apos" => return Some(Cow::Borrowed("'")),
        "quot" => return Some(Cow::Borrowed("\"")),
        "lt" => return Some(Cow::Borrowed("<")),
        "gt" => return Some(Cow::Borrowed(">")),
        "amp" => return Some(Cow::Borrowed("&")),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()
    } else {
        None
    };

    code.and_then(char::from_u32)
        .map(|c| Cow::Owned(c.to_string()))
}
