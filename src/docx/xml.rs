//! Minimal owned XML tree over quick-xml events.
//!
//! Only element structure and text are interpreted; declarations, comments,
//! CDATA and processing instructions round-trip as raw events. Attributes are
//! kept as the original `BytesStart`, so untouched elements serialize with
//! their attribute bytes intact.

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Failure while reading or writing a part's XML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlError(pub String);

impl XmlError {
    fn from_display(err: impl std::fmt::Display) -> Self {
        Self(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
    Raw(Event<'static>),
}

#[derive(Debug, Clone)]
pub struct Element {
    pub start: BytesStart<'static>,
    pub children: Vec<Node>,
    self_closing: bool,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            start: BytesStart::new(name),
            children: Vec::new(),
            self_closing: true,
        }
    }

    pub fn with_attribute(mut self, key: &'static str, value: &'static str) -> Self {
        self.start.push_attribute((key, value));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Qualified name, prefix included (`w:p`)
    pub fn name(&self) -> &[u8] {
        self.start.name().into_inner()
    }

    pub fn is(&self, name: &[u8]) -> bool {
        self.name() == name
    }

    pub fn attribute(&self, key: &[u8]) -> Option<String> {
        self.start
            .attributes()
            .flatten()
            .find(|attr| attr.key.as_ref() == key)
            .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a [u8]) -> impl Iterator<Item = &'a Element> {
        self.child_elements().filter(move |el| el.is(name))
    }

    pub fn children_named_mut<'a>(
        &'a mut self,
        name: &'a [u8],
    ) -> impl Iterator<Item = &'a mut Element> {
        self.child_elements_mut().filter(move |el| el.is(name))
    }

    /// Concatenated text of direct text children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// A parsed XML part: prolog, root element and anything trailing it
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<Node>,
}

impl XmlDocument {
    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }
}

pub fn parse(xml: &[u8]) -> Result<XmlDocument, XmlError> {
    let mut reader = Reader::from_reader(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut top: Vec<Node> = Vec::new();

    loop {
        let node = match reader.read_event().map_err(XmlError::from_display)? {
            Event::Start(start) => {
                stack.push(Element {
                    start: start.into_owned(),
                    children: Vec::new(),
                    self_closing: false,
                });
                continue;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError("unexpected closing tag".to_string()))?;
                Node::Element(element)
            }
            Event::Empty(start) => Node::Element(Element {
                start: start.into_owned(),
                children: Vec::new(),
                self_closing: true,
            }),
            Event::Text(text) => {
                Node::Text(text.unescape().map_err(XmlError::from_display)?.into_owned())
            }
            Event::Eof => break,
            other => Node::Raw(other.into_owned()),
        };

        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => top.push(node),
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError(format!(
            "unclosed element <{}>",
            String::from_utf8_lossy(open.name())
        )));
    }

    Ok(XmlDocument { nodes: top })
}

pub fn write(doc: &XmlDocument) -> Result<Vec<u8>, XmlError> {
    let mut writer = Writer::new(Vec::new());
    for node in &doc.nodes {
        write_node(&mut writer, node)?;
    }
    Ok(writer.into_inner())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), XmlError> {
    match node {
        Node::Element(el) if el.self_closing && el.children.is_empty() => writer
            .write_event(Event::Empty(el.start.borrow()))
            .map_err(XmlError::from_display),
        Node::Element(el) => {
            writer
                .write_event(Event::Start(el.start.borrow()))
                .map_err(XmlError::from_display)?;
            for child in &el.children {
                write_node(writer, child)?;
            }
            writer
                .write_event(Event::End(el.start.to_end()))
                .map_err(XmlError::from_display)
        }
        Node::Text(text) => writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(XmlError::from_display),
        Node::Raw(event) => writer
            .write_event(event.borrow())
            .map_err(XmlError::from_display),
    }
}
