//! Minimal owned XML tree built from `quick-xml` events.
//!
//! The tree keeps just enough structure for attribute surgery and subtree serialization.
//! Character data is unescaped on input, so undefined entities are rejected, and re-escaped
//! on output. CDATA content is written back verbatim.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

use crate::normalize::NormalizeError;

/// A child node of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
  /// Nested element.
  Element(Element),
  /// Unescaped character data.
  Text(String),
  /// Unescaped CDATA section content.
  CData(String),
  /// Comment body.
  Comment(String),
}

/// An element with its attributes kept in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
  /// Qualified tag name as written in the source.
  pub name: String,
  /// Attribute name/value pairs, values unescaped.
  pub attributes: Vec<(String, String)>,
  /// Child nodes in document order.
  pub children: Vec<Node>,
}

impl Element {
  fn new(name: String) -> Self {
    Self {
      name,
      attributes: Vec::new(),
      children: Vec::new(),
    }
  }

  /// Value of the named attribute, if present.
  pub fn attribute(&self, name: &str) -> Option<&str> {
    self
      .attributes
      .iter()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.as_str())
  }

  /// Replace an attribute value in place, or append it when missing.
  pub fn set_attribute(&mut self, name: &str, value: &str) {
    match self.attributes.iter_mut().find(|(key, _)| key == name) {
      Some((_, existing)) => *existing = value.to_string(),
      None => self.attributes.push((name.to_string(), value.to_string())),
    }
  }

  /// Drop every attribute whose name is not listed in `keep`.
  pub fn retain_attributes(&mut self, keep: &[&str]) {
    self
      .attributes
      .retain(|(key, _)| keep.contains(&key.as_str()));
  }

  /// Remove comment nodes from this element and all descendants.
  pub fn remove_comments(&mut self) {
    // walk backwards so removals never shift an index still to be visited
    for index in (0..self.children.len()).rev() {
      if matches!(self.children[index], Node::Comment(_)) {
        self.children.remove(index);
      } else if let Node::Element(child) = &mut self.children[index] {
        child.remove_comments();
      }
    }
  }

  /// Visit every descendant element, depth first, excluding `self`.
  pub fn for_each_descendant_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
    for child in &mut self.children {
      if let Node::Element(element) = child {
        visit(element);
        element.for_each_descendant_mut(visit);
      }
    }
  }

  /// First element named `name` in document order, including `self`.
  pub fn find_mut(&mut self, name: &str) -> Option<&mut Element> {
    if self.name == name {
      return Some(self);
    }

    self.children.iter_mut().find_map(|child| match child {
      Node::Element(element) => element.find_mut(name),
      _ => None,
    })
  }

  /// Serialize this element and its subtree without indentation.
  pub fn to_xml(&self) -> Result<String, NormalizeError> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, self)?;
    String::from_utf8(writer.into_inner())
      .map_err(|err| NormalizeError::Serialize(err.to_string()))
  }
}

/// Parse a complete document and return its root element.
///
/// Whitespace-only text is dropped. Declarations, doctypes and processing instructions are
/// skipped; anything else that is not well formed is reported as [`NormalizeError::Xml`].
pub fn parse_document(text: &str) -> Result<Element, NormalizeError> {
  let mut reader = Reader::from_str(text);
  let mut open: Vec<Element> = Vec::new();
  let mut root: Option<Element> = None;

  loop {
    let event = reader.read_event().map_err(|err| {
      NormalizeError::Xml(format!("{} at byte {}", err, reader.buffer_position()))
    })?;

    match event {
      Event::Start(start) => open.push(element_from(&start)?),
      Event::Empty(start) => {
        let element = element_from(&start)?;
        attach(&mut open, &mut root, element)?;
      }
      Event::End(_) => {
        let element = open
          .pop()
          .ok_or_else(|| NormalizeError::Xml("unexpected closing tag".into()))?;
        attach(&mut open, &mut root, element)?;
      }
      Event::Text(content) => {
        let text = content.unescape().map_err(|err| {
          NormalizeError::Xml(format!("{} at byte {}", err, reader.buffer_position()))
        })?;
        if let Some(parent) = open.last_mut() {
          if !text.trim().is_empty() {
            parent.children.push(Node::Text(text.into_owned()));
          }
        }
      }
      Event::CData(content) => {
        if let Some(parent) = open.last_mut() {
          let data = String::from_utf8_lossy(&content).into_owned();
          parent.children.push(Node::CData(data));
        }
      }
      Event::Comment(content) => {
        if let Some(parent) = open.last_mut() {
          let body = String::from_utf8_lossy(&content).into_owned();
          parent.children.push(Node::Comment(body));
        }
      }
      Event::Eof => break,
      _ => {}
    }
  }

  if let Some(unclosed) = open.last() {
    return Err(NormalizeError::Xml(format!(
      "unclosed element <{}>",
      unclosed.name
    )));
  }

  root.ok_or_else(|| NormalizeError::Xml("document has no root element".into()))
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, NormalizeError> {
  let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
  let mut element = Element::new(name);

  for attribute in start.attributes() {
    let attribute = attribute.map_err(|err| NormalizeError::Xml(err.to_string()))?;
    let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
    let value = attribute
      .unescape_value()
      .map_err(|err| NormalizeError::Xml(err.to_string()))?
      .into_owned();
    element.attributes.push((key, value));
  }

  Ok(element)
}

fn attach(
  open: &mut [Element],
  root: &mut Option<Element>,
  element: Element,
) -> Result<(), NormalizeError> {
  if let Some(parent) = open.last_mut() {
    parent.children.push(Node::Element(element));
    return Ok(());
  }

  if root.is_some() {
    return Err(NormalizeError::Xml(format!(
      "unexpected second root element <{}>",
      element.name
    )));
  }

  *root = Some(element);
  Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), NormalizeError> {
  let mut start = BytesStart::new(element.name.as_str());
  for (key, value) in &element.attributes {
    start.push_attribute((key.as_str(), value.as_str()));
  }

  if element.children.is_empty() {
    return write_event(writer, Event::Empty(start));
  }

  write_event(writer, Event::Start(start))?;
  for child in &element.children {
    match child {
      Node::Element(nested) => write_element(writer, nested)?,
      Node::Text(text) => {
        write_event(writer, Event::Text(BytesText::from_escaped(partial_escape(text.as_str()))))?
      }
      Node::CData(data) => write_event(writer, Event::CData(BytesCData::new(data.as_str())))?,
      Node::Comment(body) => {
        write_event(writer, Event::Comment(BytesText::from_escaped(body.as_str())))?
      }
    }
  }
  write_event(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), NormalizeError> {
  writer
    .write_event(event)
    .map_err(|err| NormalizeError::Serialize(err.to_string()))
}
