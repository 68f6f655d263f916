//! Tolerant tree parsing for message markup bodies.
//!
//! Markup arriving from the native side is close to XML but not
//! reliably well-formed. The parser keeps what it understands: element
//! names are namespace-stripped, CDATA collapses into text, stray end
//! tags and trailing garbage are skipped, and attributes are retained
//! for the payload decoder.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed markup: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("No root element")]
    NoRoot,
}

/// One element in the parsed tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkupNode {
    /// Element name with any namespace prefix stripped.
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
    /// Concatenated text and CDATA content, trimmed.
    pub text: String,
}

impl MarkupNode {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, ParseError> {
        let mut node = MarkupNode {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            ..Default::default()
        };
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            node.attrs.push((key, value));
        }
        Ok(node)
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&MarkupNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Walk a fixed child path from this node.
    pub fn at(&self, path: &[&str]) -> Option<&MarkupNode> {
        let mut node = self;
        for name in path {
            node = node.child(name)?;
        }
        Some(node)
    }

    /// Text content at a fixed child path.
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        self.at(path).map(|n| n.text.as_str())
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse a markup body into its root element.
///
/// Content after the root closes is ignored. Elements left open at the
/// end of input are folded into their parents instead of failing.
pub fn parse(input: &str) -> Result<MarkupNode, ParseError> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(true);
    reader.check_end_names(false);

    let mut stack: Vec<MarkupNode> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(MarkupNode::from_start(&start)?);
            }
            Event::Empty(start) => {
                let node = MarkupNode::from_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            Event::End(_) => {
                let node = match stack.pop() {
                    Some(node) => node,
                    // stray end tag
                    None => continue,
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(node),
                }
            }
            Event::Text(text) => {
                if let Some(node) = stack.last_mut() {
                    push_text(node, &text.unescape()?);
                }
            }
            Event::CData(cdata) => {
                if let Some(node) = stack.last_mut() {
                    let raw = cdata.into_inner();
                    push_text(node, &String::from_utf8_lossy(&raw));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    while let Some(node) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => return Ok(node),
        }
    }
    Err(ParseError::NoRoot)
}

fn push_text(node: &mut MarkupNode, chunk: &str) {
    let chunk = chunk.trim();
    if chunk.is_empty() {
        return;
    }
    if !node.text.is_empty() {
        node.text.push(' ');
    }
    node.text.push_str(chunk);
}
