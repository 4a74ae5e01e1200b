//! XML formatting module
//!
//! Serializes a [`Document`] with `quick-xml`'s writer. Pretty output uses
//! the indenting writer, so element-only content is laid out one element per
//! line while text content stays inline with its element.

use crate::conversion::ConversionConfig;
use crate::document::{Document, Element, Node};
use crate::error::{FormattingError, FormattingResult};
use quick_xml::escape::escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Encoding written in every declaration; output is always UTF-8
pub const OUTPUT_ENCODING: &str = "UTF-8";

/// Main XML formatter
pub struct XmlFormatter {
    indent_size: u8,
    pretty: bool,
}

impl XmlFormatter {
    /// Create a new formatter with configuration
    pub fn new(config: &ConversionConfig) -> Self {
        Self {
            indent_size: config.indent_size,
            pretty: config.pretty,
        }
    }

    /// Format a document as XML text
    pub fn format(&self, document: &Document) -> FormattingResult<String> {
        let mut writer = if self.pretty && self.indent_size > 0 {
            Writer::new_with_indent(Vec::new(), b' ', self.indent_size as usize)
        } else {
            Writer::new(Vec::new())
        };

        let declaration = document.declaration.clone().unwrap_or_default();
        write_event(
            &mut writer,
            Event::Decl(BytesDecl::new(
                &declaration.version,
                Some(OUTPUT_ENCODING),
                declaration.standalone.as_deref(),
            )),
        )?;

        if let Some(doctype) = &document.doctype {
            write_event(
                &mut writer,
                Event::DocType(BytesText::from_escaped(doctype.to_string())),
            )?;
        }

        for node in &document.children {
            write_node(&mut writer, node)?;
        }

        let mut output = String::from_utf8(writer.into_inner())
            .map_err(|e| FormattingError::encoding(e.to_string()))?;
        if self.pretty {
            output.push('\n');
        }
        Ok(output)
    }
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> FormattingResult<()> {
    match node {
        Node::Element(element) => write_element(writer, element),
        Node::Text(text) => write_event(writer, Event::Text(BytesText::new(text))),
        Node::CData(data) => write_event(writer, Event::CData(BytesCData::new(data.as_str()))),
        Node::Comment(comment) => write_event(
            writer,
            Event::Comment(BytesText::from_escaped(comment.as_str())),
        ),
        Node::ProcessingInstruction(pi) => {
            write_event(writer, Event::PI(BytesText::from_escaped(pi.as_str())))
        }
    }
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> FormattingResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for attr in &element.attributes {
        let value = escape_attribute(&attr.value);
        start.push_attribute((attr.name.as_bytes(), value.as_bytes()));
    }

    if element.children.is_empty() {
        return write_event(writer, Event::Empty(start));
    }

    write_event(writer, Event::Start(start))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    write_event(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

/// Escape markup characters, plus the whitespace a parser would otherwise
/// normalize to spaces inside an attribute value
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in escape(value).chars() {
        match c {
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn write_event<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> FormattingResult<()> {
    writer
        .write_event(event)
        .map_err(|e| FormattingError::serialization(e.to_string()))
}
