//! VPZ parsing module
//!
//! Builds a [`Document`] tree from XML text using `quick-xml` events.

pub mod directory;
pub mod filter;

use crate::document::{Attribute, Doctype, Document, Element, Node, XmlDeclaration};
use crate::error::{ConversionError, ConversionErrorKind, ConversionResult, ParseError, ParseResult};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;
use std::path::PathBuf;

/// Deepest element nesting accepted before parsing is refused
pub const MAX_NESTING_DEPTH: usize = 1000;

/// Source for parsing operations
#[derive(Debug, Clone)]
pub enum VpzSource {
    /// In-memory XML text
    String(String),
    /// VPZ file on disk
    File(PathBuf),
}

impl VpzSource {
    /// Get a human-readable description of the source
    pub fn description(&self) -> String {
        match self {
            VpzSource::String(_) => "string input".to_string(),
            VpzSource::File(path) => format!("file: {}", path.display()),
        }
    }

    /// Get the size of the source in bytes, if it can be known without reading it
    pub fn estimated_size(&self) -> Option<u64> {
        match self {
            VpzSource::String(s) => Some(s.len() as u64),
            VpzSource::File(path) => std::fs::metadata(path).ok().map(|m| m.len()),
        }
    }

    /// Read content as string
    pub fn read_content(&self) -> ConversionResult<String> {
        match self {
            VpzSource::String(content) => Ok(content.clone()),
            VpzSource::File(path) => {
                let bytes = std::fs::read(path).map_err(|e| ConversionError::io(path, e))?;
                decode_content(bytes).map_err(|message| {
                    ConversionError::conversion(ConversionErrorKind::io(
                        message,
                        Some(path.clone()),
                    ))
                })
            }
        }
    }

    /// Read and parse this source into a document
    pub fn parse(&self) -> ConversionResult<Document> {
        let content = self.read_content()?;
        Ok(parse_document(&content)?)
    }
}

/// Turn file bytes into text. UTF-8 is taken as is; anything else is decoded
/// with the encoding named in the XML declaration.
fn decode_content(bytes: Vec<u8>) -> Result<String, String> {
    let bytes = match String::from_utf8(bytes) {
        Ok(text) => return Ok(text),
        Err(e) => e.into_bytes(),
    };

    let mut reader = Reader::from_reader(bytes.as_slice());
    let mut buf = Vec::new();
    let encoding = match reader.read_event_into(&mut buf) {
        Ok(Event::Decl(decl)) => decl.encoder(),
        _ => None,
    };
    let Some(encoding) = encoding else {
        return Err("not valid UTF-8 and no supported encoding declared".to_string());
    };

    quick_xml::encoding::decode(&bytes, encoding)
        .map(|text| text.into_owned())
        .map_err(|e| format!("cannot decode as {}: {}", encoding.name(), e))
}

/// Parse XML text into a document tree
pub fn parse_document(input: &str) -> ParseResult<Document> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut reader = Reader::from_str(input);
    reader.trim_text(false);

    let mut document = Document::default();
    let mut open: Vec<Element> = Vec::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => return Err(error_at(&reader, input, err.to_string())),
        };

        let node = match event {
            Event::Decl(decl) => {
                document.declaration = Some(
                    declaration(&decl).map_err(|msg| error_at(&reader, input, msg))?,
                );
                continue;
            }
            Event::DocType(body) => {
                let body = String::from_utf8_lossy(&body);
                let doctype = Doctype::parse(&body).ok_or_else(|| {
                    error_at(&reader, input, format!("malformed DOCTYPE declaration '{}'", body.trim()))
                })?;
                document.doctype = Some(doctype);
                continue;
            }
            Event::Start(start) => {
                let element = element(&start).map_err(|msg| error_at(&reader, input, msg))?;
                open.push(element);
                if open.len() > MAX_NESTING_DEPTH {
                    return Err(error_at(
                        &reader,
                        input,
                        format!("maximum nesting depth exceeded: {}", MAX_NESTING_DEPTH),
                    ));
                }
                continue;
            }
            Event::Empty(start) => {
                Node::Element(element(&start).map_err(|msg| error_at(&reader, input, msg))?)
            }
            Event::End(end) => match open.pop() {
                Some(element) => Node::Element(element),
                None => {
                    let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    return Err(error_at(
                        &reader,
                        input,
                        format!("unexpected closing tag </{}>", name),
                    ));
                }
            },
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| error_at(&reader, input, e.to_string()))?;
                Node::Text(text.into_owned())
            }
            Event::CData(data) => {
                Node::CData(String::from_utf8_lossy(&data.into_inner()).into_owned())
            }
            Event::Comment(comment) => {
                Node::Comment(String::from_utf8_lossy(&comment).into_owned())
            }
            Event::PI(pi) => Node::ProcessingInstruction(String::from_utf8_lossy(&pi).into_owned()),
            Event::Eof => break,
        };

        attach(&mut document, &mut open, node).map_err(|msg| error_at(&reader, input, msg))?;
    }

    if let Some(unclosed) = open.last() {
        return Err(ParseError::at_offset(
            format!("unclosed element <{}>", unclosed.name),
            input,
            input.len(),
        ));
    }
    if document.root().is_none() {
        return Err(ParseError::at_offset(
            "document has no root element".to_string(),
            input,
            input.len(),
        ));
    }

    Ok(document)
}

/// Hang a finished node under the innermost open element, or at top level
fn attach(document: &mut Document, open: &mut [Element], node: Node) -> Result<(), String> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(node);
        return Ok(());
    }

    match node {
        Node::Text(text) if text.trim().is_empty() => Ok(()),
        Node::Text(_) | Node::CData(_) => Err("text outside the root element".to_string()),
        Node::Element(element) if document.root().is_some() => Err(format!(
            "second root element <{}>",
            element.name
        )),
        node => {
            document.children.push(node);
            Ok(())
        }
    }
}

fn element(start: &BytesStart<'_>) -> Result<Element, String> {
    let mut element = Element::new(lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let raw = lossy(&attr.value);
        let value = unescape(&raw).map_err(|e| e.to_string())?;
        element
            .attributes
            .push(Attribute::new(lossy(attr.key.as_ref()), value));
    }
    Ok(element)
}

fn declaration(decl: &BytesDecl<'_>) -> Result<XmlDeclaration, String> {
    let version = decl.version().map_err(|e| e.to_string())?;
    let encoding = decl
        .encoding()
        .transpose()
        .map_err(|e| e.to_string())?
        .map(|value| lossy(&value));
    let standalone = decl
        .standalone()
        .transpose()
        .map_err(|e| e.to_string())?
        .map(|value| lossy(&value));

    Ok(XmlDeclaration {
        version: lossy(&version),
        encoding,
        standalone,
    })
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn error_at(reader: &Reader<&[u8]>, input: &str, message: String) -> ParseError {
    ParseError::at_offset(message, input, reader.buffer_position())
}
