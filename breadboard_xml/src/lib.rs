//! A library for reading and writing the XML encoding used by the breadboard
//! file formats.
//!
//! Documents are read into an owned [`XmlElement`] tree with `roxmltree` and
//! written back out with `quick-xml`, 2-space indented. The tree preserves
//! attribute order, so `from_str(to_string(e))` reproduces `e` exactly.

use std::io::Cursor;

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use thiserror::Error;

mod element;
pub mod number;

pub use element::XmlElement;

#[derive(Debug, Error)]
pub enum XmlParseError {
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Parses an XML document into an element tree.
///
/// Whitespace-only text nodes, comments, and processing instructions are
/// dropped. An element holds either child elements or text content; for the
/// (unsupported) mixed case, the last text node wins.
pub fn from_str(input: &str) -> Result<XmlElement, XmlParseError> {
    // Eagle files declare an (external) DTD, which roxmltree rejects unless
    // told otherwise. The external subset is never fetched.
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let document = roxmltree::Document::parse_with_options(input, options)?;

    Ok(convert_node(document.root_element()))
}

fn convert_node(node: roxmltree::Node) -> XmlElement {
    let mut element = XmlElement::new(node.tag_name().name());

    for attribute in node.attributes() {
        element
            .attributes
            .push((attribute.name().to_string(), attribute.value().to_string()));
    }

    for child in node.children() {
        if child.is_element() {
            element.children.push(convert_node(child));
        } else if child.is_text() {
            let text = child.text().unwrap_or_default().trim();

            if !text.is_empty() {
                element.text = Some(text.to_string());
            }
        }
    }

    element
}

/// Serializes an element tree to a document string with an XML declaration
/// and 2-space indentation. Childless, textless elements are self-closing.
pub fn to_string(element: &XmlElement) -> String {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    // The sink is an in-memory buffer, so writes cannot fail.
    write_document(&mut writer, element).expect("writing XML to an in-memory buffer failed");

    String::from_utf8(writer.into_inner().into_inner())
        .expect("serialized XML is not valid UTF-8")
}

fn write_document(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    element: &XmlElement,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    write_element(writer, element)
}

fn write_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    element: &XmlElement,
) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(element.name.as_str());

    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_none() {
        writer.write_event(Event::Empty(start))?;

        return Ok(());
    }

    writer.write_event(Event::Start(start))?;

    if let Some(text) = &element.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }

    for child in &element.children {
        write_element(writer, child)?;
    }

    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;

    Ok(())
}
