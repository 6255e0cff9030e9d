//! XML text form of SSD documents.
//!
//! The text form is lossless: every document survives a trip through XML
//! unchanged, so it can be used to inspect and hand-edit binary files.
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <scene version="1">
//!   <node id="50" name="Object">
//!     <attribute name="Id" type="unsigned int">1</attribute>
//!     <attribute name="Tag" type="char">
//!       <string>default</string>
//!     </attribute>
//!     <node id="51" name="Transform"/>
//!   </node>
//! </scene>
//! ```
//!
//! Numeric values are whitespace-separated; references use 0 for "no node".

use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::{Attribute, DataType, DecodeOptions, Document, Error, FormatVersion, Node, Result, Uid, Value};

const SCENE_TAG: &str = "scene";
const NODE_TAG: &str = "node";
const ATTRIBUTE_TAG: &str = "attribute";
const STRING_TAG: &str = "string";

fn xml_error(error: impl Display) -> Error {
    Error::Xml(error.to_string())
}

impl Document {
    /// Convert to an XML string.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut output = Vec::new();
        self.write_xml(&mut output)?;
        String::from_utf8(output).map_err(xml_error)
    }

    /// Write XML to a writer.
    pub fn write_xml<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut xml_writer = Writer::new_with_indent(writer, b' ', 2);

        xml_writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(xml_error)?;

        let version = self.version.to_string();
        let mut scene = BytesStart::new(SCENE_TAG);
        scene.push_attribute(("version", version.as_str()));

        if self.nodes.is_empty() {
            return xml_writer.write_event(Event::Empty(scene)).map_err(xml_error);
        }

        xml_writer.write_event(Event::Start(scene)).map_err(xml_error)?;
        for node in &self.nodes {
            write_node(&mut xml_writer, node)?;
        }
        xml_writer
            .write_event(Event::End(BytesEnd::new(SCENE_TAG)))
            .map_err(xml_error)
    }

    /// Parse a document from its XML text form.
    pub fn from_xml(xml: &str) -> Result<Self> {
        parse_xml(xml, &DecodeOptions::default())
    }

    /// Parse a document from its XML text form with explicit limits.
    ///
    /// Nesting counts `<node>` elements, including those embedded in
    /// `SerializedClass` attributes, the same way the binary decoder does.
    pub fn from_xml_with(xml: &str, options: &DecodeOptions) -> Result<Self> {
        parse_xml(xml, options)
    }

    /// Parse a document from XML bytes.
    pub fn from_xml_bytes(xml: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(xml).map_err(ssd_common::Error::Utf8)?;
        parse_xml(xml, &DecodeOptions::default())
    }
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<()> {
    let id = node.id.to_string();
    let mut elem = BytesStart::new(NODE_TAG);
    elem.push_attribute(("id", id.as_str()));
    elem.push_attribute(("name", node.name.as_str()));

    if node.attributes.is_empty() && node.children.is_empty() {
        return writer.write_event(Event::Empty(elem)).map_err(xml_error);
    }

    writer.write_event(Event::Start(elem)).map_err(xml_error)?;
    for attribute in &node.attributes {
        write_attribute(writer, attribute)?;
    }
    for child in &node.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(NODE_TAG)))
        .map_err(xml_error)
}

fn write_attribute<W: Write>(writer: &mut Writer<W>, attribute: &Attribute) -> Result<()> {
    let mut elem = BytesStart::new(ATTRIBUTE_TAG);
    elem.push_attribute(("name", attribute.name.as_str()));
    elem.push_attribute(("type", attribute.data_type().as_str()));

    if attribute.value.is_empty() {
        return writer.write_event(Event::Empty(elem)).map_err(xml_error);
    }

    writer.write_event(Event::Start(elem)).map_err(xml_error)?;
    match &attribute.value {
        Value::Char(strings) => {
            for string in strings {
                if string.is_empty() {
                    writer
                        .write_event(Event::Empty(BytesStart::new(STRING_TAG)))
                        .map_err(xml_error)?;
                    continue;
                }
                writer
                    .write_event(Event::Start(BytesStart::new(STRING_TAG)))
                    .map_err(xml_error)?;
                writer
                    .write_event(Event::Text(BytesText::new(string)))
                    .map_err(xml_error)?;
                writer
                    .write_event(Event::End(BytesEnd::new(STRING_TAG)))
                    .map_err(xml_error)?;
            }
        }
        Value::SerializedClass(nodes) => {
            for node in nodes {
                write_node(writer, node)?;
            }
        }
        numeric => {
            let text = numeric_text(numeric);
            writer
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(xml_error)?;
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(ATTRIBUTE_TAG)))
        .map_err(xml_error)
}

fn numeric_text(value: &Value) -> String {
    fn join<T: Display>(values: &[T]) -> String {
        values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    match value {
        Value::Byte(v) => join(v),
        Value::UInt(v) => join(v),
        Value::Int(v) => join(v),
        Value::Int16(v) => join(v),
        Value::UInt16(v) => join(v),
        Value::Float(v) => join(v),
        Value::Uid(v) => join(&v.iter().map(|r| Uid::to_raw(*r)).collect::<Vec<_>>()),
        Value::Char(_) | Value::SerializedClass(_) => String::new(),
    }
}

/// An element whose end tag has not been seen yet.
enum Open {
    Scene,
    Node(Node),
    Attribute {
        name: String,
        data_type: DataType,
        text: String,
        strings: Vec<String>,
        nodes: Vec<Node>,
    },
    String(String),
}

/// Parse the XML text form into a document.
fn parse_xml(xml: &str, options: &DecodeOptions) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Open> = Vec::new();
    let mut version = None;
    let mut nodes = Vec::new();
    let mut depth = 0;

    loop {
        match reader.read_event().map_err(|e| Error::Xml(format!("XML parse error: {}", e)))? {
            Event::Start(e) => {
                let open = open_element(&e, &stack, &mut version)?;
                enter(&open, &mut depth, options)?;
                stack.push(open);
            }
            Event::Empty(e) => {
                let open = open_element(&e, &stack, &mut version)?;
                enter(&open, &mut depth, options)?;
                stack.push(open);
                close_element(&mut stack, &mut nodes, &mut depth)?;
            }
            Event::End(_) => close_element(&mut stack, &mut nodes, &mut depth)?,
            Event::Text(e) => {
                let text = e.unescape().map_err(xml_error)?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let bytes = e.into_inner();
                let text = std::str::from_utf8(&bytes).map_err(ssd_common::Error::Utf8)?;
                push_text(&mut stack, text)?;
            }
            Event::Eof => break,
            _ => {} // Ignore declarations, comments and processing instructions
        }
    }

    if !stack.is_empty() {
        return Err(Error::Xml("unexpected end of document".to_string()));
    }
    let version = version.ok_or_else(|| Error::Xml("no <scene> element found".to_string()))?;
    Ok(Document { version, nodes })
}

/// Track `<node>` nesting as elements open.
fn enter(open: &Open, depth: &mut usize, options: &DecodeOptions) -> Result<()> {
    if let Open::Node(_) = open {
        *depth += 1;
        if *depth > options.max_depth {
            return Err(Error::MaxDepthExceeded {
                limit: options.max_depth,
            });
        }
    }
    Ok(())
}

fn open_element(e: &BytesStart, stack: &[Open], version: &mut Option<FormatVersion>) -> Result<Open> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let attributes = element_attributes(e)?;
    let get = |key: &str| {
        attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| Error::Xml(format!("<{}> is missing '{}'", tag, key)))
    };

    match (tag.as_str(), stack.last()) {
        (SCENE_TAG, None) if version.is_none() => {
            let parsed = match get("version") {
                Ok(value) => FormatVersion::from_u8(parse_number("version", value)?)?,
                Err(_) => FormatVersion::default(),
            };
            *version = Some(parsed);
            Ok(Open::Scene)
        }
        (
            NODE_TAG,
            Some(Open::Scene | Open::Node(_))
            | Some(Open::Attribute {
                data_type: DataType::SerializedClass,
                ..
            }),
        ) => {
            let raw: u32 = parse_number("id", get("id")?)?;
            let id = Uid::new(raw).ok_or_else(|| Error::Xml("node id 0 is reserved".to_string()))?;
            Ok(Open::Node(Node::new(id, get("name")?)))
        }
        (ATTRIBUTE_TAG, Some(Open::Node(_))) => Ok(Open::Attribute {
            name: get("name")?.to_string(),
            data_type: DataType::from_name(get("type")?)?,
            text: String::new(),
            strings: Vec::new(),
            nodes: Vec::new(),
        }),
        (
            STRING_TAG,
            Some(Open::Attribute {
                data_type: DataType::Char,
                ..
            }),
        ) => Ok(Open::String(String::new())),
        _ => Err(Error::Xml(format!("unexpected <{}> element", tag))),
    }
}

fn close_element(stack: &mut Vec<Open>, nodes: &mut Vec<Node>, depth: &mut usize) -> Result<()> {
    let closed = stack
        .pop()
        .ok_or_else(|| Error::Xml("unmatched end tag".to_string()))?;
    if let Open::Node(_) = closed {
        *depth -= 1;
    }

    match (closed, stack.last_mut()) {
        (Open::Scene, None) => Ok(()),
        (Open::Node(node), Some(Open::Scene)) => {
            nodes.push(node);
            Ok(())
        }
        (Open::Node(node), Some(Open::Node(parent))) => {
            parent.children.push(node);
            Ok(())
        }
        (Open::Node(node), Some(Open::Attribute { nodes, .. })) => {
            nodes.push(node);
            Ok(())
        }
        (
            Open::Attribute {
                name,
                data_type,
                text,
                strings,
                nodes,
            },
            Some(Open::Node(parent)),
        ) => {
            let value = attribute_value(&name, data_type, &text, strings, nodes)?;
            parent.attributes.push(Attribute { name, value });
            Ok(())
        }
        (Open::String(string), Some(Open::Attribute { strings, .. })) => {
            strings.push(string);
            Ok(())
        }
        _ => Err(Error::Xml("mismatched end tag".to_string())),
    }
}

fn push_text(stack: &mut [Open], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(Open::String(string)) => string.push_str(text),
        Some(Open::Attribute { text: buffer, .. }) => buffer.push_str(text),
        _ if text.trim().is_empty() => {}
        _ => return Err(Error::Xml(format!("unexpected text {:?}", text.trim()))),
    }
    Ok(())
}

fn attribute_value(
    name: &str,
    data_type: DataType,
    text: &str,
    strings: Vec<String>,
    nodes: Vec<Node>,
) -> Result<Value> {
    if matches!(data_type, DataType::Char | DataType::SerializedClass) && !text.trim().is_empty() {
        return Err(Error::Xml(format!(
            "unexpected text {:?} in '{}'; {} values go in child elements",
            text.trim(),
            name,
            data_type
        )));
    }

    let value = match data_type {
        DataType::Byte => Value::Byte(parse_numbers(name, text)?),
        DataType::UInt => Value::UInt(parse_numbers(name, text)?),
        DataType::Int => Value::Int(parse_numbers(name, text)?),
        DataType::Int16 => Value::Int16(parse_numbers(name, text)?),
        DataType::UInt16 => Value::UInt16(parse_numbers(name, text)?),
        DataType::Float => Value::Float(parse_numbers(name, text)?),
        DataType::Uid => Value::Uid(
            parse_numbers::<u32>(name, text)?
                .into_iter()
                .map(Uid::new)
                .collect(),
        ),
        DataType::Char => Value::Char(strings),
        DataType::SerializedClass => Value::SerializedClass(nodes),
        DataType::None => return Err(Error::UnknownType(data_type.as_str().to_string())),
    };
    Ok(value)
}

fn parse_numbers<T>(name: &str, text: &str) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: Display,
{
    text.split_whitespace()
        .map(|token| parse_number(name, token))
        .collect()
}

fn parse_number<T>(name: &str, token: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    token
        .parse()
        .map_err(|e| Error::Xml(format!("invalid value {:?} in '{}': {}", token, name, e)))
}

fn element_attributes(e: &BytesStart) -> Result<Vec<(String, String)>> {
    e.attributes()
        .map(|attr| {
            let attr = attr.map_err(xml_error)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(xml_error)?.into_owned();
            Ok((key, value))
        })
        .collect()
}
