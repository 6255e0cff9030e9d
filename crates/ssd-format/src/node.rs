//! Nodes and their wire encoding.
//!
//! ```text
//! 0xAA | id:u32 | name_len:u8 | name\0 | attribute_count:u8 | child_count:u8
//!      | attribute* | node* | 0xAB
//! ```
//!
//! A node's attributes are written before any of its children, and every
//! child is written in full before the next one (pre-order).

use tracing::trace;

use crate::codec::{Decoder, Encoder, MAX_NODE_ENTRIES};
use crate::{Attribute, Error, Frame, Result, Uid};

/// Sentinel opening a node.
pub const NODE_BEGIN: u8 = 0xAA;

/// Sentinel closing a node.
pub const NODE_END: u8 = 0xAB;

/// A named, identified tree element.
///
/// A node exclusively owns its attributes and children. Links to nodes
/// elsewhere in the document are expressed as `Uid` attribute values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Unique identifier within the document.
    pub id: Uid,
    /// Node name.
    pub name: String,
    /// Attributes, in write order.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub attributes: Vec<Attribute>,
    /// Child nodes, in write order.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node with no attributes or children.
    pub fn new(id: Uid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Find the first attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Find the first child with the given name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Iterate over the children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Visit this node and every node below it in pre-order.
    ///
    /// Nodes embedded in `SerializedClass` attributes are visited right after
    /// their owning node, before its children, matching write order.
    pub fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a Node)) {
        visitor(self);
        for attribute in &self.attributes {
            if let Some(nodes) = attribute.value.as_nodes() {
                nodes.iter().for_each(|n| n.visit(visitor));
            }
        }
        self.children.iter().for_each(|c| c.visit(visitor));
    }

    /// Count this node and every node below it.
    pub fn count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }

    /// Maximum nesting depth below and including this node.
    pub fn depth(&self) -> usize {
        let embedded = self
            .attributes
            .iter()
            .filter_map(|a| a.value.as_nodes())
            .flatten();
        1 + embedded
            .chain(&self.children)
            .map(Node::depth)
            .max()
            .unwrap_or(0)
    }
}

impl Encoder {
    /// Write a node and its whole subtree.
    pub(crate) fn write_node(&mut self, node: &Node) -> Result<()> {
        check_entries("attribute count", node.attributes.len())?;
        check_entries("child count", node.children.len())?;
        self.enter()?;

        self.writer.write_u8(NODE_BEGIN);
        self.writer.write_u32(node.id.get());
        self.write_name("node name", &node.name)?;
        self.writer.write_u8(node.attributes.len() as u8);
        self.writer.write_u8(node.children.len() as u8);

        for attribute in &node.attributes {
            self.write_attribute(attribute)?;
        }
        for child in &node.children {
            self.write_node(child)?;
        }

        self.writer.write_u8(NODE_END);
        self.leave();
        trace!(id = %node.id, name = %node.name, "encoded node");
        Ok(())
    }
}

impl<'a> Decoder<'a> {
    /// Read a node and its whole subtree, positioned at its begin sentinel.
    pub(crate) fn read_node(&mut self) -> Result<Node> {
        self.enter()?;
        let offset = self.position();

        self.expect_sentinel(NODE_BEGIN, Frame::Node)?;
        let id = Uid::new(self.read_u32(Frame::Node)?).ok_or(Error::ReservedNodeId { offset })?;
        let name = self.read_name(Frame::Node)?.to_string();
        let attribute_count = self.read_u8(Frame::Node)?;
        let child_count = self.read_u8(Frame::Node)?;

        let mut attributes = Vec::with_capacity(attribute_count as usize);
        for _ in 0..attribute_count {
            attributes.push(self.read_attribute()?);
        }
        let mut children = Vec::with_capacity(child_count as usize);
        for _ in 0..child_count {
            children.push(self.read_node()?);
        }

        self.expect_sentinel(NODE_END, Frame::Node)?;
        self.leave();
        trace!(%id, %name, attribute_count, child_count, "decoded node");

        Ok(Node {
            id,
            name,
            attributes,
            children,
        })
    }
}

fn check_entries(what: &'static str, count: usize) -> Result<()> {
    if count > MAX_NODE_ENTRIES {
        return Err(Error::LimitExceeded {
            what,
            limit: MAX_NODE_ENTRIES,
            actual: count,
        });
    }
    Ok(())
}
