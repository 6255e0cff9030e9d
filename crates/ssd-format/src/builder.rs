//! Builder for constructing SSD documents.
//!
//! This is the composition API a scene producer uses: create nodes, let the
//! session allocate their identifiers, append typed attributes and children,
//! then hand the finished tree to the encoder.

use crate::{Attribute, Document, FormatVersion, Node, Result, Uid, UidAllocator, Value};

/// A node being built.
///
/// # Example
///
/// ```
/// use ssd_format::{NodeBuilder, Uid};
///
/// let node = NodeBuilder::with_id(Uid::new(1).unwrap(), "Transform")
///     .byte("IsDynamic", 0)
///     .floats("LocalPosition", [0.0, 1.0, 0.0])
///     .reference("ParentID", None)
///     .build();
///
/// assert_eq!(node.attributes.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    /// Start a node with an explicit identifier.
    ///
    /// Use this for well-known nodes whose ids lie below the allocator base.
    pub fn with_id(id: Uid, name: impl Into<String>) -> Self {
        Self {
            node: Node::new(id, name),
        }
    }

    /// Get the identifier of the node being built.
    pub fn id(&self) -> Uid {
        self.node.id
    }

    /// Add an attribute.
    pub fn attr(mut self, attribute: Attribute) -> Self {
        self.node.attributes.push(attribute);
        self
    }

    /// Add an attribute from anything convertible to a [`Value`].
    pub fn value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attr(Attribute::new(name, value))
    }

    /// Add a single `unsigned char` attribute.
    pub fn byte(self, name: impl Into<String>, value: u8) -> Self {
        self.value(name, value)
    }

    /// Add an `unsigned char` array attribute.
    pub fn bytes(self, name: impl Into<String>, values: impl IntoIterator<Item = u8>) -> Self {
        self.value(name, Value::Byte(values.into_iter().collect()))
    }

    /// Add a single `unsigned int` attribute.
    pub fn uint(self, name: impl Into<String>, value: u32) -> Self {
        self.value(name, value)
    }

    /// Add an `unsigned int` array attribute.
    pub fn uints(self, name: impl Into<String>, values: impl IntoIterator<Item = u32>) -> Self {
        self.value(name, Value::UInt(values.into_iter().collect()))
    }

    /// Add a single `int` attribute.
    pub fn int(self, name: impl Into<String>, value: i32) -> Self {
        self.value(name, value)
    }

    /// Add an `int` array attribute.
    pub fn ints(self, name: impl Into<String>, values: impl IntoIterator<Item = i32>) -> Self {
        self.value(name, Value::Int(values.into_iter().collect()))
    }

    /// Add a single `short` attribute.
    pub fn short(self, name: impl Into<String>, value: i16) -> Self {
        self.value(name, value)
    }

    /// Add a `short` array attribute.
    pub fn shorts(self, name: impl Into<String>, values: impl IntoIterator<Item = i16>) -> Self {
        self.value(name, Value::Int16(values.into_iter().collect()))
    }

    /// Add a single `unsigned short` attribute.
    pub fn ushort(self, name: impl Into<String>, value: u16) -> Self {
        self.value(name, value)
    }

    /// Add an `unsigned short` array attribute.
    pub fn ushorts(self, name: impl Into<String>, values: impl IntoIterator<Item = u16>) -> Self {
        self.value(name, Value::UInt16(values.into_iter().collect()))
    }

    /// Add a single `float` attribute.
    pub fn float(self, name: impl Into<String>, value: f32) -> Self {
        self.value(name, value)
    }

    /// Add a `float` array attribute.
    pub fn floats(self, name: impl Into<String>, values: impl IntoIterator<Item = f32>) -> Self {
        self.value(name, Value::Float(values.into_iter().collect()))
    }

    /// Add a single string attribute.
    pub fn string(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.value(name, Value::Char(vec![value.into()]))
    }

    /// Add a string array attribute.
    pub fn strings<S: Into<String>>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.value(name, Value::Char(values.into_iter().map(Into::into).collect()))
    }

    /// Add a single node reference; `None` is written as 0.
    pub fn reference(self, name: impl Into<String>, target: Option<Uid>) -> Self {
        self.value(name, target)
    }

    /// Add a node reference array attribute.
    pub fn references(
        self,
        name: impl Into<String>,
        targets: impl IntoIterator<Item = Option<Uid>>,
    ) -> Self {
        self.value(name, Value::Uid(targets.into_iter().collect()))
    }

    /// Add an attribute embedding complete nodes.
    pub fn serialized(self, name: impl Into<String>, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.value(name, Value::SerializedClass(nodes.into_iter().collect()))
    }

    /// Add a child node.
    pub fn child(mut self, child: Node) -> Self {
        self.node.children.push(child);
        self
    }

    /// Add multiple children.
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.node.children.extend(children);
        self
    }

    /// Finish the node.
    pub fn build(self) -> Node {
        self.node
    }
}

/// Builds one document, allocating node identifiers as it goes.
///
/// Each builder owns its own [`UidAllocator`], so identifiers are unique
/// within the document and independent of any other builder.
///
/// # Example
///
/// ```
/// use ssd_format::SceneBuilder;
///
/// let mut scene = SceneBuilder::new();
/// let mesh = scene.node("Mesh")?.string("Name", "box").build();
/// let renderer = scene
///     .node("Renderer")?
///     .byte("Enabled", 1)
///     .reference("MeshReference", Some(mesh.id))
///     .build();
///
/// let object = scene.node("Object")?.child(renderer).build();
/// scene.add(object);
/// scene.add(mesh);
///
/// let document = scene.finish();
/// document.validate()?;
/// let bytes = document.to_bytes()?;
/// # Ok::<(), ssd_format::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    ids: UidAllocator,
    version: FormatVersion,
    nodes: Vec<Node>,
}

impl SceneBuilder {
    /// Create a builder with the default allocator base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder drawing identifiers from `ids`.
    pub fn with_allocator(ids: UidAllocator) -> Self {
        Self {
            ids,
            ..Self::default()
        }
    }

    /// Set the version of the finished document.
    pub fn version(mut self, version: FormatVersion) -> Self {
        self.version = version;
        self
    }

    /// Allocate an identifier without creating a node.
    pub fn allocate(&mut self) -> Result<Uid> {
        self.ids.allocate()
    }

    /// Start a node with a freshly allocated identifier.
    pub fn node(&mut self, name: impl Into<String>) -> Result<NodeBuilder> {
        Ok(NodeBuilder::with_id(self.ids.allocate()?, name))
    }

    /// Append a top-level node.
    pub fn add(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Top-level nodes added so far.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Finish the document.
    pub fn finish(self) -> Document {
        Document {
            version: self.version,
            nodes: self.nodes,
        }
    }
}
