//! Typed views of the node kinds a scene exporter writes.
//!
//! A scene is a flat list of top-level nodes:
//!
//! - `Object` nodes, each with `ObjectMetadata`, `Transform` and optionally
//!   `Light` and `Renderer` children
//! - `Mesh` and `Material` nodes, referenced from renderers by identifier
//! - `Shader` nodes, embedding their `ShaderSource` stages
//!
//! Each kind implements [`SceneNode`], converting to and from a generic
//! [`Node`] with the attribute names and types the exporter uses.
//!
//! # Example
//!
//! ```
//! use ssd::prelude::*;
//! use ssd::scene::{nodes_of, Mesh, Object, Renderer, SceneNode};
//!
//! let mut scene = SceneBuilder::new();
//! let mesh = Mesh::new("triangle")
//!     .with_positions(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
//!     .with_indices(vec![0, 1, 2])
//!     .build(&mut scene)?;
//!
//! let mut object = Object::new(1, "triangle");
//! object.renderer = Some(Renderer::new(mesh.id));
//! let object = object.build(&mut scene)?;
//!
//! scene.add(object).add(mesh);
//! let document = Document::parse(&scene.finish().to_bytes()?)?;
//!
//! let meshes: Vec<_> = nodes_of::<Mesh>(&document.nodes).collect::<ssd::Result<_>>()?;
//! assert_eq!(meshes[0].1.triangle_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod light;
mod mesh;
mod object;
mod shader;

pub use light::{Light, LightType};
pub use mesh::{DrawType, Material, Mesh, Renderer};
pub use object::{Object, ObjectMetadata, Transform};
pub use shader::{Shader, ShaderSource};

use ssd_format::{DataType, Node, SceneBuilder, Uid, Value};

use crate::{Error, Result};

/// A node kind with a fixed name and attribute layout.
pub trait SceneNode: Sized {
    /// Node name identifying this kind.
    const NAME: &'static str;

    /// Build a node, allocating identifiers from `scene`.
    fn build(&self, scene: &mut SceneBuilder) -> Result<Node>;

    /// Read a node of this kind.
    fn from_node(node: &Node) -> Result<Self>;
}

/// Read every node of kind `T` among `nodes`, paired with its identifier.
pub fn nodes_of<'a, T: SceneNode>(nodes: &'a [Node]) -> impl Iterator<Item = Result<(Uid, T)>> + 'a {
    nodes
        .iter()
        .filter(|node| node.name == T::NAME)
        .map(|node| T::from_node(node).map(|value| (node.id, value)))
}

/// Typed attribute access for one node.
pub(crate) struct Fields<'a> {
    kind: &'static str,
    node: &'a Node,
}

impl<'a> Fields<'a> {
    pub(crate) fn of<T: SceneNode>(node: &'a Node) -> Result<Self> {
        if node.name != T::NAME {
            return Err(Error::UnexpectedNode {
                expected: T::NAME,
                actual: node.name.clone(),
            });
        }
        Ok(Self {
            kind: T::NAME,
            node,
        })
    }

    fn value(&self, attribute: &'static str) -> Result<&'a Value> {
        self.node
            .attribute(attribute)
            .map(|a| &a.value)
            .ok_or(Error::MissingAttribute {
                node: self.kind,
                attribute,
            })
    }

    fn typed<T>(
        &self,
        attribute: &'static str,
        expected: DataType,
        get: impl FnOnce(&'a Value) -> Option<&'a [T]>,
    ) -> Result<&'a [T]> {
        let value = self.value(attribute)?;
        get(value).ok_or(Error::WrongType {
            node: self.kind,
            attribute,
            expected,
            actual: value.data_type(),
        })
    }

    fn single<T: Copy>(&self, attribute: &'static str, values: &[T]) -> Result<T> {
        match values {
            [value] => Ok(*value),
            _ => Err(self.count_error(attribute, 1, values.len())),
        }
    }

    fn count_error(&self, attribute: &'static str, expected: usize, actual: usize) -> Error {
        Error::ElementCount {
            node: self.kind,
            attribute,
            expected,
            actual,
        }
    }

    pub(crate) fn invalid(&self, attribute: &'static str, value: u32) -> Error {
        Error::InvalidValue {
            node: self.kind,
            attribute,
            value,
        }
    }

    pub(crate) fn byte(&self, attribute: &'static str) -> Result<u8> {
        self.single(attribute, self.typed(attribute, DataType::Byte, Value::as_bytes)?)
    }

    pub(crate) fn flag(&self, attribute: &'static str) -> Result<bool> {
        Ok(self.byte(attribute)? != 0)
    }

    pub(crate) fn uint(&self, attribute: &'static str) -> Result<u32> {
        self.single(attribute, self.typed(attribute, DataType::UInt, Value::as_uints)?)
    }

    pub(crate) fn ushort(&self, attribute: &'static str) -> Result<u16> {
        self.single(attribute, self.typed(attribute, DataType::UInt16, Value::as_ushorts)?)
    }

    pub(crate) fn float(&self, attribute: &'static str) -> Result<f32> {
        self.single(attribute, self.typed(attribute, DataType::Float, Value::as_floats)?)
    }

    pub(crate) fn reference(&self, attribute: &'static str) -> Result<Option<Uid>> {
        self.single(attribute, self.typed(attribute, DataType::Uid, Value::as_references)?)
    }

    pub(crate) fn string(&self, attribute: &'static str) -> Result<String> {
        match self.typed(attribute, DataType::Char, Value::as_strings)? {
            [value] => Ok(value.clone()),
            values => Err(self.count_error(attribute, 1, values.len())),
        }
    }

    pub(crate) fn uints(&self, attribute: &'static str) -> Result<Vec<u32>> {
        Ok(self.typed(attribute, DataType::UInt, Value::as_uints)?.to_vec())
    }

    pub(crate) fn floats(&self, attribute: &'static str) -> Result<Vec<f32>> {
        Ok(self.typed(attribute, DataType::Float, Value::as_floats)?.to_vec())
    }

    pub(crate) fn float_array<const N: usize>(&self, attribute: &'static str) -> Result<[f32; N]> {
        let values = self.typed(attribute, DataType::Float, Value::as_floats)?;
        <[f32; N]>::try_from(values).map_err(|_| self.count_error(attribute, N, values.len()))
    }

    pub(crate) fn nodes(&self, attribute: &'static str) -> Result<&'a [Node]> {
        self.typed(attribute, DataType::SerializedClass, Value::as_nodes)
    }

    pub(crate) fn child<T: SceneNode>(&self) -> Result<Option<T>> {
        self.node.child(T::NAME).map(T::from_node).transpose()
    }

    pub(crate) fn required_child<T: SceneNode>(&self) -> Result<T> {
        self.child::<T>()?.ok_or(Error::MissingChild {
            node: self.kind,
            child: T::NAME,
        })
    }
}
