//! Scene objects and their transforms.

use ssd_format::{Node, SceneBuilder, Uid};

use super::{Fields, Light, Renderer, SceneNode};
use crate::Result;

/// Tag and layer given to objects that do not set their own.
const DEFAULT_GROUP: &str = "default";

/// Descriptive data attached to every object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub name: String,
    pub tag: String,
    pub layer: String,
}

impl ObjectMetadata {
    /// Metadata with the default tag and layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: DEFAULT_GROUP.to_string(),
            layer: DEFAULT_GROUP.to_string(),
        }
    }
}

impl SceneNode for ObjectMetadata {
    const NAME: &'static str = "ObjectMetadata";

    fn build(&self, scene: &mut SceneBuilder) -> Result<Node> {
        Ok(scene
            .node(Self::NAME)?
            .string("Name", self.name.as_str())
            .string("Tag", self.tag.as_str())
            .string("Layer", self.layer.as_str())
            .build())
    }

    fn from_node(node: &Node) -> Result<Self> {
        let fields = Fields::of::<Self>(node)?;
        Ok(Self {
            name: fields.string("Name")?,
            tag: fields.string("Tag")?,
            layer: fields.string("Layer")?,
        })
    }
}

/// Local transform of an object relative to its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Parent object node, or `None` for a scene root.
    pub parent: Option<Uid>,
    pub is_dynamic: bool,
    pub position: [f32; 3],
    /// Rotation quaternion as `[x, y, z, w]`.
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            parent: None,
            is_dynamic: false,
            position: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
        }
    }
}

impl SceneNode for Transform {
    const NAME: &'static str = "Transform";

    fn build(&self, scene: &mut SceneBuilder) -> Result<Node> {
        Ok(scene
            .node(Self::NAME)?
            .reference("ParentID", self.parent)
            .byte("IsDynamic", self.is_dynamic as u8)
            .floats("LocalPosition", self.position)
            .floats("LocalRotation", self.rotation)
            .floats("LocalScale", self.scale)
            .build())
    }

    fn from_node(node: &Node) -> Result<Self> {
        let fields = Fields::of::<Self>(node)?;
        Ok(Self {
            parent: fields.reference("ParentID")?,
            is_dynamic: fields.flag("IsDynamic")?,
            position: fields.float_array("LocalPosition")?,
            rotation: fields.float_array("LocalRotation")?,
            scale: fields.float_array("LocalScale")?,
        })
    }
}

/// A placed scene object with its components.
///
/// Children are written in the order metadata, transform, light, renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// One-based object number, distinct from the node identifier.
    pub id: u32,
    pub metadata: ObjectMetadata,
    pub transform: Transform,
    pub light: Option<Light>,
    pub renderer: Option<Renderer>,
}

impl Object {
    /// An object at the origin with no components.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            metadata: ObjectMetadata::new(name),
            transform: Transform::default(),
            light: None,
            renderer: None,
        }
    }
}

impl SceneNode for Object {
    const NAME: &'static str = "Object";

    fn build(&self, scene: &mut SceneBuilder) -> Result<Node> {
        let object = scene.node(Self::NAME)?.uint("Id", self.id);
        let mut children = vec![self.metadata.build(scene)?, self.transform.build(scene)?];
        if let Some(light) = &self.light {
            children.push(light.build(scene)?);
        }
        if let Some(renderer) = &self.renderer {
            children.push(renderer.build(scene)?);
        }
        Ok(object.children(children).build())
    }

    fn from_node(node: &Node) -> Result<Self> {
        let fields = Fields::of::<Self>(node)?;
        Ok(Self {
            id: fields.uint("Id")?,
            metadata: fields.required_child()?,
            transform: fields.required_child()?,
            light: fields.child()?,
            renderer: fields.child()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use ssd_format::DataType;

    #[test]
    fn test_object_layout() {
        let mut scene = SceneBuilder::new();
        let node = Object::new(1, "box").build(&mut scene).unwrap();

        assert_eq!(node.id.get(), 50);
        assert_eq!(node.attribute("Id").unwrap().data_type(), DataType::UInt);
        let names: Vec<&str> = node.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["ObjectMetadata", "Transform"]);

        let metadata = &node.children[0];
        assert_eq!(metadata.id.get(), 51);
        assert_eq!(metadata.attribute("Tag").unwrap().as_str(), Some("default"));

        let transform = &node.children[1];
        assert_eq!(transform.attribute("ParentID").unwrap().as_reference(), Some(None));
        assert_eq!(transform.attribute("LocalRotation").unwrap().element_count(), 4);
    }

    #[test]
    fn test_transform_required() {
        let mut scene = SceneBuilder::new();
        let metadata = ObjectMetadata::new("x").build(&mut scene).unwrap();
        let node = scene.node("Object").unwrap().uint("Id", 3).child(metadata).build();
        assert!(matches!(
            Object::from_node(&node),
            Err(Error::MissingChild { child: "Transform", .. })
        ));
    }
}
