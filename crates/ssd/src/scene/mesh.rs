//! Geometry, materials and the renderers that tie them to objects.

use ssd_format::{Node, SceneBuilder, Uid};

use super::{Fields, SceneNode};
use crate::Result;

/// How a renderer rasterizes its mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DrawType {
    WireFrame = 0,
    #[default]
    Fill = 1,
    Points = 2,
}

impl DrawType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::WireFrame),
            1 => Some(Self::Fill),
            2 => Some(Self::Points),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WireFrame => "wireframe",
            Self::Fill => "fill",
            Self::Points => "points",
        }
    }
}

impl std::fmt::Display for DrawType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triangulated geometry.
///
/// Vertex attributes are flat arrays of three floats per vertex (positions,
/// normals and `u v w` texture coordinates). `indices` lists three vertices
/// per triangle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub name: String,
    pub indices: Vec<u32>,
    pub normals: Vec<f32>,
    pub positions: Vec<f32>,
    pub tex_coords: Vec<f32>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = indices;
        self
    }

    pub fn with_normals(mut self, normals: Vec<f32>) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_positions(mut self, positions: Vec<f32>) -> Self {
        self.positions = positions;
        self
    }

    pub fn with_tex_coords(mut self, tex_coords: Vec<f32>) -> Self {
        self.tex_coords = tex_coords;
        self
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl SceneNode for Mesh {
    const NAME: &'static str = "Mesh";

    fn build(&self, scene: &mut SceneBuilder) -> Result<Node> {
        Ok(scene
            .node(Self::NAME)?
            .string("Name", self.name.as_str())
            .uints("Indices", self.indices.iter().copied())
            .floats("Normals", self.normals.iter().copied())
            .floats("Positions", self.positions.iter().copied())
            .floats("TexCoord", self.tex_coords.iter().copied())
            .build())
    }

    fn from_node(node: &Node) -> Result<Self> {
        let fields = Fields::of::<Self>(node)?;
        Ok(Self {
            name: fields.string("Name")?,
            indices: fields.uints("Indices")?,
            normals: fields.floats("Normals")?,
            positions: fields.floats("Positions")?,
            tex_coords: fields.floats("TexCoord")?,
        })
    }
}

/// Draws a mesh for the owning object.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderer {
    pub draw_type: DrawType,
    pub enabled: bool,
    pub mesh: Option<Uid>,
    pub material: Option<Uid>,
}

impl Renderer {
    /// An enabled, filled renderer for `mesh` without a material.
    pub fn new(mesh: Uid) -> Self {
        Self {
            draw_type: DrawType::Fill,
            enabled: true,
            mesh: Some(mesh),
            material: None,
        }
    }

    pub fn with_material(mut self, material: Uid) -> Self {
        self.material = Some(material);
        self
    }
}

impl SceneNode for Renderer {
    const NAME: &'static str = "Renderer";

    fn build(&self, scene: &mut SceneBuilder) -> Result<Node> {
        Ok(scene
            .node(Self::NAME)?
            .byte("DrawType", self.draw_type as u8)
            .byte("Enabled", self.enabled as u8)
            .reference("MeshReference", self.mesh)
            .reference("MaterialReference", self.material)
            .build())
    }

    fn from_node(node: &Node) -> Result<Self> {
        let fields = Fields::of::<Self>(node)?;
        let raw = fields.byte("DrawType")?;
        let draw_type = DrawType::from_u8(raw).ok_or_else(|| fields.invalid("DrawType", raw.into()))?;
        Ok(Self {
            draw_type,
            enabled: fields.flag("Enabled")?,
            mesh: fields.reference("MeshReference")?,
            material: fields.reference("MaterialReference")?,
        })
    }
}

/// Surface appearance shared by renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub shader_name: String,
    pub diffuse_color: [f32; 3],
}

impl Material {
    /// A material using the default shader.
    pub fn new(name: impl Into<String>, diffuse_color: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            shader_name: "default".to_string(),
            diffuse_color,
        }
    }
}

impl SceneNode for Material {
    const NAME: &'static str = "Material";

    fn build(&self, scene: &mut SceneBuilder) -> Result<Node> {
        Ok(scene
            .node(Self::NAME)?
            .string("Name", self.name.as_str())
            .string("ShaderName", self.shader_name.as_str())
            .floats("DiffuseColor", self.diffuse_color)
            .build())
    }

    fn from_node(node: &Node) -> Result<Self> {
        let fields = Fields::of::<Self>(node)?;
        Ok(Self {
            name: fields.string("Name")?,
            shader_name: fields.string("ShaderName")?,
            diffuse_color: fields.float_array("DiffuseColor")?,
        })
    }
}
