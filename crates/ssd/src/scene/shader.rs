//! Shader programs.

use ssd_format::{Node, SceneBuilder};

use super::{Fields, SceneNode};
use crate::Result;

/// One stage of a shader program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Stage identifier.
    pub kind: u16,
    pub source: String,
}

impl SceneNode for ShaderSource {
    const NAME: &'static str = "ShaderSource";

    fn build(&self, scene: &mut SceneBuilder) -> Result<Node> {
        Ok(scene
            .node(Self::NAME)?
            .ushort("Type", self.kind)
            .string("Source", self.source.as_str())
            .build())
    }

    fn from_node(node: &Node) -> Result<Self> {
        let fields = Fields::of::<Self>(node)?;
        Ok(Self {
            kind: fields.ushort("Type")?,
            source: fields.string("Source")?,
        })
    }
}

/// A shader program with its stages embedded in the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    pub language: String,
    pub sources: Vec<ShaderSource>,
}

impl Shader {
    /// The placeholder GLSL program written alongside every scene.
    pub fn glsl() -> Self {
        Self {
            language: "GLSL".to_string(),
            sources: vec![
                ShaderSource {
                    kind: 1,
                    source: "int main() \n { \n return 0; \n }".to_string(),
                },
                ShaderSource {
                    kind: 1,
                    source: "int mainMain() \n { \n int x = 2; \n return 0; \n }".to_string(),
                },
            ],
        }
    }
}

impl SceneNode for Shader {
    const NAME: &'static str = "Shader";

    fn build(&self, scene: &mut SceneBuilder) -> Result<Node> {
        let shader = scene.node(Self::NAME)?.string("Language", self.language.as_str());
        let sources = self
            .sources
            .iter()
            .map(|source| source.build(scene))
            .collect::<Result<Vec<_>>>()?;
        Ok(shader.serialized("Source", sources).build())
    }

    fn from_node(node: &Node) -> Result<Self> {
        let fields = Fields::of::<Self>(node)?;
        Ok(Self {
            language: fields.string("Language")?,
            sources: fields
                .nodes("Source")?
                .iter()
                .map(ShaderSource::from_node)
                .collect::<Result<_>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssd_format::{DataType, Document, FormatVersion};

    #[test]
    fn test_sources_are_embedded() {
        let mut scene = SceneBuilder::new();
        let node = Shader::glsl().build(&mut scene).unwrap();

        let source = node.attribute("Source").unwrap();
        assert_eq!(source.data_type(), DataType::SerializedClass);
        assert_eq!(source.element_count(), 2);
        assert!(node.children.is_empty());

        let ids: Vec<u32> = source.value.as_nodes().unwrap().iter().map(|n| n.id.get()).collect();
        assert_eq!(ids, [51, 52]);
    }

    #[test]
    fn test_shader_survives_both_versions() {
        for version in FormatVersion::SUPPORTED {
            let node = Shader::glsl().build(&mut SceneBuilder::new()).unwrap();
            let bytes = Document::new(vec![node]).with_version(version).to_bytes().unwrap();
            let document = Document::parse(&bytes).unwrap();
            assert_eq!(Shader::from_node(&document.nodes[0]).unwrap(), Shader::glsl());
        }
    }
}
