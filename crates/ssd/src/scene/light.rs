//! Light components.

use ssd_format::{Node, SceneBuilder};

use super::{Fields, SceneNode};
use crate::Result;

/// Kind of light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LightType {
    #[default]
    Point = 0,
}

/// A light attached to an object.
///
/// Only point lights are written; the node carries no type attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Linear RGB color.
    pub color: [f32; 3],
    pub exposure: f32,
    pub intensity: f32,
}

impl Light {
    /// Kind of this light.
    pub fn light_type(&self) -> LightType {
        LightType::Point
    }

    /// Intensity scaled by exposure, in stops.
    pub fn radiance(&self) -> f32 {
        self.intensity * self.exposure.exp2()
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            color: [1.0; 3],
            exposure: 0.0,
            intensity: 1.0,
        }
    }
}

impl SceneNode for Light {
    const NAME: &'static str = "Light";

    fn build(&self, scene: &mut SceneBuilder) -> Result<Node> {
        Ok(scene
            .node(Self::NAME)?
            .floats("Color", self.color)
            .float("Exposure", self.exposure)
            .float("Intensity", self.intensity)
            .build())
    }

    fn from_node(node: &Node) -> Result<Self> {
        let fields = Fields::of::<Self>(node)?;
        Ok(Self {
            color: fields.float_array("Color")?,
            exposure: fields.float("Exposure")?,
            intensity: fields.float("Intensity")?,
        })
    }
}
