//! JSON text form of SSD documents.
//!
//! Attribute values are tagged with their wire type name, so a document
//! converts back to identical binary. Non-finite floats have no JSON
//! representation and are rejected on the way back in.

use crate::{Document, Result};

impl Document {
    /// Convert to a pretty-printed JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a document from JSON bytes.
    pub fn from_json_slice(json: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, FormatVersion, NodeBuilder, Uid};

    #[test]
    fn test_json_round_trip() {
        let inner = NodeBuilder::with_id(Uid::new(3).unwrap(), "ShaderSource")
            .ushort("Type", 0)
            .build();
        let node = NodeBuilder::with_id(Uid::new(2).unwrap(), "Shader")
            .string("Language", "GLSL")
            .references("Targets", [None, Uid::new(3)])
            .floats("Color", [1.0, 0.25, 0.0])
            .serialized("Source", [inner])
            .build();
        let document = Document::new(vec![node]).with_version(FormatVersion::V2);

        let json = document.to_json_string().unwrap();
        assert!(json.contains("\"type\": \"char\""));
        assert_eq!(Document::from_json(&json).unwrap(), document);
        assert_eq!(Document::from_json_slice(json.as_bytes()).unwrap(), document);
    }

    #[test]
    fn test_json_rejects_invalid_input() {
        assert!(matches!(Document::from_json("{"), Err(Error::Json(_))));
        assert!(Document::from_json(r#"{"version":7,"nodes":[]}"#).is_err());
        assert!(Document::from_json(r#"{"version":1,"nodes":[{"id":0,"name":"x"}]}"#).is_err());
    }
}
