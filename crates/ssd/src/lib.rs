//! SSD - scene description toolkit.
//!
//! This crate provides a unified interface to the SSD crates and the typed
//! scene vocabulary built on top of the generic format.
//!
//! # Crates
//!
//! - [`ssd_common`] - Common utilities (big-endian binary reading and writing)
//! - [`ssd_format`] - The SSD format: node model, encoder, decoder, builders
//!
//! # Example
//!
//! ```no_run
//! use ssd::prelude::*;
//!
//! let document = read_file("scene.ssd")?;
//! document.validate()?;
//!
//! for (id, object) in nodes_of::<Object>(&document.nodes).flatten() {
//!     println!("{} {}", id, object.metadata.name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
pub mod scene;

pub use error::{Error, Result};

// Re-export all sub-crates
pub use ssd_common as common;
pub use ssd_format as format;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::scene::{
        nodes_of, DrawType, Light, LightType, Material, Mesh, Object, ObjectMetadata, Renderer,
        SceneNode, Shader, ShaderSource, Transform,
    };
    pub use ssd_format::{
        read_file, write_file, Attribute, DataType, Document, FormatVersion, Node, NodeBuilder,
        SceneBuilder, Uid, Value,
    };
}

// Re-export commonly used types at the crate root
pub use ssd_format::{Document, SceneBuilder};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
