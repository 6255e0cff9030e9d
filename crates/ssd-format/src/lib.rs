//! Encoder and decoder for the SSD scene description format.
//!
//! SSD is a self-describing hierarchical binary format. A document is a list
//! of top-level nodes; each node has a unique identifier, a name, typed
//! attributes and child nodes. Attributes name their own type in the stream,
//! so any document can be decoded without a schema.
//!
//! # Format Structure
//!
//! ```text
//! "SSD" | version:u8 | node_count:u16
//! node     = 0xAA | id:u32 | name | attr_count:u8 | child_count:u8 | attribute* | node* | 0xAB
//! attribute = 0xBA | name | type_name | byte_count:u32 | element_count:u32 | value | 0xBB
//! name     = len:u8 (including terminator) | bytes | 0x00
//! ```
//!
//! All multi-byte integers and floats are big-endian.
//!
//! # Example
//!
//! ```
//! use ssd_format::{Document, SceneBuilder};
//!
//! let mut scene = SceneBuilder::new();
//! let light = scene
//!     .node("Light")?
//!     .floats("Color", [1.0, 0.9, 0.8])
//!     .float("Intensity", 2.5)
//!     .build();
//! scene.add(light);
//!
//! let bytes = scene.finish().to_bytes()?;
//! let document = Document::parse(&bytes)?;
//! assert_eq!(document.nodes[0].name, "Light");
//! # Ok::<(), ssd_format::Error>(())
//! ```

mod attribute;
mod builder;
mod codec;
mod container;
mod error;
mod header;
mod index;
mod node;
mod types;
mod uid;
mod value;

pub mod file;

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "xml")]
mod xml;

pub use attribute::{Attribute, ATTRIBUTE_BEGIN, ATTRIBUTE_END};
pub use builder::{NodeBuilder, SceneBuilder};
pub use codec::{DecodeOptions, EncodeOptions, DEFAULT_MAX_DEPTH, MAX_NAME_LEN, MAX_NODE_ENTRIES};
pub use container::{decode, decode_with, encode, encode_with, Document};
pub use error::{Error, Frame, Result};
pub use file::{read_file, write_file, SceneFormat};
pub use header::{ContainerHeader, FormatVersion};
pub use index::DocumentIndex;
pub use node::{Node, NODE_BEGIN, NODE_END};
pub use types::{name_of, width_of, DataType, Width};
pub use uid::{Uid, UidAllocator};
pub use value::Value;
