//! Error types for SSD encoding and decoding.

use thiserror::Error;

use crate::Uid;

/// The kind of frame a decode error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Node framing (`0xAA ... 0xAB`).
    Node,
    /// Attribute framing (`0xBA ... 0xBB`).
    Attribute,
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node => f.write_str("node"),
            Self::Attribute => f.write_str("attribute"),
        }
    }
}

/// Errors that can occur when encoding, decoding or validating SSD documents.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] ssd_common::Error),

    /// The stream does not start with `SSD`.
    #[error("invalid SSD signature: expected 'SSD', got {actual:?}")]
    BadSignature { actual: Vec<u8> },

    /// The container version is not understood by this implementation.
    #[error("unsupported SSD version {0}")]
    UnsupportedVersion(u8),

    /// The container header is shorter than its fixed size.
    #[error("truncated header: needed {needed} bytes but only {available} available")]
    TruncatedHeader { needed: usize, available: usize },

    /// A sentinel byte did not match.
    #[error("malformed {frame} frame at offset {offset}: expected {expected:#04x}, got {actual:#04x}")]
    MalformedFrame {
        frame: Frame,
        offset: usize,
        expected: u8,
        actual: u8,
    },

    /// An attribute type name is not part of the type registry.
    #[error("unknown data type '{0}'")]
    UnknownType(String),

    /// A numeric data type tag is not part of the type registry.
    #[error("unknown data type tag {0}")]
    UnknownTypeTag(u8),

    /// An attribute declares more bytes than remain in the buffer.
    #[error("truncated attribute at offset {offset}: needed {needed} bytes but only {available} available")]
    TruncatedAttribute {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A node header or sentinel runs past the end of the buffer.
    #[error("truncated node at offset {offset}: needed {needed} bytes but only {available} available")]
    TruncatedNode {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Nesting exceeds the configured depth limit.
    #[error("maximum nesting depth of {limit} exceeded")]
    MaxDepthExceeded { limit: usize },

    /// An attribute's byte count disagrees with its element count.
    #[error("attribute '{attribute}' declares {declared} value bytes, expected {expected}")]
    ByteCountMismatch {
        attribute: String,
        declared: u64,
        expected: u64,
    },

    /// A string attribute holds a different number of strings than declared.
    #[error("attribute '{attribute}' declares {declared} strings but holds {actual}")]
    ElementCountMismatch {
        attribute: String,
        declared: u64,
        actual: u64,
    },

    /// A string attribute payload does not end with a terminator.
    #[error("attribute '{attribute}' has an unterminated string value")]
    UnterminatedString { attribute: String },

    /// A node carries the reserved identifier 0.
    #[error("node at offset {offset} uses reserved identifier 0")]
    ReservedNodeId { offset: usize },

    /// Bytes remain after the last top-level node.
    #[error("{count} trailing bytes after the last node")]
    TrailingBytes { count: usize },

    /// A value does not fit in its wire field.
    #[error("{what} exceeds limit: {actual} > {limit}")]
    LimitExceeded {
        what: &'static str,
        limit: usize,
        actual: usize,
    },

    /// A name or string value contains a null byte.
    #[error("{what} contains a null byte: {value:?}")]
    InteriorNul { what: &'static str, value: String },

    /// The identifier allocator has no identifiers left.
    #[error("identifier space exhausted")]
    IdentifiersExhausted,

    /// Two nodes share one identifier.
    #[error("duplicate node identifier {0}")]
    DuplicateId(Uid),

    /// A reference attribute points at an identifier no node carries.
    #[error("node {node} attribute '{attribute}' references missing node {target}")]
    DanglingReference {
        node: Uid,
        attribute: String,
        target: Uid,
    },

    /// Invalid file extension.
    #[error("invalid file extension: expected {expected}, got {actual}")]
    InvalidExtension { expected: String, actual: String },

    /// The file's format is recognized but not available in this build.
    #[error("unsupported scene format: {0}")]
    UnsupportedFormat(String),

    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON parsing or writing error.
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Map a low-level read failure inside `frame` to the matching truncation error.
    pub(crate) fn from_read(frame: Frame, offset: usize, error: ssd_common::Error) -> Self {
        match error {
            ssd_common::Error::UnexpectedEof { needed, available } => match frame {
                Frame::Node => Self::TruncatedNode {
                    offset,
                    needed,
                    available,
                },
                Frame::Attribute => Self::TruncatedAttribute {
                    offset,
                    needed,
                    available,
                },
            },
            other => Self::Common(other),
        }
    }
}

/// Result type for SSD operations.
pub type Result<T> = std::result::Result<T, Error>;
