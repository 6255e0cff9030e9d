//! Error types for reading and writing scene nodes.

use ssd_format::DataType;
use thiserror::Error;

/// Errors that can occur when converting between nodes and scene types.
#[derive(Debug, Error)]
pub enum Error {
    /// Format library error.
    #[error("{0}")]
    Format(#[from] ssd_format::Error),

    /// A node of another kind was passed in.
    #[error("expected a {expected} node, got '{actual}'")]
    UnexpectedNode {
        expected: &'static str,
        actual: String,
    },

    /// A required attribute is absent.
    #[error("{node} node has no '{attribute}' attribute")]
    MissingAttribute {
        node: &'static str,
        attribute: &'static str,
    },

    /// A required child node is absent.
    #[error("{node} node has no {child} child")]
    MissingChild {
        node: &'static str,
        child: &'static str,
    },

    /// An attribute holds a different type than expected.
    #[error("{node}.{attribute}: expected {expected}, got {actual}")]
    WrongType {
        node: &'static str,
        attribute: &'static str,
        expected: DataType,
        actual: DataType,
    },

    /// An attribute holds the wrong number of elements.
    #[error("{node}.{attribute}: expected {expected} elements, got {actual}")]
    ElementCount {
        node: &'static str,
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An enumerated attribute holds an unknown value.
    #[error("{node}.{attribute}: invalid value {value}")]
    InvalidValue {
        node: &'static str,
        attribute: &'static str,
        value: u32,
    },
}

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, Error>;
