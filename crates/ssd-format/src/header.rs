//! SSD container header.

use zerocopy::byteorder::big_endian::U16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result};

/// Version byte of an SSD container.
///
/// The versions differ only in the `byte_count` field of `SerializedClass`
/// attributes: version 1 stores the number of embedded nodes there (which
/// is what existing exporters write), version 2 stores the encoded length of
/// the embedded nodes so that readers can skip the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
#[repr(u8)]
pub enum FormatVersion {
    /// `SerializedClass` byte count equals the element count.
    #[default]
    V1 = 1,
    /// `SerializedClass` byte count is the true payload length.
    V2 = 2,
}

impl FormatVersion {
    /// All versions this implementation reads and writes.
    pub const SUPPORTED: [FormatVersion; 2] = [Self::V1, Self::V2];

    /// Parse from the version byte.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            other => Err(Error::UnsupportedVersion(other)),
        }
    }

    /// Get the version byte.
    #[inline]
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Whether `SerializedClass` byte counts hold the payload length.
    #[inline]
    pub fn has_payload_lengths(&self) -> bool {
        matches!(self, Self::V2)
    }
}

impl TryFrom<u8> for FormatVersion {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value)
    }
}

impl From<FormatVersion> for u8 {
    fn from(version: FormatVersion) -> Self {
        version.as_u8()
    }
}

impl std::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Fixed-size start of an SSD file.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ContainerHeader {
    /// Always `SSD`.
    pub signature: [u8; 3],
    /// Format version byte.
    pub version: u8,
    /// Number of top-level nodes.
    pub node_count: U16,
}

impl ContainerHeader {
    /// The signature at the start of every SSD file.
    pub const SIGNATURE: &'static [u8; 3] = b"SSD";

    /// Size of the header in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a header for `node_count` top-level nodes.
    pub fn new(version: FormatVersion, node_count: u16) -> Self {
        Self {
            signature: *Self::SIGNATURE,
            version: version.as_u8(),
            node_count: U16::new(node_count),
        }
    }
}
