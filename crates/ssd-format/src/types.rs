//! SSD data types.

use crate::{Error, Result};

/// Packed width of a data type on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// Every element occupies exactly this many bytes.
    Fixed(usize),
    /// Elements are self-delimiting (strings, nested nodes).
    Variable,
}

/// Data types an attribute value can carry.
///
/// The discriminants are the numeric tags used by the exporter. On the wire
/// the type is identified by its name, see [`DataType::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// Unused placeholder. Never written to a stream.
    None = 0,
    /// Unsigned 8-bit integer.
    Byte = 1,
    /// Unsigned 32-bit integer.
    UInt = 2,
    /// 32-bit floating point.
    Float = 3,
    /// Signed 32-bit integer.
    Int = 4,
    /// Signed 16-bit integer.
    Int16 = 5,
    /// Unsigned 16-bit integer.
    UInt16 = 6,
    /// Null-terminated string, or a sequence of them.
    Char = 7,
    /// Node identifier reference. Same wire width as `UInt`.
    Uid = 8,
    /// Sequence of complete nodes embedded in an attribute.
    SerializedClass = 9,
}

impl DataType {
    /// All types that may appear in a stream.
    pub const WIRE_TYPES: [DataType; 9] = [
        Self::Byte,
        Self::Int,
        Self::Int16,
        Self::UInt,
        Self::UInt16,
        Self::Float,
        Self::Char,
        Self::Uid,
        Self::SerializedClass,
    ];

    /// Parse from a numeric tag.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Self::None),
            1 => Ok(Self::Byte),
            2 => Ok(Self::UInt),
            3 => Ok(Self::Float),
            4 => Ok(Self::Int),
            5 => Ok(Self::Int16),
            6 => Ok(Self::UInt16),
            7 => Ok(Self::Char),
            8 => Ok(Self::Uid),
            9 => Ok(Self::SerializedClass),
            _ => Err(Error::UnknownTypeTag(tag)),
        }
    }

    /// Resolve a type from the name stored in a stream.
    ///
    /// Only exact matches of the recognized wire names succeed; `None` has no
    /// wire name and is never returned.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::WIRE_TYPES
            .iter()
            .copied()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| Error::UnknownType(name.to_string()))
    }

    /// Get the canonical name of this type, as written into streams.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Byte => "unsigned char",
            Self::UInt => "unsigned int",
            Self::Float => "float",
            Self::Int => "int",
            Self::Int16 => "short",
            Self::UInt16 => "unsigned short",
            Self::Char => "char",
            Self::Uid => "uid",
            Self::SerializedClass => "SerializedClass",
        }
    }

    /// Get the packed width of one element.
    pub fn width(&self) -> Width {
        match self {
            Self::None => Width::Fixed(0),
            Self::Byte => Width::Fixed(1),
            Self::Int16 | Self::UInt16 => Width::Fixed(2),
            Self::UInt | Self::Int | Self::Uid | Self::Float => Width::Fixed(4),
            Self::Char | Self::SerializedClass => Width::Variable,
        }
    }

    /// Numeric tag of this type.
    #[inline]
    pub fn tag(&self) -> u8 {
        *self as u8
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical name of a type. Equivalent to [`DataType::as_str`].
#[inline]
pub fn name_of(data_type: DataType) -> &'static str {
    data_type.as_str()
}

/// Packed width of a type. Equivalent to [`DataType::width`].
#[inline]
pub fn width_of(data_type: DataType) -> Width {
    data_type.width()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_resolve() {
        for data_type in DataType::WIRE_TYPES {
            assert_eq!(DataType::from_name(data_type.as_str()).unwrap(), data_type);
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        assert!(matches!(
            DataType::from_name("double"),
            Err(Error::UnknownType(name)) if name == "double"
        ));
        // Matching is exact.
        assert!(DataType::from_name("Float").is_err());
        assert!(DataType::from_name("none").is_err());
    }

    #[test]
    fn test_tags_round_trip() {
        for tag in 0..=9u8 {
            assert_eq!(DataType::from_tag(tag).unwrap().tag(), tag);
        }
        assert!(matches!(DataType::from_tag(10), Err(Error::UnknownTypeTag(10))));
    }

    #[test]
    fn test_widths() {
        assert_eq!(width_of(DataType::Byte), Width::Fixed(1));
        assert_eq!(width_of(DataType::UInt16), Width::Fixed(2));
        assert_eq!(width_of(DataType::Uid), Width::Fixed(4));
        assert_eq!(width_of(DataType::Float), Width::Fixed(4));
        assert_eq!(width_of(DataType::Char), Width::Variable);
        assert_eq!(width_of(DataType::None), Width::Fixed(0));
        assert_eq!(name_of(DataType::SerializedClass), "SerializedClass");
    }
}
