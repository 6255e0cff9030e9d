//! Type-safe attribute values.
//!
//! A [`Value`] is always a sequence. A single-element attribute is simply a
//! sequence of length one, which is exactly how it is laid out on the wire.

use crate::{DataType, Node, Uid};

/// The value of an attribute, one variant per wire encoding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "values"))]
pub enum Value {
    /// Unsigned 8-bit integers.
    #[cfg_attr(feature = "serde", serde(rename = "unsigned char"))]
    Byte(Vec<u8>),
    /// Unsigned 32-bit integers.
    #[cfg_attr(feature = "serde", serde(rename = "unsigned int"))]
    UInt(Vec<u32>),
    /// Signed 32-bit integers.
    #[cfg_attr(feature = "serde", serde(rename = "int"))]
    Int(Vec<i32>),
    /// Signed 16-bit integers.
    #[cfg_attr(feature = "serde", serde(rename = "short"))]
    Int16(Vec<i16>),
    /// Unsigned 16-bit integers.
    #[cfg_attr(feature = "serde", serde(rename = "unsigned short"))]
    UInt16(Vec<u16>),
    /// 32-bit floats.
    #[cfg_attr(feature = "serde", serde(rename = "float"))]
    Float(Vec<f32>),
    /// Node references; `None` is written as 0.
    #[cfg_attr(feature = "serde", serde(rename = "uid"))]
    Uid(Vec<Option<Uid>>),
    /// Strings, each written with a null terminator.
    #[cfg_attr(feature = "serde", serde(rename = "char"))]
    Char(Vec<String>),
    /// Embedded node trees.
    #[cfg_attr(feature = "serde", serde(rename = "SerializedClass"))]
    SerializedClass(Vec<Node>),
}

impl Value {
    /// Get the data type this value is written as.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Byte(_) => DataType::Byte,
            Self::UInt(_) => DataType::UInt,
            Self::Int(_) => DataType::Int,
            Self::Int16(_) => DataType::Int16,
            Self::UInt16(_) => DataType::UInt16,
            Self::Float(_) => DataType::Float,
            Self::Uid(_) => DataType::Uid,
            Self::Char(_) => DataType::Char,
            Self::SerializedClass(_) => DataType::SerializedClass,
        }
    }

    /// Number of elements (the wire `element_count`).
    pub fn len(&self) -> usize {
        match self {
            Self::Byte(v) => v.len(),
            Self::UInt(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Uid(v) => v.len(),
            Self::Char(v) => v.len(),
            Self::SerializedClass(v) => v.len(),
        }
    }

    /// Check if the value holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the bytes of a `Byte` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Byte(v) => Some(v),
            _ => None,
        }
    }

    /// Get the elements of a `UInt` value.
    pub fn as_uints(&self) -> Option<&[u32]> {
        match self {
            Self::UInt(v) => Some(v),
            _ => None,
        }
    }

    /// Get the elements of an `Int` value.
    pub fn as_ints(&self) -> Option<&[i32]> {
        match self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Get the elements of an `Int16` value.
    pub fn as_shorts(&self) -> Option<&[i16]> {
        match self {
            Self::Int16(v) => Some(v),
            _ => None,
        }
    }

    /// Get the elements of a `UInt16` value.
    pub fn as_ushorts(&self) -> Option<&[u16]> {
        match self {
            Self::UInt16(v) => Some(v),
            _ => None,
        }
    }

    /// Get the elements of a `Float` value.
    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Get the references of a `Uid` value.
    pub fn as_references(&self) -> Option<&[Option<Uid>]> {
        match self {
            Self::Uid(v) => Some(v),
            _ => None,
        }
    }

    /// Get the strings of a `Char` value.
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            Self::Char(v) => Some(v),
            _ => None,
        }
    }

    /// Get the nodes of a `SerializedClass` value.
    pub fn as_nodes(&self) -> Option<&[Node]> {
        match self {
            Self::SerializedClass(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! impl_from_elements {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(vec![value])
                }
            }

            impl From<Vec<$ty>> for Value {
                #[inline]
                fn from(values: Vec<$ty>) -> Self {
                    Self::$variant(values)
                }
            }
        )*
    };
}

impl_from_elements! {
    u8 => Byte,
    u32 => UInt,
    i32 => Int,
    i16 => Int16,
    u16 => UInt16,
    f32 => Float,
    Option<Uid> => Uid,
    String => Char,
    Node => SerializedClass,
}

impl From<Uid> for Value {
    #[inline]
    fn from(uid: Uid) -> Self {
        Self::Uid(vec![Some(uid)])
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Char(vec![value.to_string()])
    }
}

impl From<Vec<&str>> for Value {
    #[inline]
    fn from(values: Vec<&str>) -> Self {
        Self::Char(values.into_iter().map(str::to_string).collect())
    }
}
