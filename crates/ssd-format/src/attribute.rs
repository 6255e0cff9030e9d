//! Attributes and their wire encoding.
//!
//! ```text
//! 0xBA | name_len:u8 | name\0 | type_len:u8 | type_name\0
//!      | byte_count:u32 | element_count:u32 | value | 0xBB
//! ```

use ssd_common::BinaryReader;
use tracing::trace;

use crate::codec::{check_no_nul, wire_u32, Decoder, Encoder};
use crate::{DataType, Error, Frame, Result, Value, Width};

/// Sentinel opening an attribute.
pub const ATTRIBUTE_BEGIN: u8 = 0xBA;

/// Sentinel closing an attribute.
pub const ATTRIBUTE_END: u8 = 0xBB;

/// Smallest possible encoded node, used to bound preallocation.
const MIN_NODE_SIZE: usize = 10;

/// A named, typed value attached to a node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: Value,
}

impl Attribute {
    /// Create an attribute.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Get the data type of the value.
    #[inline]
    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }

    /// Number of elements in the value.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.value.len()
    }

    /// Whether the value is a single element.
    ///
    /// A single-element attribute has the same encoding as a one-element
    /// sequence, so this is derived from the value rather than stored.
    #[inline]
    pub fn is_single_element(&self) -> bool {
        self.value.len() == 1
    }

    /// Get the value as a single string, if it is a one-string `Char` value.
    pub fn as_str(&self) -> Option<&str> {
        match self.value.as_strings() {
            Some([single]) => Some(single),
            _ => None,
        }
    }

    /// Get the value as a single reference, if it is a one-element `Uid` value.
    pub fn as_reference(&self) -> Option<Option<crate::Uid>> {
        match self.value.as_references() {
            Some([single]) => Some(*single),
            _ => None,
        }
    }
}

impl Encoder {
    /// Write one attribute, including any nodes embedded in its value.
    pub(crate) fn write_attribute(&mut self, attribute: &Attribute) -> Result<()> {
        let data_type = attribute.data_type();
        let element_count = wire_u32("attribute element count", attribute.element_count())?;

        self.writer.write_u8(ATTRIBUTE_BEGIN);
        self.write_name("attribute name", &attribute.name)?;
        self.write_name("type name", data_type.as_str())?;

        match &attribute.value {
            Value::SerializedClass(nodes) => {
                let byte_count_slot = self.writer.reserve_u32();
                self.writer.write_u32(element_count);

                let payload_start = self.writer.len();
                for node in nodes {
                    self.write_node(node)?;
                }

                let byte_count = if self.options.version.has_payload_lengths() {
                    wire_u32("attribute byte count", self.writer.len() - payload_start)?
                } else {
                    element_count
                };
                self.writer.patch_u32(byte_count_slot, byte_count);
            }
            Value::Char(strings) => {
                let mut byte_count = 0usize;
                for string in strings {
                    check_no_nul("string value", string)?;
                    byte_count += string.len() + 1;
                }
                self.writer.write_u32(wire_u32("attribute byte count", byte_count)?);
                self.writer.write_u32(element_count);
                for string in strings {
                    self.writer.write_cstring(string);
                }
            }
            numeric => {
                let Width::Fixed(width) = data_type.width() else {
                    return Err(Error::UnknownType(data_type.as_str().to_string()));
                };
                let byte_count = attribute
                    .element_count()
                    .checked_mul(width)
                    .unwrap_or(usize::MAX);
                self.writer.write_u32(wire_u32("attribute byte count", byte_count)?);
                self.writer.write_u32(element_count);
                self.write_numeric(numeric);
            }
        }

        self.writer.write_u8(ATTRIBUTE_END);
        trace!(name = %attribute.name, %data_type, element_count, "encoded attribute");
        Ok(())
    }

    fn write_numeric(&mut self, value: &Value) {
        let writer = &mut self.writer;
        match value {
            Value::Byte(values) => writer.write_bytes(values),
            Value::UInt(values) => values.iter().for_each(|&v| writer.write_u32(v)),
            Value::Int(values) => values.iter().for_each(|&v| writer.write_i32(v)),
            Value::Int16(values) => values.iter().for_each(|&v| writer.write_i16(v)),
            Value::UInt16(values) => values.iter().for_each(|&v| writer.write_u16(v)),
            Value::Float(values) => values.iter().for_each(|&v| writer.write_f32(v)),
            Value::Uid(values) => values
                .iter()
                .for_each(|&v| writer.write_u32(crate::Uid::to_raw(v))),
            Value::Char(_) | Value::SerializedClass(_) => {}
        }
    }
}

impl<'a> Decoder<'a> {
    /// Read one attribute, positioned at its begin sentinel.
    pub(crate) fn read_attribute(&mut self) -> Result<Attribute> {
        self.expect_sentinel(ATTRIBUTE_BEGIN, Frame::Attribute)?;
        let name = self.read_name(Frame::Attribute)?.to_string();
        let data_type = DataType::from_name(self.read_name(Frame::Attribute)?)?;
        let byte_count = self.read_u32(Frame::Attribute)?;
        let element_count = self.read_u32(Frame::Attribute)?;

        let value_offset = self.position();
        if byte_count as usize > self.reader.remaining() {
            return Err(Error::TruncatedAttribute {
                offset: value_offset,
                needed: byte_count as usize,
                available: self.reader.remaining(),
            });
        }

        let value = match data_type {
            DataType::SerializedClass => self.read_serialized(&name, byte_count, element_count)?,
            _ => {
                let payload = self.read_bytes(byte_count as usize, Frame::Attribute)?;
                decode_payload(&name, data_type, payload, element_count)?
            }
        };

        self.expect_sentinel(ATTRIBUTE_END, Frame::Attribute)?;
        trace!(%name, %data_type, element_count, "decoded attribute");
        Ok(Attribute { name, value })
    }

    fn read_serialized(&mut self, name: &str, byte_count: u32, element_count: u32) -> Result<Value> {
        if !self.version.has_payload_lengths() && byte_count != element_count {
            return Err(Error::ByteCountMismatch {
                attribute: name.to_string(),
                declared: byte_count as u64,
                expected: element_count as u64,
            });
        }

        let capacity = (element_count as usize).min(self.reader.remaining() / MIN_NODE_SIZE);
        let mut nodes = Vec::with_capacity(capacity);
        let payload_start = self.position();
        for _ in 0..element_count {
            nodes.push(self.read_node()?);
        }

        let consumed = self.position() - payload_start;
        if self.version.has_payload_lengths() && consumed != byte_count as usize {
            return Err(Error::ByteCountMismatch {
                attribute: name.to_string(),
                declared: byte_count as u64,
                expected: consumed as u64,
            });
        }

        Ok(Value::SerializedClass(nodes))
    }
}

/// Decode a fixed-width or string payload of exactly `byte_count` bytes.
fn decode_payload(name: &str, data_type: DataType, payload: &[u8], element_count: u32) -> Result<Value> {
    let width = match data_type.width() {
        Width::Fixed(width) => width,
        Width::Variable => return decode_strings(name, payload, element_count),
    };

    let expected = element_count as u64 * width as u64;
    if payload.len() as u64 != expected {
        return Err(Error::ByteCountMismatch {
            attribute: name.to_string(),
            declared: payload.len() as u64,
            expected,
        });
    }

    let value = match data_type {
        DataType::Byte => Value::Byte(payload.to_vec()),
        DataType::UInt => Value::UInt(read_all(payload, BinaryReader::read_u32)?),
        DataType::Int => Value::Int(read_all(payload, BinaryReader::read_i32)?),
        DataType::Int16 => Value::Int16(read_all(payload, BinaryReader::read_i16)?),
        DataType::UInt16 => Value::UInt16(read_all(payload, BinaryReader::read_u16)?),
        DataType::Float => Value::Float(read_all(payload, BinaryReader::read_f32)?),
        DataType::Uid => Value::Uid(read_all(payload, |r| r.read_u32().map(crate::Uid::new))?),
        DataType::None | DataType::Char | DataType::SerializedClass => {
            return Err(Error::UnknownType(data_type.as_str().to_string()))
        }
    };
    Ok(value)
}

fn decode_strings(name: &str, payload: &[u8], element_count: u32) -> Result<Value> {
    if payload.last().is_some_and(|&b| b != 0) {
        return Err(Error::UnterminatedString {
            attribute: name.to_string(),
        });
    }

    let mut strings = Vec::new();
    let mut start = 0;
    for end in memchr::memchr_iter(0, payload) {
        let string = std::str::from_utf8(&payload[start..end]).map_err(ssd_common::Error::Utf8)?;
        strings.push(string.to_string());
        start = end + 1;
    }

    if strings.len() as u64 != element_count as u64 {
        return Err(Error::ElementCountMismatch {
            attribute: name.to_string(),
            declared: element_count as u64,
            actual: strings.len() as u64,
        });
    }
    Ok(Value::Char(strings))
}

/// Read fixed-width elements until the payload is exhausted.
fn read_all<'a, T>(
    payload: &'a [u8],
    read: impl Fn(&mut BinaryReader<'a>) -> ssd_common::Result<T>,
) -> Result<Vec<T>> {
    let mut reader = BinaryReader::new(payload);
    let mut values = Vec::new();
    while !reader.is_empty() {
        values.push(read(&mut reader)?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{DecodeOptions, EncodeOptions};
    use crate::{FormatVersion, Uid};
    use ssd_common::BinaryReader;

    fn encode(attribute: &Attribute) -> Vec<u8> {
        let mut encoder = Encoder::new(EncodeOptions::default());
        encoder.write_attribute(attribute).unwrap();
        encoder.into_bytes()
    }

    fn decode(bytes: &[u8]) -> Result<Attribute> {
        let mut decoder = Decoder::new(BinaryReader::new(bytes), FormatVersion::V1, DecodeOptions::default());
        decoder.read_attribute()
    }

    #[test]
    fn test_single_byte_layout() {
        let bytes = encode(&Attribute::new("Flag", 1u8));

        let mut expected = vec![0xBA, 0x05];
        expected.extend_from_slice(b"Flag\0");
        expected.push(0x0E);
        expected.extend_from_slice(b"unsigned char\0");
        expected.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 1, 0x01, 0xBB]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_numeric_values_are_big_endian() {
        let bytes = encode(&Attribute::new("Type", 1u16));
        // "Type\0" and "unsigned short\0" precede the counts.
        let value_start = 1 + 1 + 5 + 1 + 15;
        assert_eq!(&bytes[value_start..value_start + 8], &[0, 0, 0, 2, 0, 0, 0, 1]);
        assert_eq!(&bytes[value_start + 8..value_start + 10], &[0x00, 0x01]);

        let bytes = encode(&Attribute::new("Scale", vec![1.0f32, -2.0]));
        assert!(bytes.ends_with(&[0x3F, 0x80, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0xBB]));
    }

    #[test]
    fn test_fixed_width_payloads_decode() {
        let values = [
            Value::UInt(vec![0, 0x0102_0304, u32::MAX]),
            Value::Int(vec![i32::MIN, -1, 7]),
            Value::Int16(vec![-2, 2]),
            Value::UInt16(vec![0xBEEF]),
            Value::Float(vec![1.0, -0.5]),
            Value::Uid(vec![None, Uid::new(0x0A0B_0C0D)]),
        ];
        for value in values {
            let attribute = Attribute::new("Values", value);
            assert_eq!(decode(&encode(&attribute)).unwrap(), attribute);
        }
    }

    #[test]
    fn test_single_string_layout() {
        let bytes = encode(&Attribute::new("Tag", "default"));
        let tail: [&[u8]; 3] = [&[0, 0, 0, 8, 0, 0, 0, 1], b"default\0", &[0xBB]];
        assert!(bytes.ends_with(&tail.concat()));
    }

    #[test]
    fn test_string_sequence_round_trip() {
        let attribute = Attribute::new("Names", vec!["a", "", "shader source\n{ }"]);
        let bytes = encode(&attribute);
        let decoded = decode(&bytes).unwrap();

        assert_eq!(decoded, attribute);
        assert_eq!(decoded.element_count(), 3);
        // Terminators never appear in the decoded strings.
        assert!(decoded.value.as_strings().unwrap().iter().all(|s| !s.contains('\0')));
    }

    #[test]
    fn test_references_round_trip() {
        let attribute = Attribute::new("Links", vec![Uid::new(51), None, Uid::new(7)]);
        let decoded = decode(&encode(&attribute)).unwrap();
        assert_eq!(decoded, attribute);
        assert_eq!(Attribute::new("MeshReference", Uid::new(51)).as_reference(), Some(Uid::new(51)));
    }

    #[test]
    fn test_single_element_decodes_with_count_one() {
        let decoded = decode(&encode(&Attribute::new("Exposure", 0.5f32))).unwrap();
        assert!(decoded.is_single_element());
        assert_eq!(decoded.element_count(), 1);
    }

    #[test]
    fn test_unknown_type_name() {
        let mut bytes = vec![0xBA, 0x02, b'X', 0x00, 0x07];
        bytes.extend_from_slice(b"double\0");
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 0xBB]);
        assert!(matches!(decode(&bytes), Err(Error::UnknownType(name)) if name == "double"));
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = encode(&Attribute::new("Indices", vec![1u32, 2, 3]));
        bytes.truncate(bytes.len() - 5);
        assert!(matches!(decode(&bytes), Err(Error::TruncatedAttribute { .. })));
    }

    #[test]
    fn test_byte_count_must_match_width() {
        let mut bytes = encode(&Attribute::new("Id", 5u32));
        // Claim two elements for four bytes.
        let count_offset = 1 + 1 + 3 + 1 + 13 + 4;
        bytes[count_offset + 3] = 2;
        assert!(matches!(decode(&bytes), Err(Error::ByteCountMismatch { .. })));
    }

    #[test]
    fn test_bad_end_sentinel() {
        let mut bytes = encode(&Attribute::new("Flag", 1u8));
        *bytes.last_mut().unwrap() = 0xAB;
        assert!(matches!(
            decode(&bytes),
            Err(Error::MalformedFrame { frame: Frame::Attribute, expected: 0xBB, actual: 0xAB, .. })
        ));
    }

    #[test]
    fn test_unterminated_string() {
        let mut bytes = encode(&Attribute::new("Name", "abc"));
        let last_char = bytes.len() - 2;
        bytes[last_char] = b'!';
        assert!(matches!(decode(&bytes), Err(Error::UnterminatedString { .. })));
    }

    #[test]
    fn test_interior_nul_rejected_on_encode() {
        let mut encoder = Encoder::new(EncodeOptions::default());
        assert!(matches!(
            encoder.write_attribute(&Attribute::new("Name", "a\0b")),
            Err(Error::InteriorNul { what: "string value", .. })
        ));
    }
}
