//! Shared encoder/decoder state and options.
//!
//! The per-structure halves of the codec live next to the types they encode:
//! attributes in [`crate::attribute`], nodes in [`crate::node`] and the
//! container in [`crate::container`].

use ssd_common::{BinaryReader, BinaryWriter};

use crate::{Error, FormatVersion, Frame, Result};

/// Nesting limit applied when none is configured.
///
/// Each embedded level costs a node frame and an attribute frame, so this
/// stays decodable on a 2 MiB thread stack in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Longest name that fits a one-byte length which counts the terminator.
pub const MAX_NAME_LEN: usize = u8::MAX as usize - 1;

/// Most attributes or children a node can carry.
pub const MAX_NODE_ENTRIES: usize = u8::MAX as usize;

/// Options controlling how a document is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Container version to write.
    pub version: FormatVersion,
    /// Deepest nesting written, counting `SerializedClass` payloads.
    ///
    /// Trees deeper than this are rejected so that everything written can be
    /// read back with the same limit.
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            version: FormatVersion::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EncodeOptions {
    /// Options writing the given version.
    pub fn with_version(version: FormatVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }
}

/// Options controlling how a document is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest nesting accepted, counting `SerializedClass` payloads.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Writer state for one encode call.
pub(crate) struct Encoder {
    pub(crate) writer: BinaryWriter,
    pub(crate) options: EncodeOptions,
    depth: usize,
}

impl Encoder {
    pub(crate) fn new(options: EncodeOptions) -> Self {
        Self {
            writer: BinaryWriter::with_capacity(256),
            options,
            depth: 0,
        }
    }

    pub(crate) fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(Error::LimitExceeded {
                what: "nesting depth",
                limit: self.options.max_depth,
                actual: self.depth,
            });
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Write a name as `len:u8 | bytes | 0`, where `len` counts the terminator.
    pub(crate) fn write_name(&mut self, what: &'static str, name: &str) -> Result<()> {
        check_no_nul(what, name)?;
        if name.len() > MAX_NAME_LEN {
            return Err(Error::LimitExceeded {
                what,
                limit: MAX_NAME_LEN,
                actual: name.len(),
            });
        }
        self.writer.write_u8(name.len() as u8 + 1);
        self.writer.write_cstring(name);
        Ok(())
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Reader state for one decode call.
pub(crate) struct Decoder<'a> {
    pub(crate) reader: BinaryReader<'a>,
    pub(crate) version: FormatVersion,
    max_depth: usize,
    depth: usize,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(reader: BinaryReader<'a>, version: FormatVersion, options: DecodeOptions) -> Self {
        Self {
            reader,
            version,
            max_depth: options.max_depth,
            depth: 0,
        }
    }

    pub(crate) fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(Error::MaxDepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.reader.position()
    }

    pub(crate) fn read_u8(&mut self, frame: Frame) -> Result<u8> {
        let offset = self.position();
        self.reader
            .read_u8()
            .map_err(|e| Error::from_read(frame, offset, e))
    }

    pub(crate) fn read_u32(&mut self, frame: Frame) -> Result<u32> {
        let offset = self.position();
        self.reader
            .read_u32()
            .map_err(|e| Error::from_read(frame, offset, e))
    }

    pub(crate) fn read_bytes(&mut self, count: usize, frame: Frame) -> Result<&'a [u8]> {
        let offset = self.position();
        self.reader
            .read_bytes(count)
            .map_err(|e| Error::from_read(frame, offset, e))
    }

    /// Read a sentinel byte and check it.
    pub(crate) fn expect_sentinel(&mut self, expected: u8, frame: Frame) -> Result<()> {
        let offset = self.position();
        let actual = self.read_u8(frame)?;
        if actual != expected {
            return Err(Error::MalformedFrame {
                frame,
                offset,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Read a name written by [`Encoder::write_name`].
    pub(crate) fn read_name(&mut self, frame: Frame) -> Result<&'a str> {
        let offset = self.position();
        let length = self.read_u8(frame)? as usize;
        self.reader
            .read_sized_cstring(length)
            .map_err(|e| Error::from_read(frame, offset, e))
    }
}

pub(crate) fn check_no_nul(what: &'static str, value: &str) -> Result<()> {
    if memchr::memchr(0, value.as_bytes()).is_some() {
        return Err(Error::InteriorNul {
            what,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Convert a length to a `u32` wire field.
pub(crate) fn wire_u32(what: &'static str, value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::LimitExceeded {
        what,
        limit: u32::MAX as usize,
        actual: value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_length_counts_terminator() {
        let mut encoder = Encoder::new(EncodeOptions::default());
        encoder.write_name("node name", "Root").unwrap();
        assert_eq!(encoder.into_bytes(), b"\x05Root\0");
    }

    #[test]
    fn test_name_limits() {
        let mut encoder = Encoder::new(EncodeOptions::default());
        encoder.write_name("node name", &"a".repeat(MAX_NAME_LEN)).unwrap();

        let too_long = "a".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            encoder.write_name("node name", &too_long),
            Err(Error::LimitExceeded { what: "node name", limit: 254, actual: 255 })
        ));
        assert!(matches!(
            encoder.write_name("node name", "a\0b"),
            Err(Error::InteriorNul { .. })
        ));
    }

    #[test]
    fn test_read_name_rejects_zero_length() {
        let data = [0x00];
        let mut decoder = Decoder::new(BinaryReader::new(&data), FormatVersion::V1, DecodeOptions::default());
        assert!(decoder.read_name(Frame::Node).is_err());
    }

    #[test]
    fn test_decoder_depth_limit() {
        let mut decoder = Decoder::new(
            BinaryReader::new(&[]),
            FormatVersion::V1,
            DecodeOptions { max_depth: 2 },
        );
        decoder.enter().unwrap();
        decoder.enter().unwrap();
        assert!(matches!(decoder.enter(), Err(Error::MaxDepthExceeded { limit: 2 })));
    }
}
