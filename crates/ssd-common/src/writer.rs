//! Binary writer producing big-endian byte streams.

use byteorder::{BigEndian, ByteOrder};

/// A growable big-endian output buffer.
///
/// Writes into a `Vec<u8>` never fail, so unlike `std::io::Write` none of
/// these methods return a `Result`. Fields whose value is only known after
/// their payload has been written can be reserved and patched afterwards.
///
/// # Example
///
/// ```
/// use ssd_common::BinaryWriter;
///
/// let mut writer = BinaryWriter::new();
/// writer.write_u8(0xAA);
/// writer.write_u32(1);
/// assert_eq!(writer.as_slice(), &[0xAA, 0x00, 0x00, 0x00, 0x01]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with preallocated capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Write a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Write a big-endian u16.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        let mut bytes = [0u8; 2];
        BigEndian::write_u16(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    /// Write a big-endian i16.
    #[inline]
    pub fn write_i16(&mut self, value: i16) {
        let mut bytes = [0u8; 2];
        BigEndian::write_i16(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    /// Write a big-endian u32.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        let mut bytes = [0u8; 4];
        BigEndian::write_u32(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    /// Write a big-endian i32.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        let mut bytes = [0u8; 4];
        BigEndian::write_i32(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    /// Write a big-endian IEEE-754 f32.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        let mut bytes = [0u8; 4];
        BigEndian::write_f32(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Write a string followed by a null terminator.
    #[inline]
    pub fn write_cstring(&mut self, value: &str) {
        self.buffer.extend_from_slice(value.as_bytes());
        self.buffer.push(0);
    }

    /// Reserve a u32 slot to be filled in later with [`patch_u32`](Self::patch_u32).
    ///
    /// Returns the offset of the slot.
    #[inline]
    pub fn reserve_u32(&mut self) -> usize {
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(&[0; 4]);
        offset
    }

    /// Overwrite a previously written u32 at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + 4` exceeds the number of bytes written.
    #[inline]
    pub fn patch_u32(&mut self, offset: usize, value: u32) {
        BigEndian::write_u32(&mut self.buffer[offset..offset + 4], value);
    }

    /// Get the bytes written so far.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer and return the buffer.
    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}
