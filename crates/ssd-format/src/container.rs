//! SSD container: header plus the top-level node list.

use ssd_common::BinaryReader;
use tracing::debug;
use zerocopy::IntoBytes;

use crate::codec::{DecodeOptions, Decoder, EncodeOptions, Encoder};
use crate::{ContainerHeader, Error, FormatVersion, Node, Result};

/// A decoded or to-be-encoded SSD document.
///
/// Equality is structural: same version, same nodes in the same order with
/// the same ids, names, attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    /// Container version.
    pub version: FormatVersion,
    /// Top-level nodes.
    pub nodes: Vec<Node>,
}

impl Document {
    /// Create a document holding `nodes` with the default version.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            version: FormatVersion::default(),
            nodes,
        }
    }

    /// Set the version written by [`to_bytes`](Self::to_bytes).
    pub fn with_version(mut self, version: FormatVersion) -> Self {
        self.version = version;
        self
    }

    /// Check if data starts with the SSD signature.
    pub fn is_ssd(data: &[u8]) -> bool {
        data.starts_with(ContainerHeader::SIGNATURE)
    }

    /// Parse a document with default options.
    pub fn parse(data: &[u8]) -> Result<Self> {
        decode_with(data, &DecodeOptions::default())
    }

    /// Parse a document.
    pub fn parse_with(data: &[u8], options: &DecodeOptions) -> Result<Self> {
        decode_with(data, options)
    }

    /// Encode the document with its own version.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode_with(&self.nodes, &EncodeOptions::with_version(self.version))
    }

    /// Total number of nodes, including children and embedded nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(Node::count).sum()
    }

    /// Visit every node in write order.
    pub fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a Node)) {
        self.nodes.iter().for_each(|n| n.visit(visitor));
    }
}

/// Encode top-level nodes into an SSD byte stream with default options.
///
/// # Example
///
/// ```
/// use ssd_format::{encode, decode, Attribute, Node, Uid};
///
/// let mut root = Node::new(Uid::new(1).unwrap(), "Root");
/// root.attributes.push(Attribute::new("Flag", 1u8));
///
/// let bytes = encode(&[root.clone()])?;
/// assert!(bytes.starts_with(b"SSD\x01"));
/// assert_eq!(decode(&bytes)?.nodes, vec![root]);
/// # Ok::<(), ssd_format::Error>(())
/// ```
pub fn encode(nodes: &[Node]) -> Result<Vec<u8>> {
    encode_with(nodes, &EncodeOptions::default())
}

/// Encode top-level nodes into an SSD byte stream.
pub fn encode_with(nodes: &[Node], options: &EncodeOptions) -> Result<Vec<u8>> {
    let node_count = u16::try_from(nodes.len()).map_err(|_| Error::LimitExceeded {
        what: "top-level node count",
        limit: u16::MAX as usize,
        actual: nodes.len(),
    })?;

    let mut encoder = Encoder::new(*options);
    let header = ContainerHeader::new(options.version, node_count);
    encoder.writer.write_bytes(header.as_bytes());

    for node in nodes {
        encoder.write_node(node)?;
    }

    let bytes = encoder.into_bytes();
    debug!(
        version = %options.version,
        nodes = node_count,
        bytes = bytes.len(),
        "encoded SSD document"
    );
    Ok(bytes)
}

/// Decode an SSD byte stream with default options.
pub fn decode(data: &[u8]) -> Result<Document> {
    decode_with(data, &DecodeOptions::default())
}

/// Decode an SSD byte stream.
///
/// Any structural problem fails the whole decode; there is no partial result.
pub fn decode_with(data: &[u8], options: &DecodeOptions) -> Result<Document> {
    if !Document::is_ssd(data) {
        return Err(Error::BadSignature {
            actual: data[..ContainerHeader::SIGNATURE.len().min(data.len())].to_vec(),
        });
    }

    let mut reader = BinaryReader::new(data);
    let header: ContainerHeader = reader.read_struct().map_err(|_| Error::TruncatedHeader {
        needed: ContainerHeader::SIZE,
        available: data.len(),
    })?;
    let version = FormatVersion::from_u8(header.version)?;
    let node_count = header.node_count.get();

    let mut decoder = Decoder::new(reader, version, *options);
    let mut nodes = Vec::with_capacity(node_count as usize);
    for _ in 0..node_count {
        nodes.push(decoder.read_node()?);
    }

    let trailing = decoder.reader.remaining();
    if trailing != 0 {
        return Err(Error::TrailingBytes { count: trailing });
    }

    debug!(%version, nodes = node_count, bytes = data.len(), "decoded SSD document");
    Ok(Document { version, nodes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attribute, Uid};

    fn root() -> Node {
        let mut root = Node::new(Uid::new(1).unwrap(), "Root");
        root.attributes.push(Attribute::new("Flag", 1u8));
        root
    }

    /// The reference encoding of a single `Root` node with one `Flag` byte.
    fn root_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"SSD");
        bytes.extend_from_slice(&[0x01, 0x00, 0x01]);
        bytes.extend_from_slice(&[0xAA, 0x00, 0x00, 0x00, 0x01, 0x05]);
        bytes.extend_from_slice(b"Root\0");
        bytes.extend_from_slice(&[0x01, 0x00]);
        bytes.extend_from_slice(&[0xBA, 0x05]);
        bytes.extend_from_slice(b"Flag\0");
        bytes.push(0x0E);
        bytes.extend_from_slice(b"unsigned char\0");
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01]);
        bytes.extend_from_slice(&[0x01, 0xBB, 0xAB]);
        bytes
    }

    #[test]
    fn test_encode_exact_bytes() {
        assert_eq!(encode(&[root()]).unwrap(), root_bytes());
    }

    #[test]
    fn test_decode_exact_bytes() {
        let document = decode(&root_bytes()).unwrap();
        assert_eq!(document.version, FormatVersion::V1);
        assert_eq!(document.nodes, vec![root()]);
        assert!(document.nodes[0].attributes[0].is_single_element());
    }

    #[test]
    fn test_empty_document() {
        let bytes = Document::default().to_bytes().unwrap();
        assert_eq!(bytes, b"SSD\x01\x00\x00");
        assert_eq!(decode(&bytes).unwrap(), Document::default());
    }

    #[test]
    fn test_bad_signature() {
        assert!(matches!(decode(b"XSD\x01\x00\x00"), Err(Error::BadSignature { .. })));
        assert!(matches!(decode(b"SS"), Err(Error::BadSignature { actual }) if actual == b"SS"));
        assert!(matches!(decode(b""), Err(Error::BadSignature { .. })));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = root_bytes();
        bytes[3] = 9;
        assert!(matches!(decode(&bytes), Err(Error::UnsupportedVersion(9))));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            decode(b"SSD\x01\x00"),
            Err(Error::TruncatedHeader { needed: 6, available: 5 })
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = root_bytes();
        bytes.extend_from_slice(&[0xAA, 0xAB]);
        assert!(matches!(decode(&bytes), Err(Error::TrailingBytes { count: 2 })));
    }

    #[test]
    fn test_missing_top_level_node() {
        let mut bytes = root_bytes();
        bytes[5] = 2;
        assert!(matches!(decode(&bytes), Err(Error::TruncatedNode { .. })));
    }

    #[test]
    fn test_version_two_round_trip() {
        let mut source = Node::new(Uid::new(60).unwrap(), "ShaderSource");
        source.attributes.push(Attribute::new("Source", "void main() {}"));
        let mut shader = Node::new(Uid::new(59).unwrap(), "Shader");
        shader.attributes.push(Attribute::new("Source", vec![source]));

        let document = Document::new(vec![shader]).with_version(FormatVersion::V2);
        let bytes = document.to_bytes().unwrap();
        assert_eq!(bytes[3], 2);
        assert_eq!(decode(&bytes).unwrap(), document);

        // Version 1 stores the node count where version 2 stores the length.
        let v1 = document.clone().with_version(FormatVersion::V1).to_bytes().unwrap();
        assert_eq!(v1.len(), bytes.len());
        assert_ne!(v1[4..], bytes[4..]);
    }

    #[test]
    fn test_version_one_rejects_payload_lengths() {
        let mut inner = Node::new(Uid::new(2).unwrap(), "Inner");
        inner.attributes.push(Attribute::new("Flag", 0u8));
        let mut outer = Node::new(Uid::new(1).unwrap(), "Outer");
        outer.attributes.push(Attribute::new("Payload", vec![inner]));

        let mut bytes = Document::new(vec![outer]).with_version(FormatVersion::V2).to_bytes().unwrap();
        // Relabel the stream as version 1 without fixing the byte count.
        bytes[3] = 1;
        assert!(matches!(decode(&bytes), Err(Error::ByteCountMismatch { .. })));
    }

    #[test]
    fn test_too_many_top_level_nodes() {
        let nodes: Vec<Node> = (1..=65536u32)
            .map(|i| Node::new(Uid::new(i).unwrap(), ""))
            .collect();
        assert!(matches!(
            encode(&nodes),
            Err(Error::LimitExceeded { what: "top-level node count", .. })
        ));
    }
}
