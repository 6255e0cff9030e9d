//! Decoding corrupt streams and encoding trees the format cannot hold.

use ssd_format::{
    decode, decode_with, encode, encode_with, Attribute, DecodeOptions, EncodeOptions, Error,
    Frame, Node, NodeBuilder, Uid, Value, DEFAULT_MAX_DEPTH, MAX_NAME_LEN,
};

fn uid(raw: u32) -> Uid {
    Uid::new(raw).unwrap()
}

/// Header plus one node `N` (id 1) carrying the given attribute bytes.
fn with_attribute(attribute: &[u8]) -> Vec<u8> {
    let mut bytes = b"SSD\x01\x00\x01".to_vec();
    bytes.extend_from_slice(&[0xAA, 0, 0, 0, 1, 0x02, b'N', 0, 0x01, 0x00]);
    bytes.extend_from_slice(attribute);
    bytes.push(0xAB);
    bytes
}

fn attribute(type_name: &str, byte_count: u32, element_count: u32, value: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0xBA, 0x02, b'A', 0, type_name.len() as u8 + 1];
    bytes.extend_from_slice(type_name.as_bytes());
    bytes.push(0);
    bytes.extend_from_slice(&byte_count.to_be_bytes());
    bytes.extend_from_slice(&element_count.to_be_bytes());
    bytes.extend_from_slice(value);
    bytes.push(0xBB);
    bytes
}

fn nested(depth: usize) -> Node {
    let mut node = Node::new(uid(depth as u32), "Leaf");
    for level in (1..depth).rev() {
        let mut parent = Node::new(uid(level as u32), "Level");
        parent.children.push(node);
        node = parent;
    }
    node
}

/// A chain where each node embeds the next through a `SerializedClass` value.
fn embedded(depth: usize) -> Node {
    let mut node = Node::new(uid(depth as u32), "Leaf");
    for level in (1..depth).rev() {
        let mut parent = Node::new(uid(level as u32), "Level");
        parent.attributes.push(Attribute::new("Inner", Value::SerializedClass(vec![node])));
        node = parent;
    }
    node
}

#[test]
fn well_formed_attribute_decodes() {
    let document = decode(&with_attribute(&attribute("short", 4, 2, &[0xFF, 0xFE, 0x00, 0x02]))).unwrap();
    let attribute = &document.nodes[0].attributes[0];
    assert_eq!(attribute.value, Value::Int16(vec![-2, 2]));
    assert_eq!(attribute.element_count(), 2);
}

#[test]
fn unknown_type_name() {
    let bytes = with_attribute(&attribute("double", 8, 1, &[0; 8]));
    assert!(matches!(decode(&bytes), Err(Error::UnknownType(name)) if name == "double"));
}

#[test]
fn type_names_are_case_sensitive() {
    let bytes = with_attribute(&attribute("Float", 4, 1, &[0; 4]));
    assert!(matches!(decode(&bytes), Err(Error::UnknownType(_))));
}

#[test]
fn wrong_attribute_sentinel() {
    let mut attr = attribute("int", 4, 1, &[0, 0, 0, 7]);
    attr[0] = 0xBC;
    match decode(&with_attribute(&attr)) {
        Err(Error::MalformedFrame { frame, offset, expected, actual }) => {
            assert_eq!(frame, Frame::Attribute);
            assert_eq!(offset, 16);
            assert_eq!(expected, 0xBA);
            assert_eq!(actual, 0xBC);
        }
        other => panic!("expected malformed frame, got {other:?}"),
    }
}

#[test]
fn wrong_node_end_sentinel() {
    let mut bytes = with_attribute(&attribute("int", 4, 1, &[0, 0, 0, 7]));
    *bytes.last_mut().unwrap() = 0xAC;
    assert!(matches!(
        decode(&bytes),
        Err(Error::MalformedFrame { frame: Frame::Node, expected: 0xAB, actual: 0xAC, .. })
    ));
}

#[test]
fn declared_payload_longer_than_stream() {
    let mut bytes = with_attribute(&attribute("unsigned int", 400, 100, &[]));
    bytes.truncate(bytes.len() - 2);
    assert!(matches!(decode(&bytes), Err(Error::TruncatedAttribute { needed: 400, .. })));
}

#[test]
fn byte_count_disagrees_with_width() {
    let bytes = with_attribute(&attribute("float", 4, 2, &[0; 4]));
    assert!(matches!(
        decode(&bytes),
        Err(Error::ByteCountMismatch { declared: 4, expected: 8, .. })
    ));
}

#[test]
fn string_count_disagrees() {
    let bytes = with_attribute(&attribute("char", 4, 1, b"a\0b\0"));
    assert!(matches!(
        decode(&bytes),
        Err(Error::ElementCountMismatch { declared: 1, actual: 2, .. })
    ));
}

#[test]
fn reserved_node_id() {
    let mut bytes = with_attribute(&attribute("int", 4, 1, &[0, 0, 0, 7]));
    bytes[10] = 0;
    assert!(matches!(decode(&bytes), Err(Error::ReservedNodeId { offset: 6 })));
}

#[test]
fn decode_depth_limit() {
    let bytes = encode(&[nested(8)]).unwrap();
    let shallow = DecodeOptions { max_depth: 4 };
    assert!(matches!(decode_with(&bytes, &shallow), Err(Error::MaxDepthExceeded { limit: 4 })));
    assert_eq!(decode_with(&bytes, &DecodeOptions { max_depth: 8 }).unwrap().node_count(), 8);
}

#[test]
fn default_depth_fits_small_stack() {
    let bytes = encode(&[embedded(DEFAULT_MAX_DEPTH)]).unwrap();
    let too_deep = encode_with(
        &[embedded(DEFAULT_MAX_DEPTH + 1)],
        &EncodeOptions {
            max_depth: DEFAULT_MAX_DEPTH + 1,
            ..EncodeOptions::default()
        },
    )
    .unwrap();

    let worker = std::thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(move || {
            let document = decode(&bytes).unwrap();
            assert_eq!(document.node_count(), DEFAULT_MAX_DEPTH);
            assert!(matches!(
                decode(&too_deep),
                Err(Error::MaxDepthExceeded { limit: DEFAULT_MAX_DEPTH })
            ));
        })
        .unwrap();
    worker.join().unwrap();
}

#[test]
fn encode_depth_limit() {
    let options = EncodeOptions {
        max_depth: 3,
        ..EncodeOptions::default()
    };
    assert!(encode_with(&[nested(3)], &options).is_ok());
    assert!(matches!(
        encode_with(&[nested(4)], &options),
        Err(Error::LimitExceeded { what: "nesting depth", .. })
    ));
}

#[test]
fn name_length_limit() {
    let longest = "n".repeat(MAX_NAME_LEN);
    let bytes = encode(&[Node::new(uid(1), longest.clone())]).unwrap();
    assert_eq!(bytes[11], 0xFF);
    assert_eq!(decode(&bytes).unwrap().nodes[0].name, longest);

    let too_long = Node::new(uid(1), "n".repeat(MAX_NAME_LEN + 1));
    assert!(matches!(encode(&[too_long]), Err(Error::LimitExceeded { .. })));
}

#[test]
fn entry_count_limits() {
    let crowded = (0..256).fold(NodeBuilder::with_id(uid(1), "Crowded"), |b, i| {
        b.byte(format!("a{i}"), 0)
    });
    assert!(matches!(
        encode(&[crowded.build()]),
        Err(Error::LimitExceeded { what: "attribute count", limit: 255, actual: 256 })
    ));

    let children = (0..256).map(|i| Node::new(uid(i + 2), "Child"));
    let parent = NodeBuilder::with_id(uid(1), "Parent").children(children).build();
    assert!(matches!(
        encode(&[parent]),
        Err(Error::LimitExceeded { what: "child count", .. })
    ));
}

#[test]
fn interior_nul_is_rejected() {
    let node = NodeBuilder::with_id(uid(1), "N")
        .attr(Attribute::new("Name", "a\0b"))
        .build();
    assert!(matches!(encode(&[node]), Err(Error::InteriorNul { .. })));
    assert!(matches!(encode(&[Node::new(uid(1), "a\0")]), Err(Error::InteriorNul { .. })));
}
