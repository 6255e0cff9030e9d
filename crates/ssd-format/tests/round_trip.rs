//! Property tests: any tree survives encode/decode unchanged.

use proptest::collection::vec;
use proptest::prelude::*;
use ssd_format::{decode, Attribute, Document, FormatVersion, Node, Uid, Value};

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_ ]{0,16}"
}

fn text() -> impl Strategy<Value = String> {
    "[^\\x00]{0,12}"
}

fn float() -> impl Strategy<Value = f32> {
    any::<f32>().prop_filter("NaN is never equal to itself", |f| !f.is_nan())
}

fn leaf_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        vec(any::<u8>(), 0..8).prop_map(Value::Byte),
        vec(any::<u32>(), 0..8).prop_map(Value::UInt),
        vec(any::<i32>(), 0..8).prop_map(Value::Int),
        vec(any::<i16>(), 0..8).prop_map(Value::Int16),
        vec(any::<u16>(), 0..8).prop_map(Value::UInt16),
        vec(float(), 0..8).prop_map(Value::Float),
        vec(any::<u32>().prop_map(Uid::new), 0..8).prop_map(Value::Uid),
        vec(text(), 0..4).prop_map(Value::Char),
    ]
}

fn assemble(name: String, attributes: Vec<(String, Value)>, children: Vec<Node>) -> Node {
    let mut node = Node::new(Uid::new(1).unwrap(), name);
    node.attributes = attributes
        .into_iter()
        .map(|(name, value)| Attribute::new(name, value))
        .collect();
    node.children = children;
    node
}

fn tree() -> impl Strategy<Value = Node> {
    let leaf = (name(), vec((name(), leaf_value()), 0..4))
        .prop_map(|(name, attributes)| assemble(name, attributes, Vec::new()));

    leaf.prop_recursive(4, 48, 4, |inner| {
        let value = prop_oneof![
            3 => leaf_value(),
            1 => vec(inner.clone(), 0..3).prop_map(Value::SerializedClass),
        ];
        (name(), vec((name(), value), 0..4), vec(inner, 0..4))
            .prop_map(|(name, attributes, children)| assemble(name, attributes, children))
    })
}

/// Give every node, embedded ones included, a distinct identifier.
fn renumber(nodes: &mut [Node], next: &mut u32) {
    for node in nodes {
        node.id = Uid::new(*next).unwrap();
        *next += 1;
        for attribute in &mut node.attributes {
            if let Value::SerializedClass(embedded) = &mut attribute.value {
                renumber(embedded, next);
            }
        }
        renumber(&mut node.children, next);
    }
}

fn document() -> impl Strategy<Value = Document> {
    let version = prop_oneof![Just(FormatVersion::V1), Just(FormatVersion::V2)];
    (vec(tree(), 0..4), version).prop_map(|(mut nodes, version)| {
        renumber(&mut nodes, &mut 50);
        Document::new(nodes).with_version(version)
    })
}

proptest! {
    #[test]
    fn decode_inverts_encode(document in document()) {
        let bytes = document.to_bytes().unwrap();
        let decoded = decode(&bytes).unwrap();
        prop_assert_eq!(&decoded, &document);
        prop_assert_eq!(decoded.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn decoded_tree_keeps_identifiers_unique(document in document()) {
        let decoded = decode(&document.to_bytes().unwrap()).unwrap();
        let index = decoded.index().unwrap();
        prop_assert_eq!(index.len(), document.node_count());
    }

    #[test]
    fn strict_prefixes_fail(document in document(), cut in any::<prop::sample::Index>()) {
        let bytes = document.to_bytes().unwrap();
        let cut = cut.index(bytes.len());
        prop_assert!(decode(&bytes[..cut]).is_err());
    }

    #[test]
    fn arbitrary_bytes_never_panic(tail in vec(any::<u8>(), 0..256), version in 1u8..=2) {
        let mut bytes = vec![b'S', b'S', b'D', version];
        bytes.extend_from_slice(&tail);
        let _ = decode(&bytes);
    }

    #[cfg(feature = "xml")]
    #[test]
    fn xml_preserves_documents(document in document()) {
        let xml = document.to_xml_string().unwrap();
        prop_assert_eq!(Document::from_xml(&xml).unwrap(), document);
    }
}
