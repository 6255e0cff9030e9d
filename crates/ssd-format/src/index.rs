//! Identifier index and cross-reference validation.

use std::hash::BuildHasherDefault;

use hashbrown::HashMap;
use rustc_hash::FxHasher;

use crate::{Document, Error, Node, Result, Uid, Value};

type FxHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Lookup from identifier to node over a whole document.
///
/// Includes nodes embedded in `SerializedClass` attributes, since those carry
/// identifiers too and may be referenced.
#[derive(Debug)]
pub struct DocumentIndex<'a> {
    nodes: FxHashMap<Uid, &'a Node>,
}

impl<'a> DocumentIndex<'a> {
    /// Index every node of a document.
    ///
    /// Fails with [`Error::DuplicateId`] on the first identifier seen twice.
    pub fn build(document: &'a Document) -> Result<Self> {
        let mut nodes = FxHashMap::default();
        let mut duplicate = None;

        document.visit(&mut |node| {
            if nodes.insert(node.id, node).is_some() && duplicate.is_none() {
                duplicate = Some(node.id);
            }
        });

        match duplicate {
            Some(id) => Err(Error::DuplicateId(id)),
            None => Ok(Self { nodes }),
        }
    }

    /// Look up a node by identifier.
    pub fn get(&self, id: Uid) -> Option<&'a Node> {
        self.nodes.get(&id).copied()
    }

    /// Resolve an optional reference.
    pub fn resolve(&self, reference: Option<Uid>) -> Option<&'a Node> {
        reference.and_then(|id| self.get(id))
    }

    /// Check if a node with this identifier exists.
    pub fn contains(&self, id: Uid) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Document {
    /// Build an identifier index over this document.
    pub fn index(&self) -> Result<DocumentIndex<'_>> {
        DocumentIndex::build(self)
    }

    /// Check that identifiers are unique and every reference resolves.
    ///
    /// References to 0 ("no node") are always valid.
    pub fn validate(&self) -> Result<()> {
        let index = self.index()?;
        let mut dangling = None;

        self.visit(&mut |node| {
            if dangling.is_some() {
                return;
            }
            for attribute in &node.attributes {
                let Value::Uid(targets) = &attribute.value else {
                    continue;
                };
                if let Some(target) = targets.iter().flatten().find(|t| !index.contains(**t)) {
                    dangling = Some(Error::DanglingReference {
                        node: node.id,
                        attribute: attribute.name.clone(),
                        target: *target,
                    });
                    return;
                }
            }
        });

        dangling.map_or(Ok(()), Err)
    }
}
