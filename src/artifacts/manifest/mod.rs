//! Package manifests
//!
//! A manifest is the contents tree of one package instance: grouping nodes
//! down to file leaves carrying object hashes. The store does not interpret
//! the tree beyond enumerating the object hashes it references; everything
//! else (building trees from user files, reading the objects back out) is the
//! caller's business.
//!
//! Manifests are persisted as JSON. The identity of an instance is the
//! SHA-256 digest of its serialized form; children are kept in sorted maps so
//! serialization is deterministic and the digest is reproducible.

pub mod node;

pub use node::{Node, RootNode};

use crate::artifacts::object_id::ObjectHash;
use anyhow::Context;
use std::collections::HashSet;
use std::path::Path;

/// All object hashes transitively referenced by a contents tree.
pub fn find_object_hashes(root: &RootNode) -> HashSet<ObjectHash> {
    let mut hashes = HashSet::new();
    for node in root.children.values() {
        collect_hashes(node, &mut hashes);
    }
    hashes
}

fn collect_hashes(node: &Node, hashes: &mut HashSet<ObjectHash>) {
    match node {
        Node::File { hashes: file_hashes } => {
            hashes.extend(file_hashes.iter().cloned());
        }
        Node::Group { children } => {
            for child in children.values() {
                collect_hashes(child, hashes);
            }
        }
    }
}

/// The digest identifying a manifest snapshot.
pub fn instance_hash(root: &RootNode) -> anyhow::Result<ObjectHash> {
    let encoded = serde_json::to_vec(root).context("Unable to serialize manifest")?;

    Ok(ObjectHash::of_bytes(&encoded))
}

pub fn read_manifest(path: &Path) -> anyhow::Result<RootNode> {
    let content = std::fs::read(path)
        .with_context(|| format!("Unable to read manifest file {}", path.display()))?;

    serde_json::from_slice(&content)
        .with_context(|| format!("Unable to parse manifest file {}", path.display()))
}

pub fn write_manifest(path: &Path, root: &RootNode) -> anyhow::Result<()> {
    let encoded = serde_json::to_vec(root).context("Unable to serialize manifest")?;

    std::fs::write(path, encoded)
        .with_context(|| format!("Unable to write manifest file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn leaf(data: &[u8]) -> (ObjectHash, Node) {
        let hash = ObjectHash::of_bytes(data);
        (hash.clone(), Node::file(vec![hash]))
    }

    #[test]
    fn find_object_hashes_reaches_nested_leaves() {
        let (h1, file1) = leaf(b"one");
        let (h2, file2) = leaf(b"two");

        let mut inner = BTreeMap::new();
        inner.insert("deep".to_string(), file2);

        let mut children = BTreeMap::new();
        children.insert("top".to_string(), file1);
        children.insert("group".to_string(), Node::group(inner));

        let hashes = find_object_hashes(&RootNode::new(children));

        assert_eq!(hashes, HashSet::from([h1, h2]));
    }

    #[test]
    fn empty_manifest_references_nothing() {
        assert!(find_object_hashes(&RootNode::default()).is_empty());
    }

    #[test]
    fn instance_hash_is_deterministic() {
        let (_, file) = leaf(b"payload");
        let mut children = BTreeMap::new();
        children.insert("data".to_string(), file);
        let root = RootNode { children };

        assert_eq!(
            instance_hash(&root).unwrap(),
            instance_hash(&root.clone()).unwrap()
        );
        assert_ne!(
            instance_hash(&root).unwrap(),
            instance_hash(&RootNode::default()).unwrap()
        );
    }
}
