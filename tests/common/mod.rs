#![allow(dead_code)]

use assert_fs::TempDir;
use depot::areas::store::{PACKAGE_DIR_NAME, Store};
use depot::artifacts::manifest::{Node, RootNode};
use depot::artifacts::object_id::ObjectHash;
use rstest::fixture;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[fixture]
pub fn store_root() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Path of the store inside a temp dir, with the reserved basename.
pub fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join(PACKAGE_DIR_NAME)
}

pub fn open_store(dir: &TempDir) -> Store {
    Store::open(&store_path(dir)).expect("Failed to open store")
}

/// Publish each payload as an object and return the hashes, in order.
pub fn put_objects(store: &Store, payloads: &[&[u8]]) -> Vec<ObjectHash> {
    payloads
        .iter()
        .map(|data| {
            store
                .objects()
                .put(data)
                .expect("Failed to publish object")
        })
        .collect()
}

/// A one-level contents tree with one file leaf per (name, hash) pair.
pub fn contents_of(files: &[(&str, &ObjectHash)]) -> RootNode {
    let children = files
        .iter()
        .map(|(name, hash)| (name.to_string(), Node::file(vec![(*hash).clone()])))
        .collect::<BTreeMap<_, _>>();

    RootNode::new(children)
}

pub fn generated_payload() -> Vec<u8> {
    use fake::{Fake, faker::lorem::en::Words};

    Words(5..10).fake::<Vec<String>>().join(" ").into_bytes()
}
