use crate::artifacts::object_id::ObjectHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of a package contents tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootNode {
    #[serde(default)]
    pub children: BTreeMap<String, Node>,
}

impl RootNode {
    pub fn new(children: BTreeMap<String, Node>) -> Self {
        RootNode { children }
    }
}

/// Interior and leaf nodes of a contents tree.
///
/// File leaves carry the object hashes of their stored fragments; group nodes
/// only structure the namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Group {
        #[serde(default)]
        children: BTreeMap<String, Node>,
    },
    File {
        hashes: Vec<ObjectHash>,
    },
}

impl Node {
    pub fn file(hashes: Vec<ObjectHash>) -> Self {
        Node::File { hashes }
    }

    pub fn group(children: BTreeMap<String, Node>) -> Self {
        Node::Group { children }
    }
}
