//! Store domain types and algorithms
//!
//! This module contains the types the filesystem areas operate on:
//!
//! - `format`: on-disk format versions
//! - `manifest`: package contents trees and object-hash enumeration
//! - `name`: identifier validation for teams, users, packages and tags
//! - `object_id`: content hashes and their sharded storage paths
//! - `package`: handle to one package instance inside a store

pub mod format;
pub mod manifest;
pub mod name;
pub mod object_id;
pub mod package;

/// Length of a SHA-256 content hash in hexadecimal format
pub const OBJECT_HASH_LENGTH: usize = 64;

pub const NODE_NAME_REGEX: &str = r"^[a-zA-Z][a-zA-Z0-9_]*$";
