//! Content hashes (SHA-256)
//!
//! Every object in the store is identified by the 64-character hexadecimal
//! SHA-256 digest of its bytes. Manifest instances reuse the same digest
//! format for their own identity.
//!
//! ## Storage
//!
//! Objects are stored in `objs/<first-2-chars>/<remaining-62-chars>` so no
//! single directory accumulates an unbounded number of files.

use crate::artifacts::OBJECT_HASH_LENGTH;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// A 64-character lowercase hexadecimal SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectHash(String);

impl ObjectHash {
    /// Parse and validate a digest from a string.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_HASH_LENGTH {
            return Err(anyhow::anyhow!("Invalid object hash length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object hash characters: {}", id));
        }
        Ok(Self(id.to_lowercase()))
    }

    /// Digest a byte slice.
    pub fn of_bytes(data: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(data)))
    }

    /// Convert to the sharded path fragment for object storage.
    ///
    /// Splits the hash as `XX/YYYY...` where XX is the first 2 characters.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

}

impl TryFrom<String> for ObjectHash {
    type Error = anyhow::Error;

    fn try_from(value: String) -> anyhow::Result<Self> {
        Self::try_parse(value)
    }
}

impl From<ObjectHash> for String {
    fn from(hash: ObjectHash) -> String {
        hash.0
    }
}

impl AsRef<str> for ObjectHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
