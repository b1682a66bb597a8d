use crate::artifacts::OBJECT_HASH_LENGTH;
use crate::artifacts::object_id::ObjectHash;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Content-addressed blob storage.
///
/// Objects are immutable whole files named by their hash, sharded into 256
/// two-hex-character subdirectories. Publication is staged: bytes land in the
/// staging directory first, then a rename moves them to their final path once
/// the hash is known, so readers never observe a partially written object.
#[derive(Debug)]
pub struct ObjectStore {
    objects_path: Box<Path>,
    staging_path: Box<Path>,
}

impl ObjectStore {
    pub fn new(objects_path: Box<Path>, staging_path: Box<Path>) -> Self {
        ObjectStore {
            objects_path,
            staging_path,
        }
    }

    pub fn objects_path(&self) -> &Path {
        &self.objects_path
    }

    /// The storage path for a hash; pure, no filesystem access.
    pub fn object_path(&self, hash: &ObjectHash) -> PathBuf {
        self.objects_path.join(hash.to_path())
    }

    /// A staging path for bytes whose final hash is not yet known.
    pub fn temporary_path(&self, name: &str) -> PathBuf {
        self.staging_path.join(name)
    }

    pub fn contains(&self, hash: &ObjectHash) -> bool {
        self.object_path(hash).exists()
    }

    /// Write bytes to a fresh staging path and return it.
    pub fn stage(&self, data: &[u8]) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.staging_path).context(format!(
            "Unable to create staging directory {}",
            self.staging_path.display()
        ))?;

        let staged_path = self.temporary_path(&Self::generate_temp_name());
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&staged_path)
            .context(format!(
                "Unable to open staged object file {}",
                staged_path.display()
            ))?;

        file.write_all(data).context(format!(
            "Unable to write staged object file {}",
            staged_path.display()
        ))?;

        Ok(staged_path)
    }

    /// Move a staged file into its content-addressed location.
    ///
    /// Renaming over an already published object of the same hash replaces it
    /// with identical bytes, so republication is idempotent.
    pub fn publish(&self, staged_path: &Path, hash: &ObjectHash) -> anyhow::Result<PathBuf> {
        let object_path = self.object_path(hash);

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory for {}",
            object_path.display()
        ))?;

        std::fs::rename(staged_path, &object_path).context(format!(
            "Unable to publish object to {}",
            object_path.display()
        ))?;

        Ok(object_path)
    }

    /// Stage and publish in one step, skipping the write if the hash is
    /// already present.
    pub fn put(&self, data: &[u8]) -> anyhow::Result<ObjectHash> {
        let hash = ObjectHash::of_bytes(data);

        if !self.contains(&hash) {
            let staged_path = self.stage(data)?;
            self.publish(&staged_path, &hash)?;
        }

        Ok(hash)
    }

    pub fn load(&self, hash: &ObjectHash) -> anyhow::Result<Bytes> {
        let object_path = self.object_path(hash);
        let content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Ok(content.into())
    }

    /// Every object hash currently on disk. Used to seed a full-store prune.
    pub fn all_hashes(&self) -> HashSet<ObjectHash> {
        WalkDir::new(&self.objects_path)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let shard = entry.path().parent()?.file_name()?.to_str()?.to_string();
                let rest = entry.file_name().to_str()?;
                if shard.len() + rest.len() == OBJECT_HASH_LENGTH {
                    ObjectHash::try_parse(format!("{shard}{rest}")).ok()
                } else {
                    None
                }
            })
            .collect()
    }

    /// Deletion is reserved for the garbage collector; objects referenced by
    /// a live instance must never be removed directly.
    pub(crate) fn remove(&self, hash: &ObjectHash) -> anyhow::Result<()> {
        let object_path = self.object_path(hash);

        if object_path.exists() {
            std::fs::remove_file(&object_path).context(format!(
                "Unable to remove object file {}",
                object_path.display()
            ))?;
        }

        Ok(())
    }

    /// Create the 256 shard subdirectories if absent.
    pub(crate) fn create_shard_dirs(&self) -> anyhow::Result<()> {
        for prefix in 0..=255u8 {
            let prefix_path = self.objects_path.join(format!("{prefix:02x}"));
            if !prefix_path.is_dir() {
                std::fs::create_dir(&prefix_path).context(format!(
                    "Unable to create shard directory {}",
                    prefix_path.display()
                ))?;
            }
        }

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
