//! Package tags
//!
//! Tags are human-readable names pointing at package instances. Each tag is a
//! file under the package's `tags/` directory whose content is the 64-character
//! instance hash it points at.
//!
//! Tags are the only mutable files in a store: instances and objects are
//! immutable once written, while a tag may be repointed at any time. Multiple
//! tags may name the same instance, and an instance may have no tag at all.
//!
//! The store does not check that a tag's recorded hash names an existing
//! instance; `list_packages` surfaces whatever the tag records.

use crate::artifacts::name::NodeName;
use crate::artifacts::object_id::ObjectHash;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;

/// Tag manager for one package's `tags/` directory.
///
/// Writes take an exclusive advisory lock on the tag file, so a reader in the
/// same usage model never observes a torn pointer.
#[derive(Debug, new)]
pub struct Tags {
    path: Box<Path>,
}

impl Tags {
    /// Read the instance hash a tag points at.
    ///
    /// # Returns
    ///
    /// Some(hash) if the tag exists and is non-empty, None otherwise
    pub fn read_tag(&self, tag: &str) -> anyhow::Result<Option<ObjectHash>> {
        let tag_path = self.path.join(tag);

        if !tag_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&tag_path)
            .with_context(|| format!("failed to read tag file at {:?}", tag_path))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectHash::try_parse(content.to_string())?))
    }

    /// Point a tag at an instance, creating or repointing it.
    ///
    /// # Locking
    ///
    /// Acquires an exclusive lock on the tag file during the write.
    pub fn write_tag(&self, tag: &str, instance: &ObjectHash) -> anyhow::Result<()> {
        NodeName::try_parse(tag)?;

        std::fs::create_dir_all(&self.path)
            .with_context(|| format!("failed to create tags directory at {:?}", self.path))?;

        let tag_path = self.path.join(tag);
        let mut tag_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tag_path)
            .with_context(|| format!("failed to open tag file at {:?}", tag_path))?;
        let mut lock = file_guard::lock(&mut tag_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(instance.as_ref().as_bytes())?;

        Ok(())
    }

    /// All tags of the package with the instance hash each points at,
    /// sorted by tag name.
    pub fn list_tags(&self) -> anyhow::Result<Vec<(String, ObjectHash)>> {
        if !self.path.is_dir() {
            return Ok(Vec::new());
        }

        let mut tags = Vec::new();
        for entry in std::fs::read_dir(&self.path)
            .with_context(|| format!("failed to list tags directory at {:?}", self.path))?
            .filter_map(|entry| entry.ok())
        {
            if !entry.path().is_file() {
                continue;
            }
            let Ok(tag) = entry.file_name().into_string() else {
                continue;
            };

            let instance = self
                .read_tag(&tag)?
                .with_context(|| format!("tag {:?} is empty", tag))?;
            tags.push((tag, instance));
        }
        tags.sort();

        Ok(tags)
    }
}
