//! On-disk format migrations
//!
//! A store records its format version in the `.format` file. Opening a store
//! drives an explicit state machine, one transition per legacy version, until
//! the layout is current or the version is unrecognized. Each transition only
//! moves or renames entries and persists the new version before the next step
//! runs, so an interrupted migration resumes where it left off.
//!
//! Migrations are not safe against two processes opening the same legacy
//! store concurrently; the store assumes a single writer.

use crate::areas::store::{DEFAULT_TEAM, OBJ_DIR, PKG_DIR, VERSION_FILE};
use crate::artifacts::OBJECT_HASH_LENGTH;
use crate::artifacts::format::FormatVersion;
use crate::errors::StoreError;
use anyhow::Context;
use derive_new::new;
use std::path::Path;
use tracing::info;

pub(crate) fn read_format_version(root: &Path) -> anyhow::Result<Option<String>> {
    let version_path = root.join(VERSION_FILE);

    if !version_path.exists() {
        return Ok(None);
    }

    let version = std::fs::read_to_string(&version_path)
        .with_context(|| format!("failed to read version file at {:?}", version_path))?;

    Ok(Some(version))
}

pub(crate) fn write_format_version(root: &Path, version: &FormatVersion) -> anyhow::Result<()> {
    let raw = version
        .as_str()
        .context("refusing to persist an unversioned format")?;

    std::fs::write(root.join(VERSION_FILE), raw)
        .with_context(|| format!("failed to write version file under {:?}", root))
}

#[derive(Debug, new)]
pub struct Migrator<'a> {
    root: &'a Path,
}

impl Migrator<'_> {
    /// Drive the version state machine until the store is current.
    ///
    /// Unversioned stores (fresh, or predating the version file) are
    /// compatible as-is; unrecognized versions fail with
    /// [`StoreError::IncompatibleFormat`] and leave the store untouched.
    pub fn run(&self) -> anyhow::Result<FormatVersion> {
        let raw = read_format_version(self.root)?;
        let mut state = FormatVersion::parse(raw.as_deref());

        loop {
            state = match state {
                FormatVersion::V1_2 => self.introduce_team_layer()?,
                FormatVersion::V1_3 => self.introduce_object_shards()?,
                FormatVersion::Unversioned | FormatVersion::V1_4 => return Ok(state),
                FormatVersion::Unknown(version) => {
                    return Err(StoreError::IncompatibleFormat {
                        path: self.root.to_path_buf(),
                        version,
                    }
                    .into());
                }
            };
        }
    }

    /// 1.2 -> 1.3: move every top-level owner directory under the default team.
    fn introduce_team_layer(&self) -> anyhow::Result<FormatVersion> {
        info!(root = %self.root.display(), "migrating package tree to the team layout");

        let pkg_dir = self.root.join(PKG_DIR);
        if pkg_dir.is_dir() {
            let owners = std::fs::read_dir(&pkg_dir)
                .with_context(|| format!("failed to list package directory at {:?}", pkg_dir))?
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_dir())
                .map(|entry| entry.file_name())
                .collect::<Vec<_>>();

            let team_dir = pkg_dir.join(DEFAULT_TEAM);
            std::fs::create_dir(&team_dir)
                .with_context(|| format!("failed to create team directory at {:?}", team_dir))?;

            for owner in owners {
                std::fs::rename(pkg_dir.join(&owner), team_dir.join(&owner))
                    .with_context(|| format!("failed to move owner directory {:?}", owner))?;
            }
        }

        let state = FormatVersion::V1_3;
        write_format_version(self.root, &state)?;

        Ok(state)
    }

    /// 1.3 -> 1.4: shard the flat object directory by hash prefix.
    fn introduce_object_shards(&self) -> anyhow::Result<FormatVersion> {
        info!(root = %self.root.display(), "migrating objects to the sharded layout");

        let object_dir = self.root.join(OBJ_DIR);
        if object_dir.is_dir() {
            for prefix in 0..=255u8 {
                let prefix_path = object_dir.join(format!("{prefix:02x}"));
                if !prefix_path.is_dir() {
                    std::fs::create_dir(&prefix_path).with_context(|| {
                        format!("failed to create shard directory at {:?}", prefix_path)
                    })?;
                }
            }

            for entry in std::fs::read_dir(&object_dir)
                .with_context(|| format!("failed to list object directory at {:?}", object_dir))?
                .filter_map(|entry| entry.ok())
            {
                let name = match entry.file_name().into_string() {
                    Ok(name) => name,
                    Err(_) => continue,
                };

                if name.len() == OBJECT_HASH_LENGTH && entry.path().is_file() {
                    let (shard, rest) = name.split_at(2);
                    std::fs::rename(entry.path(), object_dir.join(shard).join(rest))
                        .with_context(|| format!("failed to shard object {:?}", name))?;
                }
            }
        }

        let state = FormatVersion::V1_4;
        write_format_version(self.root, &state)?;

        Ok(state)
    }
}
