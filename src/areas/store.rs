use crate::areas::migrator::{self, Migrator};
use crate::areas::objects::ObjectStore;
use crate::artifacts::format::FormatVersion;
use crate::artifacts::name::check_names;
use crate::artifacts::object_id::ObjectHash;
use crate::config::StoreConfig;
use crate::errors::StoreError;
use anyhow::Context;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Reserved basename of every store root directory.
pub const PACKAGE_DIR_NAME: &str = "depot";

/// Team used when a package coordinate carries no explicit team.
pub const DEFAULT_TEAM: &str = "base";

pub(crate) const OBJ_DIR: &str = "objs";
pub(crate) const TMP_OBJ_DIR: &str = "tmp";
pub(crate) const PKG_DIR: &str = "pkgs";
pub(crate) const CACHE_DIR: &str = "cache";
pub(crate) const VERSION_FILE: &str = ".format";

/// A package store rooted at one directory.
///
/// Opening a store runs any pending format migrations; the directory
/// structure itself is created lazily by [`Store::create_dirs`] on first
/// write, and is never torn down by the store.
#[derive(Debug)]
pub struct Store {
    path: Box<Path>,
    version: FormatVersion,
    objects: ObjectStore,
}

impl Store {
    pub fn open(location: &Path) -> anyhow::Result<Self> {
        if location.file_name() != Some(OsStr::new(PACKAGE_DIR_NAME)) {
            return Err(StoreError::UnexpectedRoot {
                path: location.to_path_buf(),
            }
            .into());
        }

        let version = Migrator::new(location).run()?;
        tracing::debug!(store = %location.display(), %version, "opened package store");

        Ok(Store {
            path: location.to_path_buf().into_boxed_path(),
            version,
            objects: ObjectStore::new(
                location.join(OBJ_DIR).into_boxed_path(),
                location.join(TMP_OBJ_DIR).into_boxed_path(),
            ),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The store's format version as observed at open time.
    pub fn version(&self) -> &FormatVersion {
        &self.version
    }

    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    /// Find the first configured store root containing the given package.
    ///
    /// Roots are consulted in configuration order, primary first. Returns the
    /// opened store, or None if no root contains the package.
    pub fn locate_package(
        config: &StoreConfig,
        team: Option<&str>,
        user: &str,
        package: &str,
    ) -> anyhow::Result<Option<Store>> {
        check_names(team, user, package)?;

        for store_dir in config.store_dirs() {
            let store = Store::open(store_dir)?;
            if store.get_package(team, user, package)?.is_some() {
                return Ok(Some(store));
            }
        }

        Ok(None)
    }

    // Path layout: deterministic and side-effect-free; directory existence is
    // create_dirs' concern.

    pub fn pkg_dir(&self) -> PathBuf {
        self.path.join(PKG_DIR)
    }

    pub fn team_path(&self, team: Option<&str>) -> PathBuf {
        self.pkg_dir().join(team.unwrap_or(DEFAULT_TEAM))
    }

    pub fn user_path(&self, team: Option<&str>, user: &str) -> PathBuf {
        self.team_path(team).join(user)
    }

    pub fn package_path(&self, team: Option<&str>, user: &str, package: &str) -> PathBuf {
        self.user_path(team, user).join(package)
    }

    pub fn object_dir(&self) -> &Path {
        self.objects.objects_path()
    }

    pub fn object_path(&self, hash: &ObjectHash) -> PathBuf {
        self.objects.object_path(hash)
    }

    pub fn temporary_object_path(&self, name: &str) -> PathBuf {
        self.objects.temporary_path(name)
    }

    pub fn cache_path(&self, name: &str) -> PathBuf {
        self.path.join(CACHE_DIR).join(name)
    }

    /// Create the store directory and its subdirectories, idempotently.
    ///
    /// Also writes the current format version if the store has none yet.
    pub fn create_dirs(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.path).context(format!(
            "Unable to create store directory {}",
            self.path.display()
        ))?;

        for dir_name in [OBJ_DIR, TMP_OBJ_DIR, PKG_DIR, CACHE_DIR] {
            let dir_path = self.path.join(dir_name);
            if !dir_path.is_dir() {
                std::fs::create_dir(&dir_path).context(format!(
                    "Unable to create store subdirectory {}",
                    dir_path.display()
                ))?;
            }
        }

        self.objects.create_shard_dirs()?;

        if !self.path.join(VERSION_FILE).exists() {
            migrator::write_format_version(&self.path, &FormatVersion::CURRENT)?;
        }

        Ok(())
    }
}
