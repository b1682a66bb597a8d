//! Store location configuration.
//!
//! The store itself never reads the environment; the binary resolves these
//! values once at startup and passes an explicit [`StoreConfig`] down.

use crate::areas::store::PACKAGE_DIR_NAME;
use std::path::{Path, PathBuf};

/// Overrides the primary store location.
pub const PRIMARY_STORE_DIR_ENV: &str = "DEPOT_PRIMARY_STORE_DIR";

/// Colon-separated list of additional store roots, consulted in order.
pub const STORE_DIRS_ENV: &str = "DEPOT_STORE_DIRS";

#[derive(Debug, Clone)]
pub struct StoreConfig {
    primary: PathBuf,
    extra_roots: Vec<PathBuf>,
}

impl StoreConfig {
    pub fn new(primary: PathBuf, extra_roots: Vec<PathBuf>) -> Self {
        StoreConfig {
            primary,
            extra_roots,
        }
    }

    /// Resolve the configuration from the process environment.
    ///
    /// Intended to be called exactly once, by the binary at startup.
    pub fn from_env() -> Self {
        let primary = std::env::var_os(PRIMARY_STORE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_store_location);

        let extra_roots = std::env::var(STORE_DIRS_ENV)
            .map(|dirs| {
                dirs.split(':')
                    .filter(|dir| !dir.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();

        StoreConfig {
            primary,
            extra_roots,
        }
    }

    pub fn primary(&self) -> &Path {
        &self.primary
    }

    /// All store roots, primary first.
    pub fn store_dirs(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.primary.as_path()).chain(self.extra_roots.iter().map(PathBuf::as_path))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new(default_store_location(), Vec::new())
    }
}

/// The default store root: `<user data dir>/depot`.
pub fn default_store_location() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PACKAGE_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_dirs_lists_primary_first() {
        let config = StoreConfig::new(
            PathBuf::from("/stores/a/depot"),
            vec![PathBuf::from("/stores/b/depot"), PathBuf::from("/stores/c/depot")],
        );

        let dirs = config.store_dirs().collect::<Vec<_>>();

        assert_eq!(
            dirs,
            vec![
                Path::new("/stores/a/depot"),
                Path::new("/stores/b/depot"),
                Path::new("/stores/c/depot"),
            ]
        );
    }

    #[test]
    fn default_location_ends_with_package_dir_name() {
        assert_eq!(
            default_store_location().file_name().unwrap(),
            PACKAGE_DIR_NAME
        );
    }
}
