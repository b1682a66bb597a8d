//! Package registry operations
//!
//! Enumeration, installation and removal of packages under the
//! `pkgs/<team>/<user>/<package>` hierarchy. Every mutating operation
//! validates all identity components before touching the filesystem.

use crate::areas::store::{DEFAULT_TEAM, Store};
use crate::areas::tags::Tags;
use crate::artifacts::manifest::RootNode;
use crate::artifacts::name::check_names;
use crate::artifacts::object_id::ObjectHash;
use crate::artifacts::package::{CONTENTS_DIR, Package, TAGS_DIR};
use anyhow::Context;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Outcome of a package lookup.
///
/// A package that exists on disk but cannot be loaded is distinguished from
/// one that is absent, so callers can choose how strict to be.
#[derive(Debug)]
pub enum PackageLookup<'a> {
    Found(Package<'a>),
    Missing,
    Malformed(anyhow::Error),
}

impl Store {
    /// Look up a package in this store.
    ///
    /// Only name validation fails the lookup itself; the package being absent
    /// or unloadable is reported through [`PackageLookup`].
    pub fn lookup_package(
        &self,
        team: Option<&str>,
        user: &str,
        package: &str,
    ) -> anyhow::Result<PackageLookup<'_>> {
        check_names(team, user, package)?;

        if !self.package_path(team, user, package).is_dir() {
            return Ok(PackageLookup::Missing);
        }

        match Package::load(self, team, user, package) {
            Ok(package) => Ok(PackageLookup::Found(package)),
            Err(error) => Ok(PackageLookup::Malformed(error)),
        }
    }

    /// Get a package from this store.
    ///
    /// The lenient form of [`Store::lookup_package`]: returns `None` when the
    /// package directory is absent or its manifest cannot be loaded; absence
    /// is not an error.
    pub fn get_package(
        &self,
        team: Option<&str>,
        user: &str,
        package: &str,
    ) -> anyhow::Result<Option<Package<'_>>> {
        match self.lookup_package(team, user, package)? {
            PackageLookup::Found(package) => Ok(Some(package)),
            PackageLookup::Missing => Ok(None),
            PackageLookup::Malformed(error) => {
                debug!(user, package, %error, "treating unloadable package as absent");
                Ok(None)
            }
        }
    }

    /// Create a package rooted at `contents`, allocating the store layout and
    /// the per-user directory if needed.
    pub fn install_package(
        &self,
        team: Option<&str>,
        user: &str,
        package: &str,
        contents: RootNode,
    ) -> anyhow::Result<Package<'_>> {
        check_names(team, user, package)?;

        self.create_dirs()?;

        // Clear any stale file artifact occupying the package path.
        let path = self.package_path(team, user, package);
        if let Err(error) = std::fs::remove_file(&path) {
            if error.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %path.display(), %error, "leaving package path artifact in place");
            }
        }

        Package::install(self, team, user, package, contents)
    }

    /// Create a package with empty contents. See [`Store::install_package`].
    ///
    /// The dry-run variant builds an in-memory package without touching the
    /// filesystem.
    pub fn create_package(
        &self,
        team: Option<&str>,
        user: &str,
        package: &str,
        dry_run: bool,
    ) -> anyhow::Result<Package<'_>> {
        if dry_run {
            check_names(team, user, package)?;
            return Package::dry_run(self, team, user, package);
        }

        self.install_package(team, user, package, RootNode::default())
    }

    /// Remove a package (all instances) from this store, then prune the
    /// objects it referenced. Returns the hashes actually removed from disk.
    ///
    /// Unlike lookup, removal treats an unparseable instance as a hard error:
    /// deleting a package whose references cannot be enumerated would leak
    /// its objects forever.
    pub fn remove_package(
        &self,
        team: Option<&str>,
        user: &str,
        package: &str,
    ) -> anyhow::Result<HashSet<ObjectHash>> {
        check_names(team, user, package)?;

        let path = self.package_path(team, user, package);
        let mut candidates = HashSet::new();

        if path.is_dir() {
            for instance in sub_files(&path.join(CONTENTS_DIR)) {
                let instance = ObjectHash::try_parse(instance)?;
                let loaded = Package::load_instance(self, team, user, package, &instance)?;
                candidates.extend(loaded.object_hashes());
            }

            std::fs::remove_dir_all(&path).context(format!(
                "Unable to remove package directory {}",
                path.display()
            ))?;
        }

        self.prune(candidates)
    }

    /// Iterate over every package instance in the store.
    ///
    /// The sequence is lazy, finite and restartable: directories are listed
    /// as the iteration reaches them, and each call returns a fresh iterator.
    /// Unreadable directories are skipped; an instance whose manifest fails
    /// to parse yields an error item.
    pub fn iter_packages(&self) -> PackageIter<'_> {
        let mut teams = sub_dirs(&self.pkg_dir());
        teams.reverse();

        PackageIter {
            store: self,
            teams,
            users: Vec::new(),
            packages: Vec::new(),
            instances: Vec::new(),
        }
    }

    /// List packages in this store as `(name, tag, instance hash)` rows.
    ///
    /// Every tag contributes one row; instances without tags get a single row
    /// with an empty tag, so each instance appears at least once. The default
    /// team is suppressed from the displayed name, any other team is prefixed
    /// as `team:`.
    pub fn list_packages(&self) -> anyhow::Result<Vec<(String, String, String)>> {
        let mut rows = Vec::new();

        for team in sub_dirs(&self.pkg_dir()) {
            for user in sub_dirs(&self.team_path(Some(&team))) {
                for package in sub_dirs(&self.user_path(Some(&team), &user)) {
                    let package_path = self.package_path(Some(&team), &user, &package);

                    let mut instance_tags: BTreeMap<String, Vec<String>> =
                        sub_files(&package_path.join(CONTENTS_DIR))
                            .into_iter()
                            .map(|instance| (instance, Vec::new()))
                            .collect();

                    let tags = Tags::new(package_path.join(TAGS_DIR).into_boxed_path());
                    for (tag, instance) in tags.list_tags()? {
                        instance_tags.entry(instance.to_string()).or_default().push(tag);
                    }

                    let team_token = if team == DEFAULT_TEAM {
                        String::new()
                    } else {
                        format!("{team}:")
                    };
                    let full_name = format!("{team_token}{user}/{package}");

                    for (instance, tags) in instance_tags {
                        let display_tags = if tags.is_empty() {
                            vec![String::new()]
                        } else {
                            tags
                        };
                        for tag in display_tags {
                            rows.push((full_name.clone(), tag, instance.clone()));
                        }
                    }
                }
            }
        }

        Ok(rows)
    }
}

/// Iterator over every (package, instance) pair in a store.
pub struct PackageIter<'a> {
    store: &'a Store,
    teams: Vec<String>,
    users: Vec<(String, String)>,
    packages: Vec<(String, String, String)>,
    instances: Vec<(String, String, String, String)>,
}

impl<'a> Iterator for PackageIter<'a> {
    type Item = anyhow::Result<Package<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((team, user, package, instance)) = self.instances.pop() {
                let loaded = ObjectHash::try_parse(instance).and_then(|instance| {
                    Package::load_instance(self.store, Some(&team), &user, &package, &instance)
                });
                return Some(loaded);
            }

            if let Some((team, user, package)) = self.packages.pop() {
                let contents_dir = self
                    .store
                    .package_path(Some(&team), &user, &package)
                    .join(CONTENTS_DIR);
                let mut instances = sub_files(&contents_dir)
                    .into_iter()
                    .map(|instance| (team.clone(), user.clone(), package.clone(), instance))
                    .collect::<Vec<_>>();
                instances.reverse();
                self.instances = instances;
                continue;
            }

            if let Some((team, user)) = self.users.pop() {
                let mut packages = sub_dirs(&self.store.user_path(Some(&team), &user))
                    .into_iter()
                    .map(|package| (team.clone(), user.clone(), package))
                    .collect::<Vec<_>>();
                packages.reverse();
                self.packages = packages;
                continue;
            }

            if let Some(team) = self.teams.pop() {
                let mut users = sub_dirs(&self.store.team_path(Some(&team)))
                    .into_iter()
                    .map(|user| (team.clone(), user))
                    .collect::<Vec<_>>();
                users.reverse();
                self.users = users;
                continue;
            }

            return None;
        }
    }
}

/// Names of the subdirectories of `path`, sorted; empty if unreadable.
pub(crate) fn sub_dirs(path: &Path) -> Vec<String> {
    list_entries(path, |entry| entry.is_dir())
}

/// Names of the plain files under `path`, sorted; empty if unreadable.
pub(crate) fn sub_files(path: &Path) -> Vec<String> {
    list_entries(path, |entry| entry.is_file())
}

fn list_entries(path: &Path, keep: impl Fn(&Path) -> bool) -> Vec<String> {
    let mut names = std::fs::read_dir(path)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| keep(&entry.path()))
                .filter_map(|entry| entry.file_name().into_string().ok())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    names.sort();

    names
}
