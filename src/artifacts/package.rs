use crate::areas::store::{DEFAULT_TEAM, Store};
use crate::areas::tags::Tags;
use crate::artifacts::manifest::{self, RootNode};
use crate::artifacts::object_id::ObjectHash;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Subdirectory holding a package's instance manifest files.
pub const CONTENTS_DIR: &str = "contents";

/// Subdirectory holding a package's tag pointer files.
pub const TAGS_DIR: &str = "tags";

/// Tag written on every install, pointing at the newest instance.
pub const LATEST_TAG: &str = "latest";

/// A handle to one package instance.
///
/// The handle borrows its [`Store`] for path resolution; it owns nothing on
/// disk. Loading resolves an instance (by tag or by hash) and parses its
/// manifest; installing persists a manifest and points the `latest` tag at it.
#[derive(Debug)]
pub struct Package<'a> {
    store: &'a Store,
    team: String,
    user: String,
    name: String,
    path: Box<Path>,
    instance: ObjectHash,
    contents: RootNode,
}

impl<'a> Package<'a> {
    /// Load the instance the `latest` tag points at.
    pub fn load(
        store: &'a Store,
        team: Option<&str>,
        user: &str,
        name: &str,
    ) -> anyhow::Result<Self> {
        let path = store.package_path(team, user, name);
        let tags = Tags::new(path.join(TAGS_DIR).into_boxed_path());
        let instance = tags
            .read_tag(LATEST_TAG)?
            .ok_or_else(|| anyhow::anyhow!("package {}/{} has no {} tag", user, name, LATEST_TAG))?;

        Self::load_instance(store, team, user, name, &instance)
    }

    /// Load one specific instance by hash.
    pub fn load_instance(
        store: &'a Store,
        team: Option<&str>,
        user: &str,
        name: &str,
        instance: &ObjectHash,
    ) -> anyhow::Result<Self> {
        let path = store.package_path(team, user, name);
        let contents = manifest::read_manifest(&path.join(CONTENTS_DIR).join(instance.as_ref()))?;

        Ok(Self::from_parts(
            store,
            team,
            user,
            name,
            path.into_boxed_path(),
            instance.clone(),
            contents,
        ))
    }

    /// Persist `contents` as a new instance of the package and point the
    /// `latest` tag at it.
    pub fn install(
        store: &'a Store,
        team: Option<&str>,
        user: &str,
        name: &str,
        contents: RootNode,
    ) -> anyhow::Result<Self> {
        let path = store.package_path(team, user, name);
        let instance = manifest::instance_hash(&contents)?;

        let contents_dir = path.join(CONTENTS_DIR);
        std::fs::create_dir_all(&contents_dir)?;
        manifest::write_manifest(&contents_dir.join(instance.as_ref()), &contents)?;

        let tags = Tags::new(path.join(TAGS_DIR).into_boxed_path());
        tags.write_tag(LATEST_TAG, &instance)?;

        Ok(Self::from_parts(
            store,
            team,
            user,
            name,
            path.into_boxed_path(),
            instance,
            contents,
        ))
    }

    /// An in-memory package that never touches the filesystem; used for
    /// staging before a real install.
    pub fn dry_run(
        store: &'a Store,
        team: Option<&str>,
        user: &str,
        name: &str,
    ) -> anyhow::Result<Self> {
        let contents = RootNode::default();
        let instance = manifest::instance_hash(&contents)?;

        Ok(Self::from_parts(
            store,
            team,
            user,
            name,
            PathBuf::from(".").into_boxed_path(),
            instance,
            contents,
        ))
    }

    fn from_parts(
        store: &'a Store,
        team: Option<&str>,
        user: &str,
        name: &str,
        path: Box<Path>,
        instance: ObjectHash,
        contents: RootNode,
    ) -> Self {
        Package {
            store,
            team: team.unwrap_or(DEFAULT_TEAM).to_string(),
            user: user.to_string(),
            name: name.to_string(),
            path,
            instance,
            contents,
        }
    }

    pub fn store(&self) -> &Store {
        self.store
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn instance_hash(&self) -> &ObjectHash {
        &self.instance
    }

    pub fn contents(&self) -> &RootNode {
        &self.contents
    }

    /// All object hashes transitively referenced by this instance.
    pub fn object_hashes(&self) -> HashSet<ObjectHash> {
        manifest::find_object_hashes(&self.contents)
    }

    pub fn tags(&self) -> Tags {
        Tags::new(self.path.join(TAGS_DIR).into_boxed_path())
    }
}
