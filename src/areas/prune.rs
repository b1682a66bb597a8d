//! Garbage collection
//!
//! Objects are deleted exclusively here, never by direct request. The sweep
//! is bounded by the caller-supplied candidate set, so a full-store pass must
//! seed with every on-disk hash (see [`crate::areas::objects::ObjectStore::all_hashes`])
//! to reclaim orphans left by interrupted installs.

use crate::areas::store::Store;
use crate::artifacts::object_id::ObjectHash;
use std::collections::HashSet;
use tracing::debug;

impl Store {
    /// Remove candidate objects not referenced by any live package instance.
    ///
    /// Mark-and-sweep: every instance reachable through
    /// [`Store::iter_packages`] subtracts its transitively referenced hashes
    /// from the candidate set; whatever remains is deleted from disk and
    /// returned. A hash referenced by at least one live instance is never
    /// deleted, regardless of the seed.
    pub fn prune(&self, candidates: HashSet<ObjectHash>) -> anyhow::Result<HashSet<ObjectHash>> {
        let mut remove = candidates;

        for package in self.iter_packages() {
            let package = package?;
            for hash in package.object_hashes() {
                remove.remove(&hash);
            }
        }

        for hash in &remove {
            self.objects().remove(hash)?;
        }

        debug!(removed = remove.len(), "pruned unreferenced objects");

        Ok(remove)
    }
}
