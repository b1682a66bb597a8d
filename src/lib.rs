//! depot: a local, on-disk content-addressable store for versioned data packages.
//!
//! Packages are named `team/user/package` trees of content-addressed objects.
//! Immutable manifest snapshots (instances) are identified by hash; mutable
//! tags point at instances. The store owns the directory layout, migrates it
//! across format versions, and reclaims unreferenced objects via mark-and-sweep
//! pruning.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;
