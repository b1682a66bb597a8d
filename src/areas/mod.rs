//! Core store components
//!
//! This module contains the components that own parts of a store's directory
//! tree:
//!
//! - `migrator`: on-disk format upgrades, run once at open time
//! - `objects`: content-addressed blob storage with staged publication
//! - `prune`: mark-and-sweep reclamation of unreferenced objects
//! - `registry`: package enumeration, installation and removal
//! - `store`: the store root, path layout and directory bootstrap
//! - `tags`: mutable tag pointer files

pub mod migrator;
pub mod objects;
pub mod prune;
pub mod registry;
pub mod store;
pub mod tags;
