//! File Listing Set - relative paths of everything in a tree

use super::walker::{walk_sorted, ScannedEntry};
use crate::types::SyncError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// List every entry below `root` as a set of relative paths
///
/// The set holds each directory below the root, each file, symlink and
/// special entry, and therefore every empty directory too: files alone
/// cannot represent an empty directory, so directories are first-class
/// members. The root is traversed but never listed.
///
/// The set is ordered, so iterating it yields a parent before anything
/// nested inside it.
pub fn list_tree(root: &Path) -> Result<BTreeSet<PathBuf>, SyncError> {
    Ok(listing_of(&walk_sorted(root)?))
}

/// Relative paths of an already walked (possibly filtered) tree
pub fn listing_of(entries: &[ScannedEntry]) -> BTreeSet<PathBuf> {
    entries.iter().map(|entry| entry.relative.clone()).collect()
}

/// Relative paths present in `replica` but not in `source`
pub fn deletion_set(
    source: &BTreeSet<PathBuf>,
    replica: &BTreeSet<PathBuf>,
) -> BTreeSet<PathBuf> {
    replica.difference(source).cloned().collect()
}
