//! Deterministic directory walker

use crate::types::{EntryKind, SyncError};
use std::path::{Path, PathBuf};

/// One entry found below a tree root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedEntry {
    /// Absolute path of the entry
    pub path: PathBuf,

    /// Path relative to the tree root (the cross-tree identity key)
    pub relative: PathBuf,

    /// Entry kind, links not followed
    pub kind: EntryKind,

    /// Depth below the root (direct children are depth 1)
    pub depth: usize,
}

impl ScannedEntry {
    /// Final component of the entry's path, lossily converted
    pub fn name(&self) -> String {
        self.relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Walk a tree depth-first with every directory's entries sorted by name
///
/// Nothing is filtered: hidden files and ignore files are mirrored like any
/// other entry. Symlinks are reported as links and never descended into.
/// The root itself is not part of the result.
///
/// # Errors
/// Any traversal failure (unreadable directory, entry vanishing mid-walk)
/// is returned instead of skipped. A partial walk would make the digest and
/// the deletion set lie about the tree.
pub fn walk_sorted(root: &Path) -> Result<Vec<ScannedEntry>, SyncError> {
    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut entries = Vec::new();

    for result in walker {
        let entry = result?;

        if entry.depth() == 0 {
            continue;
        }

        let kind = match entry.file_type() {
            Some(ft) => EntryKind::from_file_type(ft),
            None => continue, // stdin only
        };

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| SyncError::PathMapping {
                path: entry.path().to_path_buf(),
                root: root.to_path_buf(),
            })?
            .to_path_buf();

        entries.push(ScannedEntry {
            depth: entry.depth(),
            path: entry.into_path(),
            relative,
            kind,
        });
    }

    Ok(entries)
}
