//! Mapping source paths onto the replica

use crate::types::SyncError;
use std::path::{Path, PathBuf};

/// Map an absolute source path to its replica counterpart
///
/// The mapping is purely structural: `source_root/P` becomes
/// `replica_root/P`.
pub fn replica_path(
    source_entry: &Path,
    source_root: &Path,
    replica_root: &Path,
) -> Result<PathBuf, SyncError> {
    let relative = source_entry
        .strip_prefix(source_root)
        .map_err(|_| SyncError::PathMapping {
            path: source_entry.to_path_buf(),
            root: source_root.to_path_buf(),
        })?;

    Ok(replica_root.join(relative))
}
