//! Tree Digest - one hash summarizing a whole directory tree

use super::compute_hash;
use crate::scanner::{walk_sorted, ScannedEntry};
use crate::types::{EntryKind, IoResultExt, SyncError};
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

/// Cumulative Blake3 digest of a tree's structure and content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeDigest([u8; 32]);

impl TreeDigest {
    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TreeDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", blake3::Hash::from(self.0).to_hex())
    }
}

/// Compute the digest of every entry below `root`
///
/// Shorthand for [`digest_entries`] over [`walk_sorted`]; any read failure
/// is returned rather than skipped.
pub fn digest_tree(root: &Path) -> Result<TreeDigest, SyncError> {
    digest_entries(&walk_sorted(root)?)
}

/// Compute the digest of an already walked tree
///
/// `entries` must be in [`walk_sorted`] order, so the digest does not
/// depend on how the filesystem happens to enumerate directories. Each
/// entry contributes a record of:
///
/// - its kind tag and relative path
/// - files: hex of the content hash
/// - symlinks: the link target (the pointee is never read)
/// - directories: hex of the hash of the directory name
/// - special files: nothing further
///
/// Every field is length-prefixed, so two different trees cannot produce the
/// same byte stream. Equal digests are taken as "already in sync" by the
/// engine. Callers may leave entries out; the engine drops the source's
/// special files, which are never mirrored.
pub fn digest_entries(entries: &[ScannedEntry]) -> Result<TreeDigest, SyncError> {
    let mut hasher = blake3::Hasher::new();

    for entry in entries {
        hasher.update(&[entry.kind.tag()]);
        update_field(&mut hasher, &path_bytes(&entry.relative));

        match entry.kind {
            EntryKind::File => {
                let hash = blake3::Hash::from(compute_hash(&entry.path)?);
                update_field(&mut hasher, hash.to_hex().as_bytes());
            }
            EntryKind::Symlink => {
                let target = fs::read_link(&entry.path).at(&entry.path)?;
                update_field(&mut hasher, &path_bytes(&target));
            }
            EntryKind::Directory => {
                let name_hash = blake3::hash(entry.name().as_bytes());
                update_field(&mut hasher, name_hash.to_hex().as_bytes());
            }
            EntryKind::Special => {}
        }
    }

    Ok(TreeDigest(*hasher.finalize().as_bytes()))
}

fn update_field(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}
