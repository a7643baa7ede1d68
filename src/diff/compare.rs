//! Entry comparison logic

use crate::types::{EntryKind, EntryStatus, IoResultExt, SyncError};
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Compare a source entry with the entry at its replica path
///
/// The replica side is inspected without following symlinks:
///
/// 1. **Nothing there** → `Missing`
/// 2. **Different kind** (directory where the source has a file, regular
///    file where the source has a symlink, ...) → `TypeConflict`
/// 3. **Files**: sizes differ, or a byte-by-byte comparison finds a
///    mismatch → `Differing`; otherwise `Identical`
/// 4. **Symlinks**: link targets compared as paths, pointees never read
/// 5. **Directories**: both directories → `Identical`
///
/// Metadata (mtime, permissions) never makes two entries differ.
pub fn compare_entry(
    source: &Path,
    replica: &Path,
    kind: EntryKind,
) -> Result<EntryStatus, SyncError> {
    let replica_meta = match fs::symlink_metadata(replica) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(EntryStatus::Missing),
        Err(e) => return Err(SyncError::io(replica, e)),
    };

    if EntryKind::from_metadata(&replica_meta) != kind {
        return Ok(EntryStatus::TypeConflict);
    }

    let identical = match kind {
        EntryKind::File => {
            let source_len = fs::metadata(source).at(source)?.len();
            source_len == replica_meta.len() && files_identical(source, replica)?
        }
        EntryKind::Symlink => {
            fs::read_link(source).at(source)? == fs::read_link(replica).at(replica)?
        }
        EntryKind::Directory => true,
        // Never mirrored; report whatever is there as stale.
        EntryKind::Special => false,
    };

    Ok(if identical {
        EntryStatus::Identical
    } else {
        EntryStatus::Differing
    })
}

/// Deep byte-for-byte comparison of two regular files
///
/// Streams both files in 64KB chunks and stops at the first mismatch.
pub fn files_identical(left: &Path, right: &Path) -> Result<bool, SyncError> {
    let mut left_file = File::open(left).at(left)?;
    let mut right_file = File::open(right).at(right)?;

    let mut left_buf = vec![0u8; 64 * 1024];
    let mut right_buf = vec![0u8; 64 * 1024];

    loop {
        let left_read = read_full(&mut left_file, &mut left_buf).at(left)?;
        let right_read = read_full(&mut right_file, &mut right_buf).at(right)?;

        if left_read != right_read || left_buf[..left_read] != right_buf[..right_read] {
            return Ok(false);
        }

        if left_read == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as the reader allows; short only at EOF
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
