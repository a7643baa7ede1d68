//! Hashing utilities

mod tree;

pub use tree::{digest_entries, digest_tree, TreeDigest};

use crate::types::{IoResultExt, SyncError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Compute Blake3 hash of a file
///
/// The file is streamed in 64KB chunks for memory efficiency.
///
/// # Arguments
/// * `file_path` - Path to the file to hash
///
/// # Returns
/// * `Ok([u8; 32])` - 32-byte Blake3 hash
/// * `Err(SyncError)` - IO error if file cannot be read
///
/// # Example
/// ```no_run
/// use treesync::hash::compute_hash;
/// use std::path::Path;
///
/// let hash = compute_hash(Path::new("file.txt"))?;
/// # Ok::<(), treesync::types::SyncError>(())
/// ```
pub fn compute_hash(file_path: &Path) -> Result<[u8; 32], SyncError> {
    let mut file = File::open(file_path).at(file_path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let bytes_read = file.read(&mut buffer).at(file_path)?;

        if bytes_read == 0 {
            break; // EOF
        }

        hasher.update(&buffer[0..bytes_read]);
    }

    Ok(*hasher.finalize().as_bytes())
}
