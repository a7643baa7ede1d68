//! Atomic file copy implementation

use crate::types::{IoResultExt, SyncError};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Create missing parent directories of `dest`
/// 2. Stream the content into a temporary file next to `dest`
/// 3. Flush and sync to disk
/// 4. Preserve metadata (permissions, mtime)
/// 5. Rename the temporary file onto `dest`
///
/// A failure at any step drops the temporary file, so `dest` never holds a
/// partially written copy.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(SyncError)` - IO error, tagged with the path that failed
///
/// # Example
/// ```no_run
/// use treesync::executor::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("source.txt"), Path::new("replica/source.txt"))?;
/// # Ok::<(), treesync::types::SyncError>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, SyncError> {
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).at(parent)?;

    let mut src_file = File::open(src).at(src)?;
    let src_metadata = src_file.metadata().at(src)?;

    let mut staged = NamedTempFile::new_in(parent).at(parent)?;

    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer).at(src)?;

        if bytes_read == 0 {
            break; // EOF
        }

        staged
            .write_all(&buffer[0..bytes_read])
            .at(staged.path())?;
        total_bytes += bytes_read as u64;
    }

    staged.as_file().sync_all().at(staged.path())?;

    fs::set_permissions(staged.path(), src_metadata.permissions()).at(staged.path())?;

    let mtime = filetime::FileTime::from_last_modification_time(&src_metadata);
    filetime::set_file_mtime(staged.path(), mtime).at(staged.path())?;

    staged
        .persist(dest)
        .map_err(|e| SyncError::io(dest, e.error))?;

    Ok(total_bytes)
}
