//! Executor module for replica mutations
//!
//! Every function here changes the replica tree. Informational records go
//! through the injected [`SyncLogger`] right before the filesystem call.

pub mod copy;

pub use copy::copy_file_atomic;

use crate::logging::SyncLogger;
use crate::types::{EntryKind, IoResultExt, SyncError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Materialize one source entry at `dest`
///
/// Symlinks are recreated with the same target, never dereferenced.
/// Regular files are copied with their permissions and mtime via
/// [`copy_file_atomic`]. Parent directories are created as needed.
///
/// Returns the number of content bytes written.
pub fn materialize(
    source: &Path,
    dest: &Path,
    kind: EntryKind,
    logger: &dyn SyncLogger,
) -> Result<u64, SyncError> {
    match kind {
        EntryKind::Symlink => {
            logger.info(&format!(
                "Copying symbolic link {} into replica as {}.",
                source.display(),
                dest.display()
            ));
            copy_symlink(source, dest)
        }
        EntryKind::File => {
            logger.info(&format!(
                "Copying file {} into replica as {}.",
                source.display(),
                dest.display()
            ));
            copy_file_atomic(source, dest)
        }
        EntryKind::Directory | EntryKind::Special => Err(SyncError::Validation(format!(
            "Cannot materialize {:?} entry {}",
            kind,
            source.display()
        ))),
    }
}

/// Copy a symlink without dereferencing its target.
///
/// If a destination path already exists, it is removed first (file/dir/symlink).
fn copy_symlink(src_path: &Path, dest_path: &Path) -> Result<u64, SyncError> {
    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).at(parent)?;
    }

    if fs::symlink_metadata(dest_path).is_ok() {
        remove_path_any(dest_path)?;
    }

    let target = fs::read_link(src_path).at(src_path)?;
    create_symlink(&target, dest_path)?;
    Ok(0)
}

/// Create an empty directory in the replica, parents included
pub fn create_empty_dir(dest: &Path, logger: &dyn SyncLogger) -> Result<(), SyncError> {
    logger.info(&format!("Creating folder {} in replica.", dest.display()));
    fs::create_dir_all(dest).at(dest)
}

/// Remove a replica entry of any kind
///
/// Returns `Ok(false)` when nothing exists at `path` anymore, typically
/// because a parent directory was already removed recursively. This keeps
/// deletion order-independent.
pub fn remove_entry(path: &Path, logger: &dyn SyncLogger) -> Result<bool, SyncError> {
    match fs::symlink_metadata(path) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(SyncError::io(path, e)),
    }

    logger.info(&format!("Removing {} from replica.", path.display()));

    match remove_path_any(path) {
        Ok(()) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Remove any filesystem entry at `path`.
///
/// Directories are removed recursively; files and symlinks are removed as files.
pub fn remove_path_any(path: &Path) -> Result<(), SyncError> {
    let metadata = fs::symlink_metadata(path).at(path)?;
    if metadata.file_type().is_dir() {
        fs::remove_dir_all(path).at(path)
    } else {
        fs::remove_file(path).at(path)
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link_path: &Path) -> Result<(), SyncError> {
    std::os::unix::fs::symlink(target, link_path).at(link_path)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link_path: &Path) -> Result<(), SyncError> {
    use std::os::windows::fs::{symlink_dir, symlink_file};

    match symlink_file(target, link_path) {
        Ok(()) => Ok(()),
        Err(file_err) => match symlink_dir(target, link_path) {
            Ok(()) => Ok(()),
            Err(_) => Err(SyncError::io(link_path, file_err)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::RecordingLogger;
    use tempfile::TempDir;

    #[test]
    fn test_materialize_file_logs_once() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, b"hi").unwrap();
        let dest = dir.path().join("replica/a.txt");
        let logger = RecordingLogger::new();

        let bytes = materialize(&src, &dest, EntryKind::File, &logger).unwrap();

        assert_eq!(bytes, 2);
        assert_eq!(fs::read(&dest).unwrap(), b"hi");
        assert_eq!(logger.messages().len(), 1);
        assert!(logger.messages()[0].contains("Copying file"));
    }

    #[test]
    #[cfg(unix)]
    fn test_materialize_symlink_keeps_target() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("link");
        std::os::unix::fs::symlink("../relative/target", &src).unwrap();
        let dest = dir.path().join("replica/nested/link");
        let logger = RecordingLogger::new();

        materialize(&src, &dest, EntryKind::Symlink, &logger).unwrap();

        assert_eq!(
            fs::read_link(&dest).unwrap(),
            std::path::PathBuf::from("../relative/target")
        );
        assert_eq!(logger.count_containing("symbolic link"), 1);
    }

    #[test]
    fn test_materialize_rejects_directories() {
        let dir = TempDir::new().unwrap();
        let logger = RecordingLogger::new();

        let result = materialize(dir.path(), &dir.path().join("x"), EntryKind::Directory, &logger);

        assert!(result.is_err());
        assert!(logger.messages().is_empty());
    }

    #[test]
    fn test_remove_entry_handles_files_and_directories() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f.txt");
        let tree = dir.path().join("tree");
        fs::write(&file, b"x").unwrap();
        fs::create_dir_all(tree.join("deep/er")).unwrap();
        fs::write(tree.join("deep/er/file"), b"y").unwrap();
        let logger = RecordingLogger::new();

        assert!(remove_entry(&file, &logger).unwrap());
        assert!(remove_entry(&tree, &logger).unwrap());

        assert!(!file.exists());
        assert!(!tree.exists());
        assert_eq!(logger.count_containing("Removing"), 2);
    }

    #[test]
    fn test_remove_entry_already_gone() {
        let dir = TempDir::new().unwrap();
        let logger = RecordingLogger::new();

        assert!(!remove_entry(&dir.path().join("ghost"), &logger).unwrap());
        assert!(logger.messages().is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_remove_entry_does_not_follow_symlinks() {
        let dir = TempDir::new().unwrap();
        let target_dir = dir.path().join("target");
        fs::create_dir(&target_dir).unwrap();
        fs::write(target_dir.join("keep.txt"), b"keep").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target_dir, &link).unwrap();

        assert!(remove_entry(&link, &RecordingLogger::new()).unwrap());

        assert!(fs::symlink_metadata(&link).is_err());
        assert!(target_dir.join("keep.txt").exists());
    }

    #[test]
    fn test_create_empty_dir() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("a/b/empty");
        let logger = RecordingLogger::new();

        create_empty_dir(&dest, &logger).unwrap();

        assert!(dest.is_dir());
        assert_eq!(logger.count_containing("Creating folder"), 1);
    }
}
