//! Entry kinds and comparison outcomes

use std::fs::{FileType, Metadata};

/// Kind of a filesystem entry, as seen without following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file
    File,

    /// Symbolic link (never dereferenced)
    Symlink,

    /// Directory
    Directory,

    /// FIFO, socket or device node. Listed and deletable, never copied.
    Special,
}

impl EntryKind {
    /// Classify a `FileType` obtained without following links
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Special
        }
    }

    /// Classify from `symlink_metadata` output
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self::from_file_type(metadata.file_type())
    }

    /// Single-byte tag folded into tree digests
    pub fn tag(self) -> u8 {
        match self {
            EntryKind::File => b'f',
            EntryKind::Symlink => b'l',
            EntryKind::Directory => b'd',
            EntryKind::Special => b's',
        }
    }

    /// True for entries the copier can materialize
    pub fn is_copyable(self) -> bool {
        matches!(self, EntryKind::File | EntryKind::Symlink)
    }
}

/// Result of comparing a source entry with its replica counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Nothing exists at the replica path
    Missing,

    /// Replica matches the source (content, link target, or both directories)
    Identical,

    /// Same kind on both sides, different content or link target
    Differing,

    /// Replica holds a different kind of entry (e.g. a directory where
    /// the source has a file)
    TypeConflict,
}

impl EntryStatus {
    /// Whether the replica entry must be (re)written
    pub fn needs_copy(self) -> bool {
        !matches!(self, EntryStatus::Identical)
    }

    /// Whether a stale replica entry has to be removed before writing
    pub fn needs_removal(self) -> bool {
        matches!(self, EntryStatus::Differing | EntryStatus::TypeConflict)
    }
}
