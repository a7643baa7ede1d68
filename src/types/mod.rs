//! Core type definitions for treesync

mod entry;
mod error;
mod report;

pub use entry::{EntryKind, EntryStatus};
pub(crate) use error::IoResultExt;
pub use error::SyncError;
pub use report::SyncReport;
