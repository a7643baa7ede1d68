//! SyncReport - What one synchronization cycle did

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-cycle statistics returned by the sync engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Tree digests matched; no diffing was performed
    pub short_circuited: bool,

    /// Entries copied into places where nothing existed
    pub created: usize,

    /// Stale replica entries replaced by the source version
    pub overwritten: usize,

    /// Replica entries of the wrong kind removed and recreated
    pub type_conflicts: usize,

    /// Directories created in the replica
    pub dirs_created: usize,

    /// Replica-only entries removed
    pub deleted: usize,

    /// Source entries that cannot be mirrored (FIFOs, sockets, devices)
    pub skipped_special: usize,

    /// Bytes written into the replica
    pub bytes_copied: u64,

    /// Wall-clock duration of the cycle
    pub duration: Duration,
}

impl SyncReport {
    /// Report for a cycle where source and replica digests matched
    pub fn unchanged() -> Self {
        Self {
            short_circuited: true,
            ..Self::default()
        }
    }

    /// Total number of mutating filesystem actions
    pub fn changes(&self) -> usize {
        self.created + self.overwritten + self.type_conflicts + self.dirs_created + self.deleted
    }

    /// True when the cycle left the replica untouched
    pub fn is_noop(&self) -> bool {
        self.changes() == 0
    }
}
