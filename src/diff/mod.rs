//! Diff logic - entry comparison and source-to-replica path mapping

mod compare;
mod paths;

pub use compare::{compare_entry, files_identical};
pub use paths::replica_path;
