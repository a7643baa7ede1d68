//! # treesync - One-way directory mirroring
//!
//! Keeps a replica directory byte-for-byte identical to a source directory:
//! files, symbolic links and empty directories are copied over, and anything
//! the source does not have is removed from the replica. A polling loop runs
//! the sync cycle on a fixed interval.
//!
//! ```no_run
//! use treesync::{synchronize, TracingLogger};
//! use std::path::Path;
//!
//! let report = synchronize(Path::new("/data"), Path::new("/backup/data"), &TracingLogger)?;
//! println!("{} entries changed", report.changes());
//! # Ok::<(), treesync::SyncError>(())
//! ```

// Module declarations
pub mod commands;
pub mod config;
pub mod diff;
pub mod executor;
pub mod hash;
pub mod logging;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use commands::sync::synchronize;
pub use config::Config;
pub use logging::{SyncLogger, TracingLogger};
pub use types::{EntryKind, EntryStatus, SyncError, SyncReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
