//! Sync engine - one mirroring cycle
//!
//! A cycle runs in three phases:
//!
//! 1. **Digest gate**: hash both trees; equal digests end the cycle.
//! 2. **Mirror**: go through the source in sorted pre-order, creating or
//!    replacing every replica entry that is missing, stale or of the wrong
//!    kind.
//! 3. **Prune**: remove replica entries the source does not have.
//!
//! Phase 2 always finishes before phase 3 starts. A cycle aborted between the
//! two leaves extra entries in the replica, never holes.
//!
//! The source is walked once per cycle and special files (FIFOs, sockets,
//! devices) are set aside right away. They are never mirrored, so they take
//! no part in the source digest or listing; on the replica side they stay
//! visible and get pruned.

use crate::diff::{compare_entry, replica_path};
use crate::executor::{create_empty_dir, materialize, remove_entry, remove_path_any};
use crate::hash::{digest_entries, digest_tree};
use crate::logging::SyncLogger;
use crate::scanner::{deletion_set, list_tree, listing_of, walk_sorted, ScannedEntry};
use crate::types::{EntryKind, EntryStatus, SyncError, SyncReport};
use indicatif::{HumanBytes, HumanDuration};
use std::path::Path;
use std::time::Instant;

/// Marker logged when a cycle begins
pub const CYCLE_STARTED: &str = "Synchronization started.";

/// Marker logged when a cycle finishes successfully
pub const CYCLE_COMPLETED: &str = "Synchronization completed.";

/// Run one synchronization cycle from `source_root` onto `replica_root`
///
/// Both roots must already exist and be directories; they are not
/// re-validated here. The first I/O error aborts the cycle and is returned
/// as-is, with no rollback. Without a completion record in the log, an
/// aborted cycle is distinguishable from a finished one.
pub fn synchronize(
    source_root: &Path,
    replica_root: &Path,
    logger: &dyn SyncLogger,
) -> Result<SyncReport, SyncError> {
    let started_at = Instant::now();
    logger.info(CYCLE_STARTED);

    let (mirrored, skipped): (Vec<ScannedEntry>, Vec<ScannedEntry>) = walk_sorted(source_root)?
        .into_iter()
        .partition(|entry| entry.kind != EntryKind::Special);

    let source_digest = digest_entries(&mirrored)?;
    let replica_digest = digest_tree(replica_root)?;
    logger.debug(&format!(
        "Source digest {source_digest}, replica digest {replica_digest}"
    ));

    let mut report = if source_digest == replica_digest {
        SyncReport::unchanged()
    } else {
        let mut report = SyncReport::default();
        for entry in &skipped {
            logger.warn(&format!(
                "Skipping special file {} (only files, symlinks and directories are mirrored).",
                entry.path.display()
            ));
        }
        report.skipped_special = skipped.len();

        mirror_source(&mirrored, source_root, replica_root, logger, &mut report)?;
        prune_replica(&mirrored, replica_root, logger, &mut report)?;
        report
    };

    report.duration = started_at.elapsed();
    logger.info(&completion_message(&report));

    Ok(report)
}

/// Phase 2: bring every mirrored source entry into the replica
fn mirror_source(
    entries: &[ScannedEntry],
    source_root: &Path,
    replica_root: &Path,
    logger: &dyn SyncLogger,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    // Pre-order: a directory is reconciled before anything inside it.
    for entry in entries {
        let dest = replica_path(&entry.path, source_root, replica_root)?;

        match entry.kind {
            EntryKind::Directory => sync_directory(entry, &dest, logger, report)?,
            EntryKind::File | EntryKind::Symlink => sync_entry(entry, &dest, logger, report)?,
            EntryKind::Special => {}
        }
    }

    Ok(())
}

fn sync_directory(
    entry: &ScannedEntry,
    dest: &Path,
    logger: &dyn SyncLogger,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    match compare_entry(&entry.path, dest, EntryKind::Directory)? {
        // Created even when non-empty: its children may all be skipped.
        EntryStatus::Missing => {
            create_empty_dir(dest, logger)?;
            report.dirs_created += 1;
        }
        EntryStatus::TypeConflict => {
            logger.info(&format!(
                "Replacing {} with a directory: replica holds a different kind of entry.",
                dest.display()
            ));
            remove_path_any(dest)?;
            create_empty_dir(dest, logger)?;
            report.type_conflicts += 1;
        }
        EntryStatus::Identical | EntryStatus::Differing => {}
    }

    Ok(())
}

fn sync_entry(
    entry: &ScannedEntry,
    dest: &Path,
    logger: &dyn SyncLogger,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    let status = compare_entry(&entry.path, dest, entry.kind)?;

    match status {
        EntryStatus::Identical => return Ok(()),
        EntryStatus::Missing => report.created += 1,
        EntryStatus::Differing => {
            logger.info(&format!(
                "Updating {}: replica differs from source.",
                dest.display()
            ));
            report.overwritten += 1;
        }
        EntryStatus::TypeConflict => {
            logger.info(&format!(
                "Replacing {}: replica holds a different kind of entry.",
                dest.display()
            ));
            report.type_conflicts += 1;
        }
    }

    // Stale entries go first; the copier never writes over them in place.
    if status.needs_removal() {
        remove_path_any(dest)?;
    }

    report.bytes_copied += materialize(&entry.path, dest, entry.kind, logger)?;
    Ok(())
}

/// Phase 3: remove everything the mirrored source does not have
///
/// A special file in the replica is removed even when the source has one at
/// the same path.
fn prune_replica(
    mirrored: &[ScannedEntry],
    replica_root: &Path,
    logger: &dyn SyncLogger,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    let source_listing = listing_of(mirrored);
    let replica_listing = list_tree(replica_root)?;

    // Sorted, so a directory is removed before its (now vanished) children
    // are visited; remove_entry reports those as already gone.
    for relative in deletion_set(&source_listing, &replica_listing) {
        if remove_entry(&replica_root.join(&relative), logger)? {
            report.deleted += 1;
        }
    }

    Ok(())
}

fn completion_message(report: &SyncReport) -> String {
    if report.short_circuited {
        return format!("{CYCLE_COMPLETED} Replica already up to date.");
    }

    format!(
        "{CYCLE_COMPLETED} {} created, {} updated, {} replaced, {} folders created, {} removed, {} copied in {}.",
        report.created,
        report.overwritten,
        report.type_conflicts,
        report.dirs_created,
        report.deleted,
        HumanBytes(report.bytes_copied),
        HumanDuration(report.duration)
    )
}
