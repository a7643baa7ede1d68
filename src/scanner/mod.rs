//! Directory traversal and tree listing

mod listing;
mod walker;

pub use listing::{deletion_set, list_tree, listing_of};
pub use walker::{walk_sorted, ScannedEntry};
