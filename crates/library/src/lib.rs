//! Directory scanning and catalog reconciliation.
//!
//! This crate is the indexing core: it walks watched roots, extracts
//! metadata per document (degrading gracefully on malformed files), and
//! reconciles the result against the persistent catalog with whole-root
//! atomic replacement. The [`Reconciler`] is the process-wide handle,
//! constructed once at startup and passed explicitly to whoever needs it,
//! never stashed in a global.

pub mod error;
pub mod reconcile;
pub mod scan;
mod shelf;

pub use crate::reconcile::Reconciler;
pub use crate::shelf::{Library, Shelf};

/// How many files may be read and parsed concurrently within one root.
/// Extraction is independent per file and shares no mutable state.
pub(crate) const MAX_EXTRACT_CONCURRENCY: usize = 8;

/// Soft ceiling for scanning a single root. One pathological file or a dead
/// network mount must not hang the whole refresh forever.
pub(crate) const SCAN_DEADLINE: std::time::Duration = std::time::Duration::from_secs(120);
