use std::path::{Path, PathBuf};
use tana_catalog::Entry;

/// The entries belonging to one watched root, as produced by a single scan
/// pass (or read back from the catalog). Transient: shelves are assembled on
/// demand and folded into the catalog during reconciliation, never persisted
/// as their own object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shelf {
    pub root: PathBuf,
    pub entries: Vec<Entry>,
}

/// The full collection of shelves, one per watched root, in registration
/// order. This is what a presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Library {
    pub shelves: Vec<Shelf>,
}

impl Library {
    /// Find the shelf for a given root, if it is part of this view.
    pub fn shelf(&self, root: impl AsRef<Path>) -> Option<&Shelf> {
        self.shelves.iter().find(|shelf| shelf.root == root.as_ref())
    }

    /// Total number of entries across all shelves.
    pub fn len(&self) -> usize {
        self.shelves.iter().map(|shelf| shelf.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
