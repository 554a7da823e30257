//! Catalog reconciliation across all watched roots.
//!
//! One refresh of a root is: scan the tree, then atomically swap the root's
//! catalog rows for the scan result. There is no per-file diffing against
//! the store; whole-root replace is the reconciliation primitive, and the
//! catalog's transaction boundary guarantees readers see either the
//! pre-refresh or post-refresh state, never anything in between. A refresh
//! interrupted by a crash leaves the previous catalog intact.

use crate::error::{ErrorKind, Result};
use crate::shelf::{Library, Shelf};
use crate::{SCAN_DEADLINE, scan};
use exn::ResultExt;
use futures::future;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tana_catalog::Catalog;
use tana_config::Settings;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// The process-wide indexing handle.
///
/// Owns the catalog repository and the persisted settings (whose root list
/// is the set of watched directories). Constructed once at startup and
/// threaded explicitly through whoever triggers refreshes; deliberately not
/// a global.
///
/// Concurrency: refreshes of *different* roots run in parallel; refreshes of
/// the *same* root serialize on a per-root lock, so a refresh triggered
/// while another is mid-flight simply waits and then redoes the work
/// (harmless; reconciliation is idempotent). Root-list mutation serializes
/// on the settings lock.
pub struct Reconciler {
    catalog: Catalog,
    settings: Mutex<Settings>,
    locks: std::sync::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl Reconciler {
    pub fn new(catalog: Catalog, settings: Settings) -> Self {
        Self { catalog, settings: Mutex::new(settings), locks: std::sync::Mutex::new(HashMap::new()) }
    }

    fn root_lock(&self, root: &Path) -> Arc<Mutex<()>> {
        // A poisoned map just means another refresh panicked between lock and
        // unlock of the *std* mutex, which holds no invariants worth losing
        // the whole process over.
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(root.to_path_buf()).or_default().clone()
    }

    /// Current watched roots, in registration order.
    pub async fn roots(&self) -> Vec<PathBuf> {
        self.settings.lock().await.roots().to_vec()
    }

    /// Scan a single root and reconcile the catalog with the result.
    ///
    /// Holds the root's refresh lock for the duration: two refreshes of the
    /// same root never interleave. The scan runs under [`SCAN_DEADLINE`].
    pub async fn refresh_one(&self, root: &Path) -> Result<Shelf> {
        self.refresh_within(root, SCAN_DEADLINE).await
    }

    #[instrument(skip_all, fields(root = %root.display()))]
    async fn refresh_within(&self, root: &Path, deadline: Duration) -> Result<Shelf> {
        let lock = self.root_lock(root);
        let _guard = lock.lock().await;
        let shelf = tokio::time::timeout(deadline, scan::scan(root))
            .await
            .or_raise(|| ErrorKind::ScanTimeout(root.to_path_buf()))??;
        self.catalog
            .replace_all(root.to_string_lossy(), &shelf.entries)
            .await
            .or_raise(|| ErrorKind::Catalog)?;
        info!(root = %root.display(), entries = shelf.entries.len(), "root reconciled");
        Ok(shelf)
    }

    /// Refresh every watched root and assemble the resulting [`Library`].
    ///
    /// Roots refresh concurrently; shelf order follows registration order
    /// regardless. An unavailable root (or one that blew the scan deadline)
    /// is skipped for this cycle with its existing catalog entries served
    /// stale; a temporarily-unmounted drive must not have its data wiped.
    /// Catalog failures are surfaced; the whole operation is idempotent and
    /// may be retried wholesale.
    pub async fn refresh_all(&self) -> Result<Library> {
        let roots = self.roots().await;
        let refreshes = roots.iter().map(|root| self.refresh_or_stale(root, SCAN_DEADLINE));
        let shelves = future::join_all(refreshes).await.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(Library { shelves })
    }

    async fn refresh_or_stale(&self, root: &Path, deadline: Duration) -> Result<Shelf> {
        match self.refresh_within(root, deadline).await {
            Ok(shelf) => Ok(shelf),
            Err(e) if matches!(&*e, ErrorKind::RootUnavailable(_) | ErrorKind::ScanTimeout(_)) => {
                warn!(root = %root.display(), error = %e, "root skipped this refresh, serving prior entries");
                self.stale_shelf(root).await
            },
            Err(e) => Err(e),
        }
    }

    /// Read a root's shelf straight from the catalog, without scanning.
    async fn stale_shelf(&self, root: &Path) -> Result<Shelf> {
        let entries = self.catalog.query(root.to_string_lossy()).await.or_raise(|| ErrorKind::Catalog)?;
        Ok(Shelf { root: root.to_path_buf(), entries })
    }

    /// Register a new root, persist the settings, and run a scoped refresh
    /// of just that root.
    ///
    /// Re-adding an already-watched root skips the settings write but still
    /// refreshes.
    pub async fn add_root(&self, root: impl Into<PathBuf>) -> Result<Shelf> {
        let root = root.into();
        {
            let mut settings = self.settings.lock().await;
            settings.add_root(&root).or_raise(|| ErrorKind::Config)?;
        }
        info!(root = %root.display(), "root registered");
        self.refresh_one(&root).await
    }

    /// Unregister a root (by path, never by position) and drop all of its
    /// catalog entries. Entries under other roots are unaffected.
    pub async fn remove_root(&self, root: &Path) -> Result<()> {
        {
            // Out of the settings first, so no concurrent refresh_all picks
            // the root up again while we delete its rows.
            let mut settings = self.settings.lock().await;
            settings.remove_root(root).or_raise(|| ErrorKind::Config)?;
        }
        let lock = self.root_lock(root);
        let _guard = lock.lock().await;
        self.catalog.remove_root(root.to_string_lossy()).await.or_raise(|| ErrorKind::Catalog)?;
        info!(root = %root.display(), "root unregistered, entries dropped");
        Ok(())
    }

    /// Assemble the read view of the whole library from the catalog, in
    /// registration order.
    ///
    /// This never touches the filesystem; page loads render catalog state,
    /// and scans happen only on explicit refresh or root mutation.
    pub async fn library(&self) -> Result<Library> {
        let roots = self.roots().await;
        let mut shelves = Vec::with_capacity(roots.len());
        for root in &roots {
            shelves.push(self.stale_shelf(root).await?);
        }
        Ok(Library { shelves })
    }
}
