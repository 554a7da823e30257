use crate::MAX_EXTRACT_CONCURRENCY;
use crate::error::Result;
use crate::scan::extract::extract_entry;
use crate::scan::walk;
use crate::shelf::Shelf;
use async_stream::stream;
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use tana_catalog::Entry;
use tracing::instrument;

/// Progress events emitted by [`scan_stream`] as it works through one root.
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`FileDiscovered`](Self::FileDiscovered): once per qualifying file,
///    in lexical order.
/// 3. [`DiscoveryComplete`](Self::DiscoveryComplete): exactly once, with
///    the total file count.
/// 4. [`Scanned`](Self::Scanned): once per file, in *completion* order
///    (extraction runs concurrently).
/// 5. [`Complete`](Self::Complete): exactly once.
///
/// A root-level failure terminates the stream early, in which case
/// [`Complete`](Self::Complete) is never emitted.
pub enum ScanEvent {
    /// Scanning has begun; emitted exactly once before any other event.
    Started,
    /// A qualifying file was found under the root.
    FileDiscovered { path: PathBuf },
    /// The walk finished; the total file count is now known.
    DiscoveryComplete(u64),
    /// Metadata for one file has been extracted (or degraded).
    Scanned(Entry),
    /// Every discovered file has been scanned; the stream is finished.
    Complete,
}

/// Streams [`ScanEvent`]s for every document file under `root`.
///
/// Discovery happens up front (the walk is cheap next to extraction), then
/// files are extracted concurrently up to [`MAX_EXTRACT_CONCURRENCY`] at a
/// time, promoting the next file as each in-flight extraction completes.
/// The stream is lazy, finite, and one-shot; most callers want the
/// materializing [`scan`] instead.
pub fn scan_stream(root: &Path) -> impl Stream<Item = Result<ScanEvent>> + '_ {
    // Parenthesised so rustfmt still formats the macro body.
    stream!({
        yield Ok(ScanEvent::Started);
        let files = match walk::discover(root).await {
            Ok(files) => files,
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        for path in &files {
            yield Ok(ScanEvent::FileDiscovered { path: path.clone() });
        }
        // Infallible: a usize always fits in a u64.
        yield Ok(ScanEvent::DiscoveryComplete(u64::try_from(files.len()).unwrap_or(0)));

        let root_key = root.to_string_lossy();
        let mut pending: Vec<_> = files.iter().map(|rel| extract_entry(&root_key, root, rel)).collect();
        let mut processing = FuturesUnordered::new();
        let initial = MAX_EXTRACT_CONCURRENCY.min(pending.len());
        processing.extend(pending.drain(..initial));
        while let Some(entry) = processing.next().await {
            yield Ok(ScanEvent::Scanned(entry));
            // Pop-n-push, but FIFO instead of LIFO.
            if !pending.is_empty() {
                processing.push(pending.remove(0));
            }
        }

        yield Ok(ScanEvent::Complete);
    })
}

/// Scan one watched root into a [`Shelf`].
///
/// Materializes [`scan_stream`] and sorts the result lexically by relative
/// path, the deterministic reference order of a shelf, independent of which
/// extraction happened to finish first.
#[instrument(skip(root), fields(root = %root.display()))]
pub async fn scan(root: &Path) -> Result<Shelf> {
    let mut entries = Vec::new();
    let mut events = std::pin::pin!(scan_stream(root));
    while let Some(event) = events.next().await {
        if let ScanEvent::Scanned(entry) = event? {
            entries.push(entry);
        }
    }
    entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(Shelf { root: root.to_path_buf(), entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs as sync_fs;
    use tana_extract::testdoc;

    fn seed_root(dir: &Path) {
        sync_fs::create_dir_all(dir.join("shelf")).unwrap();
        sync_fs::write(dir.join("a.pdf"), testdoc::synthesize(Some("Foo"), Some("Bar"), 10)).unwrap();
        sync_fs::write(dir.join("b.pdf"), b"corrupt").unwrap();
        sync_fs::write(dir.join("shelf/c.pdf"), testdoc::synthesize(Some("C"), None, 2)).unwrap();
        sync_fs::write(dir.join("notes.txt"), b"not a document").unwrap();
    }

    #[tokio::test]
    async fn test_scan_materializes_in_lexical_order() {
        let dir = tempfile::tempdir().unwrap();
        seed_root(dir.path());
        let shelf = scan(dir.path()).await.unwrap();
        let paths: Vec<_> = shelf.entries.iter().map(|e| e.relative_path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf"), PathBuf::from("shelf/c.pdf")]);
        assert!(shelf.entries.iter().all(|e| e.root == dir.path().to_string_lossy()));
    }

    #[tokio::test]
    async fn test_scan_degrades_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        seed_root(dir.path());
        let shelf = scan(dir.path()).await.unwrap();
        let corrupt = &shelf.entries[1];
        assert_eq!(corrupt.title, "b");
        assert_eq!(corrupt.author, "");
        assert_eq!(corrupt.page_count, 0);
        let valid = &shelf.entries[0];
        assert_eq!((valid.title.as_str(), valid.author.as_str(), valid.page_count), ("Foo", "Bar", 10));
    }

    #[tokio::test]
    async fn test_scan_missing_root_fails() {
        let err = scan(Path::new("/no/such/root")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::RootUnavailable(_)));
    }

    #[tokio::test]
    async fn test_event_ordering() {
        let dir = tempfile::tempdir().unwrap();
        seed_root(dir.path());
        let events: Vec<_> = scan_stream(dir.path()).collect::<Vec<_>>().await;
        let events: Vec<_> = events.into_iter().map(Result::unwrap).collect();
        assert!(matches!(events.first(), Some(ScanEvent::Started)));
        assert!(matches!(events.last(), Some(ScanEvent::Complete)));
        let discovered = events.iter().filter(|e| matches!(e, ScanEvent::FileDiscovered { .. })).count();
        let scanned = events.iter().filter(|e| matches!(e, ScanEvent::Scanned(_))).count();
        assert_eq!(discovered, 3);
        assert_eq!(scanned, 3);
        assert!(events.iter().any(|e| matches!(e, ScanEvent::DiscoveryComplete(3))));
    }

    #[tokio::test]
    async fn test_stream_on_missing_root_yields_error_without_complete() {
        let events: Vec<_> = scan_stream(Path::new("/no/such/root")).collect::<Vec<_>>().await;
        assert!(matches!(events.first(), Some(Ok(ScanEvent::Started))));
        assert_eq!(events.len(), 2);
        assert!(events[1].is_err());
    }
}
