//! Repository for catalog entries.
//!
//! Mutation happens at root granularity only: [`Catalog::replace_all`] swaps
//! every entry for one root inside a transaction, and
//! [`Catalog::remove_root`] drops a root wholesale. Fine-grained per-file
//! upserts were considered and rejected; whole-root replace has a far
//! smaller failure surface, and a personal library is small enough that
//! rewriting a few hundred rows per scan costs nothing.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{Entry, EntryRow};
use exn::ResultExt;
use sqlx::SqlitePool;
use tracing::instrument;

/// Repository of [`Entry`] rows, keyed by `(root, relative_path)`.
#[derive(Debug, Clone)]
pub struct Catalog {
    pool: SqlitePool,
}

impl From<&Database> for Catalog {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}

impl Catalog {
    /// Create a catalog over an existing connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All entries for one root, in the order they were last written.
    ///
    /// Insertion order is the scan's lexical order, so this doubles as the
    /// presentation order of a shelf.
    pub async fn query(&self, root: impl AsRef<str>) -> Result<Vec<Entry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(include_str!("../queries/query_root.sql"))
            .bind(root.as_ref())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(Entry::try_from).collect()
    }

    /// Atomically replace every entry for `root` with `entries`.
    ///
    /// This is the reconciliation primitive: either all old rows for the root
    /// are gone and all new rows are in, or (on any failure) the transaction
    /// rolls back and the catalog is exactly as it was before the call.
    /// Concurrent readers never observe the intermediate state.
    #[instrument(skip_all, fields(root = root.as_ref(), entries = entries.len()))]
    pub async fn replace_all(&self, root: impl AsRef<str>, entries: &[Entry]) -> Result<()> {
        let root = root.as_ref();
        // Convert up front so a bad entry can't fail the transaction halfway.
        let rows = entries.iter().map(EntryRow::try_from).collect::<Result<Vec<_>>>()?;
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        sqlx::query(include_str!("../queries/delete_root.sql"))
            .bind(root)
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        for row in rows {
            sqlx::query(include_str!("../queries/insert_entry.sql"))
                .bind(root)
                .bind(row.path)
                .bind(row.title)
                .bind(row.author)
                .bind(row.page_count)
                .bind(row.indexed_at)
                .execute(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// Atomically delete every entry for `root`.
    ///
    /// Used when a watched root is unregistered. Entries under other roots
    /// are untouched.
    #[instrument(skip_all, fields(root = root.as_ref()))]
    pub async fn remove_root(&self, root: impl AsRef<str>) -> Result<()> {
        sqlx::query(include_str!("../queries/delete_root.sql"))
            .bind(root.as_ref())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// Distinct roots currently present in the catalog.
    pub async fn list_roots(&self) -> Result<Vec<String>> {
        sqlx::query_scalar(include_str!("../queries/list_roots.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use time::UtcDateTime;

    fn make_entry(root: &str, path: &str, title: &str) -> Entry {
        Entry {
            root: root.to_string(),
            relative_path: PathBuf::from(path),
            title: title.to_string(),
            author: String::new(),
            page_count: 7,
            indexed_at: UtcDateTime::now(),
        }
    }

    async fn catalog() -> (Database, Catalog) {
        let db = Database::connect_in_memory().await.unwrap();
        let catalog = Catalog::from(&db);
        (db, catalog)
    }

    #[tokio::test]
    async fn test_replace_and_query() {
        let (_db, catalog) = catalog().await;
        let entries = vec![make_entry("/lib", "a.pdf", "A"), make_entry("/lib", "sub/b.pdf", "B")];
        catalog.replace_all("/lib", &entries).await.unwrap();
        let stored = catalog.query("/lib").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].relative_path, PathBuf::from("a.pdf"));
        assert_eq!(stored[1].relative_path, PathBuf::from("sub/b.pdf"));
    }

    #[tokio::test]
    async fn test_replace_is_idempotent() {
        let (_db, catalog) = catalog().await;
        let entries = vec![make_entry("/lib", "a.pdf", "A")];
        catalog.replace_all("/lib", &entries).await.unwrap();
        catalog.replace_all("/lib", &entries).await.unwrap();
        let stored = catalog.query("/lib").await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_replace_drops_vanished_entries() {
        let (_db, catalog) = catalog().await;
        let before = vec![make_entry("/lib", "a.pdf", "A"), make_entry("/lib", "b.pdf", "B")];
        catalog.replace_all("/lib", &before).await.unwrap();
        let after = vec![make_entry("/lib", "a.pdf", "A")];
        catalog.replace_all("/lib", &after).await.unwrap();
        let stored = catalog.query("/lib").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].relative_path, PathBuf::from("a.pdf"));
    }

    #[tokio::test]
    async fn test_replace_failure_leaves_catalog_unchanged() {
        let (_db, catalog) = catalog().await;
        let before = vec![make_entry("/lib", "a.pdf", "old")];
        catalog.replace_all("/lib", &before).await.unwrap();
        // Duplicate (root, path) violates the unique key mid-transaction.
        let broken = vec![make_entry("/lib", "dup.pdf", "x"), make_entry("/lib", "dup.pdf", "y")];
        let err = catalog.replace_all("/lib", &broken).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Database));
        let stored = catalog.query("/lib").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "old");
    }

    #[tokio::test]
    async fn test_remove_root_leaves_other_roots_alone() {
        let (_db, catalog) = catalog().await;
        catalog.replace_all("/lib", &[make_entry("/lib", "a.pdf", "A")]).await.unwrap();
        catalog.replace_all("/docs", &[make_entry("/docs", "c.pdf", "C")]).await.unwrap();
        catalog.remove_root("/lib").await.unwrap();
        assert!(catalog.query("/lib").await.unwrap().is_empty());
        assert_eq!(catalog.query("/docs").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_roots() {
        let (_db, catalog) = catalog().await;
        catalog.replace_all("/lib", &[make_entry("/lib", "a.pdf", "A")]).await.unwrap();
        catalog.replace_all("/docs", &[make_entry("/docs", "c.pdf", "C")]).await.unwrap();
        let roots = catalog.list_roots().await.unwrap();
        assert_eq!(roots, vec!["/docs".to_string(), "/lib".to_string()]);
    }

    #[tokio::test]
    async fn test_replace_with_empty_set_clears_root() {
        let (_db, catalog) = catalog().await;
        catalog.replace_all("/lib", &[make_entry("/lib", "a.pdf", "A")]).await.unwrap();
        catalog.replace_all("/lib", &[]).await.unwrap();
        assert!(catalog.query("/lib").await.unwrap().is_empty());
    }
}
