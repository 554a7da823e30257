use crate::error::{Error, ErrorKind};
use exn::{OptionExt, ResultExt};
use std::path::PathBuf;
use time::UtcDateTime;

/// One cataloged document.
///
/// `(root, relative_path)` is the unique key across the whole catalog: no two
/// entries may describe the same file under the same root. An entry is never
/// mutated in place across scans; a changed file shows up as delete-old plus
/// insert-new during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Absolute path of the watched root this entry belongs to. An entry
    /// cannot outlive its root's registration.
    pub root: String,
    /// Path relative to the root; unique within a root.
    pub relative_path: PathBuf,
    /// Document title; falls back to the filename stem when unextractable.
    pub title: String,
    /// Document author; may be empty.
    pub author: String,
    /// Number of pages; zero when unknown.
    pub page_count: u32,
    /// When the scan that produced this entry ran.
    pub indexed_at: UtcDateTime,
}

#[derive(sqlx::FromRow)]
pub(crate) struct EntryRow {
    pub(crate) root: String,
    pub(crate) path: String,
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) page_count: i64,
    pub(crate) indexed_at: i64,
}

impl TryFrom<&Entry> for EntryRow {
    type Error = Error;
    fn try_from(entry: &Entry) -> Result<Self, Self::Error> {
        Ok(Self {
            root: entry.root.clone(),
            // SQLite wants strings; fail loudly on paths that aren't UTF-8
            // instead of storing mangled data.
            path: entry.relative_path.to_str().ok_or_raise(|| ErrorKind::InvalidData("path"))?.to_string(),
            title: entry.title.clone(),
            author: entry.author.clone(),
            page_count: i64::from(entry.page_count),
            indexed_at: entry.indexed_at.unix_timestamp(),
        })
    }
}

impl TryFrom<EntryRow> for Entry {
    type Error = Error;
    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            root: row.root,
            relative_path: PathBuf::from(row.path),
            title: row.title,
            author: row.author,
            page_count: u32::try_from(row.page_count).or_raise(|| ErrorKind::InvalidData("page count"))?,
            indexed_at: UtcDateTime::from_unix_timestamp(row.indexed_at)
                .or_raise(|| ErrorKind::InvalidData("index date"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_to_model() {
        let indexed = UtcDateTime::now();
        let row = EntryRow {
            root: "/home/reader/books".to_string(),
            path: "fiction/dune.pdf".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            page_count: 412,
            indexed_at: indexed.unix_timestamp(),
        };
        let entry = Entry::try_from(row).unwrap();
        assert_eq!(entry.relative_path, PathBuf::from("fiction/dune.pdf"));
        assert_eq!(entry.page_count, 412);
        // Unix timestamps are whole seconds; nanoseconds don't survive.
        assert_eq!(entry.indexed_at, indexed.replace_nanosecond(0).unwrap());
    }

    #[test]
    fn test_model_to_row() {
        let entry = Entry {
            root: "/home/reader/books".to_string(),
            relative_path: PathBuf::from("manuals/toaster.pdf"),
            title: "toaster".to_string(),
            author: String::new(),
            page_count: 0,
            indexed_at: UtcDateTime::now(),
        };
        let row = EntryRow::try_from(&entry).unwrap();
        assert_eq!(row.path, "manuals/toaster.pdf");
        assert_eq!(row.page_count, 0);
    }

    #[test]
    fn test_negative_page_count_is_invalid() {
        let row = EntryRow {
            root: "/r".to_string(),
            path: "a.pdf".to_string(),
            title: "a".to_string(),
            author: String::new(),
            page_count: -1,
            indexed_at: 0,
        };
        let err = Entry::try_from(row).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidData("page count")));
    }
}
