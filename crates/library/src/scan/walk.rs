use crate::error::{ErrorKind, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// Extension (compared case-insensitively) that marks a file as a document.
const DOCUMENT_EXTENSION: &str = "pdf";

pub(crate) fn is_document(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
}

/// Collect the relative paths of every qualifying file under `root`, sorted
/// lexically.
///
/// The root being missing, unreadable, or not a directory fails the whole
/// walk with [`ErrorKind::RootUnavailable`]. An unreadable *sub*directory is
/// a different matter: a permission hole partway down must not throw away
/// the rest of the tree, so those are skipped with a warning. A symlink to a
/// document is resolved and included; directory symlinks are not traversed,
/// which rules out traversal cycles.
pub(crate) async fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    match fs::metadata(root).await {
        Ok(meta) if meta.is_dir() => {},
        _ => exn::bail!(ErrorKind::RootUnavailable(root.to_path_buf())),
    }
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(current) = stack.pop() {
        let mut entries = match fs::read_dir(&current).await {
            Ok(entries) => entries,
            Err(_) if current == root => exn::bail!(ErrorKind::RootUnavailable(root.to_path_buf())),
            Err(e) => {
                warn!(dir = %current.display(), error = %e, "skipping unreadable directory");
                continue;
            },
        };
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(dir = %current.display(), error = %e, "skipping unreadable entry");
                    continue;
                },
            };
            let path = entry.path();
            // file_type() does not follow symlinks, so a linked directory is
            // never pushed onto the stack. Links that claim to be documents
            // get one resolving metadata call; a dangling link drops out.
            let Ok(file_type) = entry.file_type().await else { continue };
            if file_type.is_dir() {
                stack.push(path);
                continue;
            }
            let is_file = if file_type.is_symlink() {
                fs::metadata(&path).await.is_ok_and(|meta| meta.is_file())
            } else {
                file_type.is_file()
            };
            if is_file
                && is_document(&path)
                && let Ok(relative) = path.strip_prefix(root)
            {
                found.push(relative.to_path_buf());
            }
        }
    }
    found.sort();
    Ok(found)
}
