use std::path::Path;
use tana_catalog::Entry;
use tana_extract::DocumentMeta;
use time::UtcDateTime;
use tokio::fs;
use tracing::warn;

/// Produce the catalog entry for one document file. Infallible by design:
/// a read or parse failure degrades to a placeholder entry (filename-stem
/// title, no author, zero pages). A single malformed file must never abort
/// a scan of thousands.
pub(crate) async fn extract_entry(root_key: &str, root: &Path, relative: &Path) -> Entry {
    let absolute = root.join(relative);
    let meta = match fs::read(&absolute).await {
        Ok(bytes) => match tana_extract::parse(&bytes) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(path = %absolute.display(), error = %e, "extraction failed, cataloging placeholder");
                DocumentMeta { title: None, author: None, page_count: 0 }
            },
        },
        Err(e) => {
            warn!(path = %absolute.display(), error = %e, "unreadable file, cataloging placeholder");
            DocumentMeta { title: None, author: None, page_count: 0 }
        },
    };
    Entry {
        root: root_key.to_string(),
        relative_path: relative.to_path_buf(),
        // A successful parse can still come back titleless; the stem
        // fallback applies either way.
        title: meta.title.unwrap_or_else(|| filename_stem(relative)),
        author: meta.author.unwrap_or_default(),
        page_count: meta.page_count,
        indexed_at: UtcDateTime::now(),
    }
}

fn filename_stem(path: &Path) -> String {
    path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
}
