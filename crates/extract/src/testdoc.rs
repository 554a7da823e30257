//! Synthetic PDF documents for tests.
//!
//! Note:
//! - Do NOT apply `#[cfg(test)]` so that other crates can also use these in
//!   their tests (the library crate scans directories seeded with them).
//! - The documents are minimal but structurally complete: page tree, catalog,
//!   trailer, optional info dictionary.

use lopdf::{Dictionary, Document, Object, Stream, dictionary};

/// Build a minimal PDF with the given number of pages and optional
/// `Title`/`Author` info entries, returned as serialized bytes.
pub fn synthesize(title: Option<&str>, author: Option<&str>, pages: usize) -> Vec<u8> {
    let info = (title.is_some() || author.is_some()).then(|| {
        let mut info = Dictionary::new();
        if let Some(title) = title {
            info.set("Title", Object::string_literal(title));
        }
        if let Some(author) = author {
            info.set("Author", Object::string_literal(author));
        }
        info
    });
    build(info, pages)
}

/// Like [`synthesize`], but the title is stored as UTF-16BE with a
/// byte-order mark, the way PDF producers write non-Latin titles.
pub fn synthesize_utf16_title(title: &str, pages: usize) -> Vec<u8> {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in title.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    let mut info = Dictionary::new();
    info.set("Title", Object::String(bytes, lopdf::StringFormat::Hexadecimal));
    build(Some(info), pages)
}

fn build(info: Option<Dictionary>, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            })
            .into()
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    if let Some(info) = info {
        let info_id = doc.add_object(Object::Dictionary(info));
        doc.trailer.set("Info", info_id);
    }
    let mut bytes = Vec::new();
    // Writing to a Vec cannot fail.
    doc.save_to(&mut bytes).expect("in-memory save");
    bytes
}
