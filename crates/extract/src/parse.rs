use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use lopdf::{Dictionary, Document, Object};
use tracing::instrument;

/// Lightweight metadata pulled out of a single PDF document.
///
/// `title` and `author` are `None` when the document-information dictionary
/// is missing, lacks the key, or the value decodes to an empty string.
/// Filename-based fallbacks are the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    pub title: Option<String>,
    pub author: Option<String>,
    pub page_count: u32,
}

/// Parse a PDF document from raw bytes.
///
/// Reads the page tree for a page count and the trailer's `Info` dictionary
/// for `Title` and `Author`. Encrypted documents are rejected outright:
/// without the password the info dictionary may be ciphertext and a garbage
/// title is worse than no title.
#[instrument(skip(bytes), fields(size = bytes.as_ref().len()))]
pub fn parse(bytes: impl AsRef<[u8]>) -> Result<DocumentMeta> {
    let doc = Document::load_mem(bytes.as_ref())
        .map_err(|e| exn::Exn::from(ErrorKind::Malformed(e.to_string())))?;
    if doc.is_encrypted() {
        exn::bail!(ErrorKind::Encrypted);
    }
    let page_count = u32::try_from(doc.get_pages().len()).or_raise(|| ErrorKind::PageCount)?;
    let info = info_dictionary(&doc);
    Ok(DocumentMeta {
        title: info.and_then(|dict| text_field(&doc, dict, b"Title")),
        author: info.and_then(|dict| text_field(&doc, dict, b"Author")),
        page_count,
    })
}

/// Locate the document-information dictionary, following one level of
/// indirection (`/Info` is usually a reference, occasionally inline).
fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    resolve(doc, info)?.as_dict().ok()
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Fetch a text entry from an info dictionary, returning `None` for missing
/// keys, non-string values, and values that decode to the empty string.
fn text_field(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let object = resolve(doc, dict.get(key).ok()?)?;
    let bytes = match object {
        Object::String(bytes, _) => bytes,
        _ => return None,
    };
    let text = decode_text(bytes);
    (!text.is_empty()).then_some(text)
}

/// Decode a PDF text string.
///
/// Text strings are either UTF-16BE with a byte-order mark, or single-byte
/// text in PDFDocEncoding. PDFDocEncoding agrees with Latin-1 for everything
/// a title realistically contains, so the single-byte branch goes through a
/// lossy UTF-8 pass rather than a full decoding table.
fn decode_text(bytes: &[u8]) -> String {
    let text = if bytes.starts_with(&[0xFE, 0xFF]) {
        let units: Vec<u16> =
            bytes[2..].chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]])).collect();
        char::decode_utf16(units).map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)).collect()
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };
    text.trim_matches(['\0', ' ', '\t', '\r', '\n']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdoc;
    use rstest::rstest;

    #[test]
    fn test_garbage_is_malformed() {
        let err = parse(b"not a pdf at all").unwrap_err();
        assert!(matches!(&*err, ErrorKind::Malformed(_)));
    }

    #[test]
    fn test_truncated_document_is_malformed() {
        let full = testdoc::synthesize(Some("Foo"), None, 3);
        let err = parse(&full[..full.len() / 2]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Malformed(_)));
    }

    #[test]
    fn test_full_metadata() {
        let bytes = testdoc::synthesize(Some("Foo"), Some("Bar"), 10);
        let meta = parse(&bytes).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Foo"));
        assert_eq!(meta.author.as_deref(), Some("Bar"));
        assert_eq!(meta.page_count, 10);
    }

    #[test]
    fn test_missing_info_dictionary() {
        let bytes = testdoc::synthesize(None, None, 2);
        let meta = parse(&bytes).unwrap();
        assert_eq!(meta.title, None);
        assert_eq!(meta.author, None);
        assert_eq!(meta.page_count, 2);
    }

    #[test]
    fn test_empty_title_is_none() {
        let bytes = testdoc::synthesize(Some(""), Some("Bar"), 1);
        let meta = parse(&bytes).unwrap();
        assert_eq!(meta.title, None);
        assert_eq!(meta.author.as_deref(), Some("Bar"));
    }

    #[test]
    fn test_utf16_title() {
        let bytes = testdoc::synthesize_utf16_title("本棚", 1);
        let meta = parse(&bytes).unwrap();
        assert_eq!(meta.title.as_deref(), Some("本棚"));
    }

    #[rstest]
    #[case(b"plain ascii", "plain ascii")]
    #[case(b"padded\0\0", "padded")]
    #[case(b"\xFE\xFF\x00F\x00o\x00o", "Foo")]
    #[case(b"", "")]
    fn test_decode_text(#[case] bytes: &[u8], #[case] expected: &str) {
        assert_eq!(decode_text(bytes), expected);
    }

    #[test]
    fn test_decode_text_odd_utf16_drops_trailing_byte() {
        // chunks_exact silently ignores a dangling byte after the BOM.
        assert_eq!(decode_text(b"\xFE\xFF\x00A\x00"), "A");
    }
}
