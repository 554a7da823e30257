//! Scanning one watched root into catalog entries.
//!
//! A scan walks the root's directory tree, picks out document files by
//! extension, and extracts metadata for each one. Per-file failures degrade
//! to placeholder entries; only the root being unreachable fails the scan as
//! a whole.

mod extract;
mod stream;
mod walk;

pub use self::stream::{ScanEvent, scan, scan_stream};
