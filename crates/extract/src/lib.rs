//! PDF metadata extraction.
//!
//! This crate is the document-parser collaborator for the rest of the
//! workspace: hand it the raw bytes of a PDF file and it returns the
//! lightweight metadata the catalog cares about (title, author, page count).
//! It deliberately knows nothing about files, roots, or the catalog; path
//! handling and degrade-on-failure policy live in `tana-library`.
//!
//! Parsing is delegated to [`lopdf`]. Anything `lopdf` chokes on (truncated
//! files, garbage bytes, encrypted documents) surfaces as a structured
//! [`error::ErrorKind`]; this crate never panics on malformed input.

pub mod error;
mod parse;
pub mod testdoc;

pub use crate::parse::{DocumentMeta, parse};
