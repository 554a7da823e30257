//! SQLite catalog of indexed document metadata.
//!
//! The catalog is not the source of truth; the document files on disk are.
//! If the database is deleted it can be rebuilt by re-scanning every watched
//! root, which is also why reconciliation is allowed to be as blunt as
//! "replace everything for this root".
//!
//! # Architecture
//! A single `entries` table keyed by `(root, path)` holds one row per
//! cataloged document. All mutation goes through [`Catalog::replace_all`] and
//! [`Catalog::remove_root`], both of which run inside a transaction so that
//! concurrent readers only ever observe the catalog as it was before or after
//! a reconciliation, never mid-write.

mod db;
pub mod error;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::models::Entry;
pub use crate::repo::Catalog;
